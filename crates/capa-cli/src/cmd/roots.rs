//! `capa roots`: show what action items can reference.
//!
//! Lists the Fishbone causes offered as Five-Why roots, the identified root
//! causes, and any action item whose stored reference no longer matches one.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use anyhow::Result;
use capa_core::registry::{DanglingReference, RootCauseOption};
use capa_core::session::RcaMethod;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct RootsArgs {
    /// Case file (TOML, or JSON by extension).
    pub case: PathBuf,
}

#[derive(Debug, Serialize)]
struct RootsReport {
    method: RcaMethod,
    fishbone_options: Vec<RootCauseOption>,
    identified: Vec<String>,
    dangling: Vec<DanglingReference>,
}

/// Execute `capa roots`.
///
/// # Errors
///
/// Returns an error if the case file cannot be loaded or output fails.
pub fn run_roots(args: &RootsArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let session = super::load_session(&project_root.join(&args.case), output)?;

    let report = RootsReport {
        method: session.method(),
        fishbone_options: session.fishbone_root_cause_options(),
        identified: session.identified_root_causes(),
        dangling: session.dangling_references(),
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for option in &r.fishbone_options {
                writeln!(w, "option\t{}", option.display())?;
            }
            for root in &r.identified {
                writeln!(w, "root\t{root}")?;
            }
            for d in &r.dangling {
                writeln!(w, "dangling\t{}\t{}\t{}", d.list, d.id, d.reference)?;
            }
            Ok(())
        },
        |r, w| {
            pretty_kv(w, "Metode", r.method.label())?;
            writeln!(w)?;

            pretty_section(w, "Fishbone root options")?;
            if r.fishbone_options.is_empty() {
                writeln!(w, "  (none)")?;
            }
            for option in &r.fishbone_options {
                writeln!(w, "  {}", option.display())?;
            }
            writeln!(w)?;

            pretty_section(w, "Identified root causes")?;
            if r.identified.is_empty() {
                writeln!(w, "  (none)")?;
            }
            for root in &r.identified {
                writeln!(w, "  {root}")?;
            }

            if !r.dangling.is_empty() {
                writeln!(w)?;
                pretty_section(w, "Dangling references")?;
                for d in &r.dangling {
                    writeln!(w, "  {} {}: {}", d.list, d.id, d.reference)?;
                }
            }
            Ok(())
        },
    )
}
