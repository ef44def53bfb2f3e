use crate::output::{OutputMode, render};
use anyhow::{Context as _, Result};
use capa_core::input::TEMPLATE;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Case file to create.
    #[arg(default_value = "case.toml")]
    pub path: PathBuf,

    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    path: String,
}

/// Execute `capa init`: write a commented template case file.
///
/// # Errors
///
/// Returns an error if the file exists and `--force` is not set, or if the
/// write fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let path = project_root.join(&args.path);

    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use `capa init --force` to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&path, TEMPLATE)
        .with_context(|| format!("Failed to write case file: {}", path.display()))?;
    info!(path = %path.display(), "case template written");

    let report = InitReport {
        path: path.display().to_string(),
    };
    render(output, &report, |r, w| {
        writeln!(w, "✓ Wrote case template to {}", r.path)?;
        writeln!(w)?;
        writeln!(w, "Next steps:")?;
        writeln!(w, "  capa roots {}", r.path)?;
        writeln!(w, "  capa render {}", r.path)?;
        writeln!(w, "  capa export {}", r.path)
    })
}
