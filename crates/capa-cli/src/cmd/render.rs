//! `capa render`: lay the case report out into pages.
//!
//! Writes `<name>.layout.json`: the page/instruction sequence a drawing
//! backend consumes to produce the final document.

use crate::output::{OutputMode, pretty_kv, render_mode};
use anyhow::{Context as _, Result};
use capa_core::config::ProjectConfig;
use capa_core::report::{Document, DocumentRenderer, artifact_name};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Case file (TOML, or JSON by extension).
    pub case: PathBuf,

    /// Directory to write the layout into (defaults to the configured one).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Also print a plain-text dump of every page.
    #[arg(long)]
    pub preview: bool,
}

#[derive(Debug, Serialize)]
struct RenderReport {
    name: String,
    path: String,
    pages: usize,
    instructions: usize,
    digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
}

fn write_layout(dir: &Path, document: &Document) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(format!("{}.layout.json", document.name));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create layout file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)
        .with_context(|| format!("Failed to write layout file: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write layout file: {}", path.display()))?;
    Ok(path)
}

/// Execute `capa render`.
///
/// # Errors
///
/// Returns an error if the case file cannot be loaded or the layout cannot be
/// written.
pub fn run_render(
    args: &RenderArgs,
    output: OutputMode,
    project_root: &Path,
    config: &ProjectConfig,
) -> Result<()> {
    let session = super::load_session(&project_root.join(&args.case), output)?;
    let data = session.snapshot();
    let name = artifact_name(
        &data.case_details.reference_number,
        &config.export.fallback_name,
    );

    let document = DocumentRenderer::new(config.layout.clone()).render(&data, &name);

    let dir = super::output_dir(args.out_dir.as_deref(), &config.export, project_root);
    let path = match write_layout(&dir, &document) {
        Ok(path) => path,
        Err(e) => {
            super::render_write_failure(output, &e)?;
            return Err(e);
        }
    };
    info!(path = %path.display(), "layout written");

    let report = RenderReport {
        name,
        path: path.display().to_string(),
        pages: document.pages.len(),
        instructions: document.instruction_count(),
        digest: document.digest(),
        preview: args.preview.then(|| document.to_text()),
    };

    render_mode(
        output,
        &report,
        |r, w| {
            writeln!(
                w,
                "{}\t{}\t{}\t{}",
                r.path, r.pages, r.instructions, r.digest
            )?;
            if let Some(preview) = &r.preview {
                write!(w, "{preview}")?;
            }
            Ok(())
        },
        |r, w| {
            writeln!(w, "✓ Rendered {}", r.name)?;
            pretty_kv(w, "Layout", &r.path)?;
            pretty_kv(w, "Pages", r.pages.to_string())?;
            pretty_kv(w, "Instructions", r.instructions.to_string())?;
            pretty_kv(w, "Digest", &r.digest)?;
            if let Some(preview) = &r.preview {
                writeln!(w)?;
                write!(w, "{preview}")?;
            }
            Ok(())
        },
    )
}
