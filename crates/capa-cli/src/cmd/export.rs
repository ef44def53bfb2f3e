//! `capa export`: write the case workbook as one CSV file per sheet.

use crate::output::{OutputMode, pretty_kv, render_mode};
use anyhow::{Context as _, Result};
use capa_core::config::ProjectConfig;
use capa_core::report::{Sheet, TabularExporter, Workbook, artifact_name};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Case file (TOML, or JSON by extension).
    pub case: PathBuf,

    /// Directory to create the workbook in (defaults to the configured one).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SheetFile {
    sheet: String,
    file: String,
    rows: usize,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    name: String,
    dir: String,
    sheets: Vec<SheetFile>,
}

/// `"Analisis Akar Masalah"` becomes `"analisis-akar-masalah"`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn sheet_file_name(position: usize, sheet: &Sheet) -> String {
    format!("{:02}-{}.csv", position + 1, slug(&sheet.name))
}

/// Files named like `sheet_file_name` output: `NN-<slug>.csv`.
fn is_sheet_file(file_name: &str) -> bool {
    file_name
        .strip_suffix(".csv")
        .and_then(|stem| stem.split_once('-'))
        .is_some_and(|(number, slug)| {
            number.len() == 2 && number.bytes().all(|b| b.is_ascii_digit()) && !slug.is_empty()
        })
}

/// Remove sheet files left by an earlier export. Other files are kept.
fn clear_sheets(dir: &Path) -> Result<usize> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read workbook directory: {}", dir.display()))?;
    let mut removed = 0;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read workbook directory: {}", dir.display()))?;
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        let name = entry.file_name();
        if is_file && name.to_str().is_some_and(is_sheet_file) {
            let path = entry.path();
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove old sheet: {}", path.display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn write_sheet(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create sheet file: {}", path.display()))?;
    writer
        .write_record(&sheet.header)
        .with_context(|| format!("Failed to write sheet file: {}", path.display()))?;
    for row in &sheet.rows {
        writer
            .write_record(row)
            .with_context(|| format!("Failed to write sheet file: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write sheet file: {}", path.display()))?;
    debug!(path = %path.display(), rows = sheet.rows.len(), "sheet written");
    Ok(())
}

/// Replace the workbook directory's sheet files with `workbook`'s sheets.
fn write_workbook(dir: &Path, workbook: &Workbook) -> Result<Vec<SheetFile>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create workbook directory: {}", dir.display()))?;
    let removed = clear_sheets(dir)?;
    debug!(dir = %dir.display(), removed, "old sheets cleared");

    let mut sheets = Vec::with_capacity(workbook.sheets.len());
    for (position, sheet) in workbook.sheets.iter().enumerate() {
        let file = sheet_file_name(position, sheet);
        write_sheet(&dir.join(&file), sheet)?;
        sheets.push(SheetFile {
            sheet: sheet.name.clone(),
            file,
            rows: sheet.rows.len(),
        });
    }
    Ok(sheets)
}

/// Execute `capa export`.
///
/// The workbook directory ends up holding exactly the exported sheets: sheet
/// files from an earlier export are removed first.
///
/// # Errors
///
/// Returns an error if the case file cannot be loaded or a sheet cannot be
/// written.
pub fn run_export(
    args: &ExportArgs,
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

    let workbook = TabularExporter::export(&data, &name);

    let dir = super::output_dir(args.out_dir.as_deref(), &config.export, project_root)
        .join(&workbook.name);
    let sheets = match write_workbook(&dir, &workbook) {
        Ok(sheets) => sheets,
        Err(e) => {
            super::render_write_failure(output, &e)?;
            return Err(e);
        }
    };
    info!(dir = %dir.display(), sheets = sheets.len(), "workbook written");

    let report = ExportReport {
        name: workbook.name,
        dir: dir.display().to_string(),
        sheets,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for s in &r.sheets {
                writeln!(w, "{}\t{}\t{}", s.file, s.sheet, s.rows)?;
            }
            Ok(())
        },
        |r, w| {
            writeln!(w, "✓ Exported {}", r.name)?;
            pretty_kv(w, "Directory", &r.dir)?;
            for s in &r.sheets {
                writeln!(w, "  {:<34} {:<24} {} rows", s.file, s.sheet, s.rows)?;
            }
            Ok(())
        },
    )
}
