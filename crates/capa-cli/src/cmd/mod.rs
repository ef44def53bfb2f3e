pub mod completions;
pub mod export;
pub mod init;
pub mod render;
pub mod roots;
pub mod taxonomy;

use crate::output::{CliError, OutputMode, render_error};
use anyhow::Result;
use capa_core::CaseSession;
use capa_core::config::ExportConfig;
use capa_core::error::ErrorCode;
use capa_core::input::CaseInput;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Load a case file and replay it into a fresh session dated today.
///
/// Failures are rendered in the active output mode before being returned.
pub fn load_session(case: &Path, output: OutputMode) -> Result<CaseSession> {
    let input = match CaseInput::load(case) {
        Ok(input) => input,
        Err(e) => {
            let code = ErrorCode::CaseFileParseError;
            render_error(
                output,
                &CliError::with_details(
                    format!("{e:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            return Err(e);
        }
    };

    match input.build_session(Local::now().date_naive()) {
        Ok(session) => Ok(session),
        Err(e) => {
            render_error(output, &(&e).into())?;
            anyhow::bail!("{}: {e}", case.display());
        }
    }
}

/// Render a failed artifact write as `E5001` in the active output mode.
pub fn render_write_failure(output: OutputMode, err: &anyhow::Error) -> Result<()> {
    let code = ErrorCode::ArtifactWriteFailed;
    render_error(
        output,
        &CliError::with_details(
            format!("{err:#}"),
            code.hint().unwrap_or_default(),
            code.code(),
        ),
    )
}

/// Directory artifacts land in: `--out-dir` when given, else the configured
/// directory under the project root.
pub fn output_dir(flag: Option<&Path>, export: &ExportConfig, project_root: &Path) -> PathBuf {
    flag.map_or_else(
        || project_root.join(&export.output_dir),
        Path::to_path_buf,
    )
}
