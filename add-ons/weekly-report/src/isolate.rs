//! Process-per-run generation.
//!
//! The record is written to a private temporary YAML file and a fresh copy of this
//! binary renders it into a private temporary output. The bytes are then staged next to
//! the requested path and renamed into place. Concurrent runs share nothing but the
//! read-only template.

use std::io::Write;
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};
use weekly_core::{save_record, CoreError, ReportRecord};

#[derive(Error, Debug)]
pub enum IsolateError {
    #[error("could not stage record: {0}")]
    Stage(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report generation failed (exit code {code:?}): {stderr}")]
    Child { code: Option<i32>, stderr: String },

    #[error("Document generation failed: empty output")]
    EmptyOutput,
}

pub fn generate_isolated(
    template: &Path,
    record: &ReportRecord,
    output: &Path,
) -> Result<(), IsolateError> {
    let input = tempfile::Builder::new()
        .prefix("weekly_input_")
        .suffix(".yaml")
        .tempfile()?;
    save_record(input.path(), record)?;

    let staged = tempfile::Builder::new()
        .prefix("weekly_output_")
        .suffix(".docx")
        .tempfile()?
        .into_temp_path();

    let exe = std::env::current_exe()?;
    debug!(exe = %exe.display(), input = %input.path().display(), "spawning isolated render");
    let result = Command::new(exe)
        .arg("--template")
        .arg(template)
        .arg("--input")
        .arg(input.path())
        .arg("--output")
        .arg(&*staged)
        .output()?;

    if !result.status.success() {
        return Err(IsolateError::Child {
            code: result.status.code(),
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    let bytes = std::fs::read(&staged)?;
    if bytes.is_empty() {
        return Err(IsolateError::EmptyOutput);
    }
    persist(output, &bytes)?;
    info!(output = %output.display(), bytes = bytes.len(), "isolated render complete");
    Ok(())
}

/// Write `bytes` to a temp file next to `output`, then rename it over `output`.
fn persist(output: &Path, bytes: &[u8]) -> Result<(), IsolateError> {
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(output).map_err(|e| e.error)?;
    Ok(())
}
