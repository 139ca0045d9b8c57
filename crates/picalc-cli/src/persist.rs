//! Writing the final result to a timestamped file.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use picalc_core::{RunConfig, RunResult};

/// File format of the saved result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Header lines followed by the digits.
    #[default]
    Text,
    /// Pretty-printed JSON with the result and the run configuration.
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// Errors raised while saving a result.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The run produced no snapshot to save.
    #[error("no result to save (calculation was stopped too early)")]
    NoSnapshot,

    /// Writing the file failed.
    #[error("failed to write result: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the result failed.
    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    result: &'a RunResult,
    config: &'a RunConfig,
}

/// `pi_calculation_<YYYYmmdd_HHMMSS>.<ext>`.
#[must_use]
pub fn result_file_name(at: &DateTime<Local>, format: OutputFormat) -> String {
    format!(
        "pi_calculation_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Text rendering of a result: metadata header, blank line, digits.
pub fn render_text(result: &RunResult) -> Result<String, PersistError> {
    let snapshot = result.snapshot.as_ref().ok_or(PersistError::NoSnapshot)?;
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Pi Calculation");
    let _ = writeln!(out, "Achieved Precision: ~{} digits", snapshot.precision_digits);
    let _ = writeln!(out, "Completed Iterations: {}", snapshot.iteration);
    let _ = writeln!(
        out,
        "Calculation Time: {:.2} seconds",
        result.elapsed.as_secs_f64()
    );
    let _ = writeln!(out, "Stop Reason: {}", result.stop_reason);
    out.push('\n');
    out.push_str(&snapshot.digits);
    Ok(out)
}

/// JSON rendering of a result and the configuration that produced it.
pub fn render_json(result: &RunResult, config: &RunConfig) -> Result<String, PersistError> {
    if result.snapshot.is_none() {
        return Err(PersistError::NoSnapshot);
    }
    Ok(serde_json::to_string_pretty(&ResultRecord { result, config })?)
}

/// Save `result` into `dir` under a timestamped name and return the path.
pub fn save_result(
    dir: &Path,
    result: &RunResult,
    config: &RunConfig,
    format: OutputFormat,
) -> Result<PathBuf, PersistError> {
    let contents = match format {
        OutputFormat::Text => render_text(result)?,
        OutputFormat::Json => render_json(result, config)?,
    };
    fs::create_dir_all(dir)?;
    let path = dir.join(result_file_name(&Local::now(), format));
    fs::write(&path, contents)?;
    info!(path = %path.display(), "Result saved");
    Ok(path)
}
