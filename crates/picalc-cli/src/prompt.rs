//! Interactive time-limit prompt.

use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Errors raised while reading the time limit.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The answer was not a number.
    #[error("please enter a valid number (got {0:?})")]
    InvalidNumber(String),

    /// The number was zero, negative, or not finite.
    #[error("time limit must be a positive number of seconds")]
    NonPositive,

    /// The number does not fit in a time span.
    #[error("time limit of {0} seconds is too large")]
    TooLarge(String),

    /// Input ended before an answer was given.
    #[error("no answer given")]
    NoInput,

    /// Reading or writing the terminal failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String, PromptError> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::NoInput);
    }
    Ok(line.trim().to_string())
}

/// Ask whether to limit the run and, if so, for how many seconds.
pub fn prompt_time_limit<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Option<Duration>, PromptError> {
    let answer = ask(input, output, "Set time limit? (y/n): ")?;
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(None);
    }

    let answer = ask(input, output, "Time limit in seconds: ")?;
    let seconds: f64 = answer
        .parse()
        .map_err(|_| PromptError::InvalidNumber(answer.clone()))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(PromptError::NonPositive);
    }
    Duration::try_from_secs_f64(seconds)
        .map(Some)
        .map_err(|_| PromptError::TooLarge(answer))
}
