//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use picalc_cli::presenter::DEFAULT_MAX_DISPLAY;
use picalc_cli::OutputFormat;
use picalc_core::RunConfig;

/// PiCalc-rs: compute π continuously with escalating precision.
#[derive(Parser, Debug)]
#[command(name = "picalc", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Stop after this long (e.g. "30", "30s", "5m", "1h", "500ms").
    #[arg(short, long, env = "PICALC_TIME_LIMIT", value_parser = parse_duration)]
    pub time_limit: Option<Duration>,

    /// Working precision in significant digits before the first widening.
    #[arg(long, default_value_t = picalc_core::constants::DEFAULT_INITIAL_PRECISION)]
    pub initial_precision: u64,

    /// Digits added at each widening.
    #[arg(long, default_value_t = picalc_core::constants::DEFAULT_PRECISION_STEP)]
    pub precision_step: u64,

    /// Series terms folded between two widenings.
    #[arg(long, default_value_t = picalc_core::constants::DEFAULT_ITERATIONS_PER_STEP)]
    pub iterations_per_step: u64,

    /// Minimum time between two screen refreshes.
    #[arg(long, default_value = "2s", value_parser = parse_duration)]
    pub display_interval: Duration,

    /// Extra digits carried by intermediate arithmetic.
    #[arg(long, default_value_t = picalc_core::constants::DEFAULT_GUARD_DIGITS)]
    pub guard_digits: u64,

    /// Directory the result file is written to.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Result file format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Fractional digits shown on screen.
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLAY)]
    pub max_display: usize,

    /// Do not write the result to a file.
    #[arg(long)]
    pub no_save: bool,

    /// Never ask for a time limit.
    #[arg(long)]
    pub no_prompt: bool,

    /// Quiet mode (only output the digits).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Build the run parameters, using `time_limit` in place of the flag.
    #[must_use]
    pub fn to_run_config(&self, time_limit: Option<Duration>) -> RunConfig {
        RunConfig {
            initial_precision: self.initial_precision,
            precision_step: self.precision_step,
            iterations_per_step: self.iterations_per_step,
            display_interval: self.display_interval,
            time_limit,
            guard_digits: self.guard_digits,
        }
    }

    /// Whether to ask for a time limit on the terminal.
    #[must_use]
    pub fn wants_prompt(&self, stdin_is_terminal: bool) -> bool {
        stdin_is_terminal && self.time_limit.is_none() && !self.no_prompt
    }
}

/// Parse a duration string like "5m", "1h", "30s", "500ms" or bare seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let invalid = || format!("invalid duration {s:?} (expected e.g. 30, 30s, 5m, 1h, 500ms)");
    let number = |digits: &str| digits.trim().parse::<u64>().map_err(|_| invalid());

    if let Some(ms) = s.strip_suffix("ms") {
        Ok(Duration::from_millis(number(ms)?))
    } else if let Some(mins) = s.strip_suffix('m') {
        number(mins)?
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(invalid)
    } else if let Some(hours) = s.strip_suffix('h') {
        number(hours)?
            .checked_mul(3600)
            .map(Duration::from_secs)
            .ok_or_else(invalid)
    } else if let Some(secs) = s.strip_suffix('s') {
        Ok(Duration::from_secs(number(secs)?))
    } else {
        Ok(Duration::from_secs(number(s)?))
    }
}
