//! CLI snapshot presenter.

use picalc_core::{RunResult, Snapshot};
use picalc_orchestration::interfaces::SnapshotPresenter;

use crate::output::{format_digit_blocks, format_duration, format_number, format_status, hidden_digits};
use crate::ui::{clear_screen, print_error, rule};

/// Default number of fractional digits shown on screen.
pub const DEFAULT_MAX_DISPLAY: usize = 1000;

/// Render the live view of a snapshot.
#[must_use]
pub fn render_snapshot(snapshot: &Snapshot, max_display: usize) -> String {
    let mut out = String::from("Current Pi Calculation:\n");
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str("Pi = ");
    out.push_str(&format_digit_blocks(&snapshot.digits, max_display));
    let hidden = hidden_digits(&snapshot.digits, max_display);
    if hidden > 0 {
        out.push_str(&format!(
            "\n... (additional {} digits not shown)",
            format_number(hidden as u64)
        ));
    }
    out.push('\n');
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format_status(
        snapshot.elapsed,
        snapshot.iteration,
        snapshot.precision_digits,
    ));
    out
}

/// Render the closing summary of a run.
#[must_use]
pub fn render_summary(result: &RunResult) -> String {
    let Some(snapshot) = &result.snapshot else {
        return "No results (calculation was stopped too early)".to_string();
    };
    format!(
        "Calculation completed after {} ({})\nCompleted Iterations: {}\nAchieved Precision: ~{} digits",
        format_duration(result.elapsed),
        result.stop_reason,
        format_number(snapshot.iteration),
        format_number(snapshot.precision_digits),
    )
}

/// CLI presenter: redraws the screen on every snapshot.
pub struct CLISnapshotPresenter {
    quiet: bool,
    max_display: usize,
}

impl CLISnapshotPresenter {
    #[must_use]
    pub fn new(quiet: bool, max_display: usize) -> Self {
        Self { quiet, max_display }
    }
}

impl SnapshotPresenter for CLISnapshotPresenter {
    fn present_snapshot(&self, snapshot: &Snapshot) {
        if self.quiet {
            return;
        }
        clear_screen();
        println!("{}", render_snapshot(snapshot, self.max_display));
    }

    fn present_result(&self, result: &RunResult) {
        if self.quiet {
            println!("{}", result.digits());
            return;
        }
        clear_screen();
        if let Some(snapshot) = &result.snapshot {
            println!("{}", render_snapshot(snapshot, self.max_display));
        }
        println!();
        println!("{}", render_summary(result));
    }

    fn present_error(&self, error: &str) {
        print_error(error);
    }
}
