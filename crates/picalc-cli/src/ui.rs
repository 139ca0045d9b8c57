//! UI helpers for CLI display.

use console::{style, Term};

/// Width of the separator rules.
pub const RULE_WIDTH: usize = 60;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// A horizontal rule made of `ch`.
#[must_use]
pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Clear the terminal if stdout is one.
pub fn clear_screen() {
    let term = Term::stdout();
    if term.is_term() {
        let _ = term.clear_screen();
    }
}

/// Print the program banner.
pub fn print_banner() {
    println!("{}", rule('='));
    let title = format!("{:^width$}", "Continuous Pi Calculation", width = RULE_WIDTH);
    if is_color_disabled() {
        println!("{title}");
    } else {
        println!("{}", style(title).bold().cyan());
    }
    println!("{}", rule('='));
    println!("This program calculates Pi continuously with increasing precision");
    println!("until the set time expires or you stop the calculation.");
    println!("{}", rule('='));
}

/// Print a styled header.
pub fn print_header(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

/// Print a success message.
pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}
