//! CLI output formatting.

use std::time::Duration;

/// Digits per displayed block.
pub const BLOCK_SIZE: usize = 10;

/// Blocks per displayed line.
pub const BLOCKS_PER_LINE: usize = 5;

/// Number of fractional digits hidden when showing at most `max_display`.
#[must_use]
pub fn hidden_digits(digits: &str, max_display: usize) -> usize {
    fraction(digits).map_or(0, |(_, frac)| frac.len().saturating_sub(max_display))
}

/// Lay out the fractional digits in blocks of ten, fifty per line.
///
/// At most `max_display` fractional digits are shown. Values without a
/// decimal point are returned unchanged.
///
/// ```text
/// 3. 1415926535 8979323846 2643383279 5028841971 6939937510
///    5820974944 5923078164
/// ```
#[must_use]
pub fn format_digit_blocks(digits: &str, max_display: usize) -> String {
    let Some((int_part, frac)) = fraction(digits) else {
        return digits.to_string();
    };
    let shown = &frac[..frac.len().min(max_display)];
    let indent = " ".repeat(int_part.len() + 2);

    let mut out = format!("{int_part}.");
    let line_len = BLOCK_SIZE * BLOCKS_PER_LINE;
    for (line_no, line) in shown.as_bytes().chunks(line_len).enumerate() {
        if line_no > 0 {
            out.push('\n');
            out.push_str(&indent);
        } else {
            out.push(' ');
        }
        let blocks: Vec<&str> = line
            .chunks(BLOCK_SIZE)
            .map(|block| std::str::from_utf8(block).unwrap_or_default())
            .collect();
        out.push_str(&blocks.join(" "));
    }
    out
}

fn fraction(digits: &str) -> Option<(&str, &str)> {
    digits.split_once('.')
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// One-line run status shown under the live digits.
#[must_use]
pub fn format_status(elapsed: Duration, iteration: u64, precision_digits: u64) -> String {
    format!(
        "Runtime: {:.2} seconds | Iterations: {} | Precision: ~{} digits",
        elapsed.as_secs_f64(),
        format_number(iteration),
        format_number(precision_digits)
    )
}
