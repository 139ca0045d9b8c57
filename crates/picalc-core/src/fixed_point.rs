//! Decimal fixed-point helpers over `BigInt`.
//!
//! A fixed-point value `v` at scale `s` represents `v / 10^s`.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::constants::{CHUDNOVSKY_RADICAND, CHUDNOVSKY_SCALE};
use crate::evaluator::PiError;

/// `10^exp` as a `BigInt`.
#[must_use]
pub fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

/// Convert a digit count into a fixed-point scale.
pub fn working_scale(precision_digits: u64, guard_digits: u64) -> Result<u32, PiError> {
    precision_digits
        .checked_add(guard_digits)
        .and_then(|digits| u32::try_from(digits).ok())
        .ok_or_else(|| {
            PiError::ArithmeticFault(format!(
                "working precision {precision_digits}+{guard_digits} digits is not representable"
            ))
        })
}

/// `426880·√10005` at the given scale, truncated.
#[must_use]
pub fn chudnovsky_constant(scale: u32) -> BigInt {
    let radicand = BigInt::from(CHUDNOVSKY_RADICAND) * pow10(scale) * pow10(scale);
    radicand.sqrt() * CHUDNOVSKY_SCALE
}

/// Floor division that reports a zero divisor instead of panicking.
pub fn div_floor(numerator: &BigInt, denominator: &BigInt) -> Result<BigInt, PiError> {
    if denominator.is_zero() {
        return Err(PiError::ArithmeticFault("division by zero".into()));
    }
    Ok(numerator.div_floor(denominator))
}

/// Render a fixed-point value truncated to `significant` digits.
///
/// Digits are cut, never rounded. When the cut falls inside the integer
/// part no decimal point is emitted.
#[must_use]
pub fn render_truncated(value: &BigInt, scale: u32, significant: u64) -> String {
    let scale = scale as usize;
    let mut digits = value.abs().to_string();
    if digits.len() <= scale {
        digits.insert_str(0, &"0".repeat(scale + 1 - digits.len()));
    }
    let int_len = digits.len() - scale;
    let keep = usize::try_from(significant)
        .unwrap_or(usize::MAX)
        .min(digits.len());

    let mut out = String::with_capacity(keep + 2);
    if value.is_negative() {
        out.push('-');
    }
    if keep <= int_len {
        out.push_str(&digits[..keep]);
    } else {
        out.push_str(&digits[..int_len]);
        out.push('.');
        out.push_str(&digits[int_len..keep]);
    }
    out
}
