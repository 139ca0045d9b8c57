//! Error handling and exit codes.

use picalc_core::constants::exit_codes;
use picalc_core::PiError;

/// Exit code for a calculation error.
#[must_use]
pub fn handle_error(err: &PiError) -> i32 {
    match err {
        PiError::InvalidConfig(_) => exit_codes::ERROR_CONFIG,
        PiError::ArithmeticFault(_) | PiError::WorkerSpawn(_) | PiError::ResultTaken => {
            exit_codes::ERROR_GENERIC
        }
    }
}

/// Exit code for any application error. Prompt, persistence, and I/O
/// failures are generic.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<PiError>() {
        return handle_error(err);
    }
    exit_codes::ERROR_GENERIC
}
