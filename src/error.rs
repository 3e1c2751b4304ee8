use thiserror::Error;

/// Errors produced by the calibration core.
///
/// Every failure is a logical/validation error reported synchronously to
/// the caller; validation happens before any mutation, so the session and
/// ledger are unchanged whenever one of these is returned.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<CalibrationError> for String {
    fn from(err: CalibrationError) -> Self {
        err.to_string()
    }
}
