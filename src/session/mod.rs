//! Session lifecycle: start, record changes, restore, complete, reset.
//!
//! [`SessionController`] owns the ledger and the current-settings
//! projection for one calibration run; all mutation goes through it.

mod controller;
mod types;

pub use controller::SessionController;
pub use types::{CalibrationSession, SessionMode, SessionPhase};
