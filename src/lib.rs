//! Calibration session core for CrowdTuner.
//!
//! The surrounding app photographs a TV showing a test pattern, sends the
//! photo to an external analysis service, and walks the user through
//! adjusting picture settings. Screens, camera capture, networking, and
//! persistence all live outside this crate; what lives here is the part
//! with real invariants -- the in-memory checkpoint ledger and the session
//! state machine around it:
//!
//! - every settings change becomes an immutable, gaplessly numbered
//!   checkpoint holding a full snapshot;
//! - rollback re-points the current view without deleting newer history
//!   (linear history with time travel);
//! - analysis results and user feedback attach to existing checkpoints by
//!   copy-on-write replacement.

pub mod device;
mod error;
pub mod ledger;
pub mod session;
pub mod settings;

pub use error::CalibrationError;
pub use ledger::{AiAnalysis, Checkpoint, CheckpointLedger, PatternCapture, UserFeedback};
pub use session::{CalibrationSession, SessionController, SessionMode, SessionPhase};
pub use settings::{SettingValue, Settings};
