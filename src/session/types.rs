use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::Environment;

/// Which flavor of run the user chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    QuickFix,
    FullCalibration,
}

/// Where the controller sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session; ledger empty, pointer unset.
    Idle,
    /// Session started, ledger non-empty.
    Active,
    /// Satisfaction recorded; terminal until reset.
    Completed,
}

/// One calibration run.
///
/// `id` stays empty until an external durable store persists the session
/// and the caller reconciles via `bind_session_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSession {
    pub id: String,
    pub model_id: String,
    pub model_number_entered: String,
    pub environment: Environment,
    pub mode: SessionMode,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Final satisfaction score, 1 (worst) to 5 (best).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_satisfaction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_feedback: Option<String>,
}
