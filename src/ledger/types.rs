use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::{SettingValue, Settings};

/// Reference to a test-pattern photo stored by an external service.
///
/// The core never dereferences the URL; it only anchors the capture to a
/// checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCapture {
    pub pattern_id: String,
    pub image_url: String,
}

/// Outcome classification of an analyzed capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternResult {
    Correct,
    IssueDetected,
    Unclear,
}

/// One element the analysis service compared against expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub element: String,
    pub expected: String,
    pub actual: String,
    pub is_issue: bool,
}

/// Which way a recommended adjustment moves a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Increase,
    Decrease,
    Set,
}

/// A single suggested settings change from the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub setting: String,
    pub current_value: SettingValue,
    pub suggested_value: SettingValue,
    pub direction: AdjustDirection,
    pub reasoning: String,
    pub menu_path: Vec<String>,
}

/// Analysis result produced externally from a checkpoint's capture.
///
/// Attached after the checkpoint exists (a photo is always taken against
/// an already-recorded settings state). The core stores it opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub pattern_result: PatternResult,
    pub issues_found: Vec<String>,
    pub observations: Vec<Observation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    pub confidence: f64,
    pub conversational_response: String,
}

/// The user's subjective response to a checkpoint's picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFeedback {
    pub applied_recommendation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjective_response: Option<String>,
    pub wants_rollback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Immutable snapshot of the full settings state at one point in a run.
///
/// `checkpoint_number` equals the checkpoint's index in the ledger at all
/// times; `settings` is a complete snapshot, never a diff, so every
/// checkpoint is self-sufficient for restoration. Attachments are added
/// after creation by replacing the whole entry (see
/// [`CheckpointLedger`](super::CheckpointLedger)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Process-unique, never reused.
    pub id: String,
    /// Back-reference to the owning session; empty until the durable
    /// store assigns an id. Identifies the relation only.
    pub session_id: String,
    pub checkpoint_number: usize,
    pub label: String,
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_capture: Option<PatternCapture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AiAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<UserFeedback>,
    pub created_at: DateTime<Utc>,
}

static NEXT_CHECKPOINT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique checkpoint id.
///
/// Ids carry a `local_` prefix until the durable store persists the run;
/// the counter never hands out the same value twice in one process.
pub(crate) fn next_checkpoint_id() -> String {
    let n = NEXT_CHECKPOINT_ID.fetch_add(1, Ordering::Relaxed);
    format!("local_{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_ids_are_unique() {
        let a = next_checkpoint_id();
        let b = next_checkpoint_id();
        assert_ne!(a, b);
        assert!(a.starts_with("local_"));
    }

    #[test]
    fn test_analysis_wire_spellings() {
        let analysis = AiAnalysis {
            pattern_result: PatternResult::IssueDetected,
            issues_found: vec!["crushed shadows".to_string()],
            observations: vec![],
            recommendation: Some(Recommendation {
                setting: "brightness".to_string(),
                current_value: SettingValue::Number(50.0),
                suggested_value: SettingValue::Number(45.0),
                direction: AdjustDirection::Decrease,
                reasoning: "Black bars are grey".to_string(),
                menu_path: vec!["Settings".to_string(), "Picture".to_string()],
            }),
            confidence: 0.85,
            conversational_response: "Shadows look crushed.".to_string(),
        };

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["pattern_result"], "issue_detected");
        assert_eq!(json["recommendation"]["direction"], "decrease");
    }
}
