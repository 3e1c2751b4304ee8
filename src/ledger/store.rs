use chrono::Utc;
use tracing::{debug, info};

use crate::error::CalibrationError;
use crate::settings::Settings;

use super::types::{next_checkpoint_id, AiAnalysis, Checkpoint, PatternCapture, UserFeedback};

/// Append-only, creation-ordered sequence of checkpoints plus the
/// current-checkpoint pointer.
///
/// The ledger is exactly the array of checkpoints in creation order,
/// addressable by `checkpoint_number`. Rollback moves the pointer without
/// truncating anything: a later append still numbers from the ledger's
/// tail, so pre-rollback checkpoints stay reachable by number even once
/// they are off the active path. Linear history with time travel, not a
/// branching model.
#[derive(Debug, Default)]
pub struct CheckpointLedger {
    checkpoints: Vec<Checkpoint>,
    /// `None` while no session is active, otherwise a valid index.
    current: Option<usize>,
}

impl CheckpointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new checkpoint at the tail of the ledger and point the
    /// current view at it. This is the only way checkpoints enter the
    /// ledger.
    ///
    /// `checkpoint_number` is always the current length, so numbering is
    /// gapless and strictly increasing regardless of interleaved
    /// rollbacks.
    pub fn append(
        &mut self,
        session_id: &str,
        label: &str,
        settings: Settings,
        pattern_capture: Option<PatternCapture>,
        analysis: Option<AiAnalysis>,
    ) -> &Checkpoint {
        let number = self.checkpoints.len();

        // Wall clocks can step backwards; created_at must not.
        let mut created_at = Utc::now();
        if let Some(last) = self.checkpoints.last() {
            created_at = created_at.max(last.created_at);
        }

        self.checkpoints.push(Checkpoint {
            id: next_checkpoint_id(),
            session_id: session_id.to_string(),
            checkpoint_number: number,
            label: label.to_string(),
            settings,
            pattern_capture,
            analysis,
            feedback: None,
            created_at,
        });
        self.current = Some(number);

        info!("Recorded checkpoint {}: {:?}", number, label);
        &self.checkpoints[number]
    }

    /// Move the current pointer back to `checkpoint_number` and return a
    /// snapshot of its settings.
    ///
    /// Non-destructive: every later checkpoint stays in the ledger and
    /// stays inspectable.
    pub fn rollback(&mut self, checkpoint_number: usize) -> Result<Settings, CalibrationError> {
        let checkpoint = self
            .checkpoints
            .get(checkpoint_number)
            .ok_or_else(|| {
                CalibrationError::NotFound(format!("Checkpoint {} not found", checkpoint_number))
            })?;

        self.current = Some(checkpoint_number);
        info!(
            "Rolled back to checkpoint {} ({:?})",
            checkpoint_number, checkpoint.label
        );
        Ok(checkpoint.settings.clone())
    }

    /// Attach the user's feedback to the checkpoint with the given id.
    ///
    /// The entry is replaced wholesale (copy-on-write) rather than edited
    /// in place; number, created_at, and the pointer are untouched.
    pub fn attach_feedback(
        &mut self,
        checkpoint_id: &str,
        feedback: UserFeedback,
    ) -> Result<(), CalibrationError> {
        let index = self.index_of(checkpoint_id)?;
        let mut updated = self.checkpoints[index].clone();
        updated.feedback = Some(feedback);
        self.checkpoints[index] = updated;

        debug!("Attached feedback to checkpoint {}", checkpoint_id);
        Ok(())
    }

    /// Attach an analysis result to the checkpoint with the given id.
    ///
    /// Analysis arrives asynchronously after a photo is taken against an
    /// already-recorded checkpoint; same copy-on-write replacement as
    /// feedback.
    pub fn attach_analysis(
        &mut self,
        checkpoint_id: &str,
        analysis: AiAnalysis,
    ) -> Result<(), CalibrationError> {
        let index = self.index_of(checkpoint_id)?;
        let mut updated = self.checkpoints[index].clone();
        updated.analysis = Some(analysis);
        self.checkpoints[index] = updated;

        debug!("Attached analysis to checkpoint {}", checkpoint_id);
        Ok(())
    }

    /// Rewrite the session back-reference on every checkpoint.
    ///
    /// Checkpoints created before the durable store persisted the session
    /// carry an empty id; this reconciles them retroactively.
    pub fn bind_session_id(&mut self, session_id: &str) {
        for index in 0..self.checkpoints.len() {
            if self.checkpoints[index].session_id != session_id {
                let mut updated = self.checkpoints[index].clone();
                updated.session_id = session_id.to_string();
                self.checkpoints[index] = updated;
            }
        }
    }

    /// The checkpoint the current pointer designates, if any.
    pub fn current(&self) -> Option<&Checkpoint> {
        self.current.map(|i| &self.checkpoints[i])
    }

    /// Index of the current checkpoint (`None` maps to the spec's `-1`).
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn count(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Read-only view of all checkpoints in creation order.
    pub fn all(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Presentation ordering: most recent first. The ledger itself never
    /// reorders.
    pub fn newest_first(&self) -> Vec<&Checkpoint> {
        self.checkpoints.iter().rev().collect()
    }

    /// Discard every checkpoint and reset the pointer.
    pub fn clear(&mut self) {
        self.checkpoints.clear();
        self.current = None;
    }

    fn index_of(&self, checkpoint_id: &str) -> Result<usize, CalibrationError> {
        self.checkpoints
            .iter()
            .position(|cp| cp.id == checkpoint_id)
            .ok_or_else(|| {
                CalibrationError::NotFound(format!("Checkpoint {} not found", checkpoint_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingValue;

    fn settings(brightness: f64, contrast: f64) -> Settings {
        let mut s = Settings::new();
        s.set("brightness", brightness);
        s.set("contrast", contrast);
        s
    }

    fn sample_feedback() -> UserFeedback {
        UserFeedback {
            applied_recommendation: true,
            subjective_response: Some("looks better".to_string()),
            wants_rollback: false,
            notes: None,
        }
    }

    fn sample_analysis() -> AiAnalysis {
        AiAnalysis {
            pattern_result: crate::ledger::PatternResult::Correct,
            issues_found: vec![],
            observations: vec![],
            recommendation: None,
            confidence: 0.9,
            conversational_response: "Looks spot on.".to_string(),
        }
    }

    #[test]
    fn test_append_numbers_are_gapless() {
        let mut ledger = CheckpointLedger::new();
        for i in 0..5 {
            let cp = ledger.append("", &format!("change {}", i), settings(50.0, 45.0), None, None);
            assert_eq!(cp.checkpoint_number, i);
        }
        for (i, cp) in ledger.all().iter().enumerate() {
            assert_eq!(cp.checkpoint_number, i);
        }
    }

    #[test]
    fn test_append_after_rollback_numbers_from_tail() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "lower brightness", settings(45.0, 45.0), None, None);

        ledger.rollback(0).unwrap();
        let cp = ledger.append("", "retry", settings(47.0, 45.0), None, None);

        // Numbering continues at the ledger's tail, not at pointer + 1.
        assert_eq!(cp.checkpoint_number, 2);
        assert_eq!(ledger.count(), 3);
        // The bypassed checkpoint is still present and unchanged.
        let bypassed = &ledger.all()[1];
        assert_eq!(bypassed.label, "lower brightness");
        assert_eq!(
            bypassed.settings.get("brightness"),
            Some(&SettingValue::Number(45.0))
        );
    }

    #[test]
    fn test_rollback_returns_exact_snapshot() {
        let mut ledger = CheckpointLedger::new();
        let captured = settings(50.0, 45.0);
        ledger.append("", "baseline", captured.clone(), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);

        let restored = ledger.rollback(0).unwrap();
        assert_eq!(restored, captured);
        assert_eq!(ledger.current().unwrap().checkpoint_number, 0);
    }

    #[test]
    fn test_rollback_never_shrinks_count() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);

        ledger.rollback(0).unwrap();
        assert_eq!(ledger.count(), 2);
        ledger.rollback(1).unwrap();
        assert_eq!(ledger.count(), 2);
    }

    #[test]
    fn test_rollback_unknown_number_leaves_state_alone() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);

        let err = ledger.rollback(99).unwrap_err();
        assert!(matches!(err, CalibrationError::NotFound(_)));
        assert_eq!(ledger.count(), 2);
        assert_eq!(ledger.current_index(), Some(1));
    }

    #[test]
    fn test_attach_feedback_is_copy_on_write() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);

        let target = ledger.all()[0].clone();
        ledger.attach_feedback(&target.id, sample_feedback()).unwrap();

        let updated = &ledger.all()[0];
        assert!(updated.feedback.is_some());
        // Identity fields survive the replacement.
        assert_eq!(updated.id, target.id);
        assert_eq!(updated.checkpoint_number, target.checkpoint_number);
        assert_eq!(updated.created_at, target.created_at);
        // Neighbor and pointer untouched.
        assert!(ledger.all()[1].feedback.is_none());
        assert_eq!(ledger.current_index(), Some(1));
    }

    #[test]
    fn test_attach_feedback_unknown_id() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);

        let err = ledger
            .attach_feedback("local_999999", sample_feedback())
            .unwrap_err();
        assert!(matches!(err, CalibrationError::NotFound(_)));
        assert!(ledger.all()[0].feedback.is_none());
    }

    #[test]
    fn test_attach_analysis_is_copy_on_write() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);

        let target = ledger.all()[0].clone();
        ledger.attach_analysis(&target.id, sample_analysis()).unwrap();

        let updated = &ledger.all()[0];
        assert!(updated.analysis.is_some());
        assert_eq!(updated.id, target.id);
        assert_eq!(updated.checkpoint_number, target.checkpoint_number);
        assert_eq!(updated.created_at, target.created_at);
        assert!(ledger.all()[1].analysis.is_none());
        assert_eq!(ledger.current_index(), Some(1));
    }

    #[test]
    fn test_attach_analysis_unknown_id() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);

        let err = ledger
            .attach_analysis("local_999999", sample_analysis())
            .unwrap_err();
        assert!(matches!(err, CalibrationError::NotFound(_)));
        assert!(ledger.all()[0].analysis.is_none());
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut ledger = CheckpointLedger::new();
        assert!(ledger.is_empty());

        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);
        assert!(!ledger.is_empty());

        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.count(), 0);
        assert!(ledger.current().is_none());
        assert_eq!(ledger.current_index(), None);
    }

    #[test]
    fn test_created_at_monotonic_non_decreasing() {
        let mut ledger = CheckpointLedger::new();
        for i in 0..10 {
            ledger.append("", &format!("change {}", i), settings(50.0, 45.0), None, None);
        }
        let stamps: Vec<_> = ledger.all().iter().map(|cp| cp.created_at).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bind_session_id_rewrites_all_entries() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);

        ledger.bind_session_id("sess_42");
        assert!(ledger.all().iter().all(|cp| cp.session_id == "sess_42"));
    }

    #[test]
    fn test_newest_first_ordering() {
        let mut ledger = CheckpointLedger::new();
        ledger.append("", "baseline", settings(50.0, 45.0), None, None);
        ledger.append("", "edit", settings(40.0, 45.0), None, None);
        ledger.append("", "retry", settings(47.0, 45.0), None, None);

        let numbers: Vec<usize> = ledger
            .newest_first()
            .iter()
            .map(|cp| cp.checkpoint_number)
            .collect();
        assert_eq!(numbers, vec![2, 1, 0]);
    }
}
