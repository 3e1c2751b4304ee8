use chrono::Utc;
use tracing::{debug, info};

use crate::device::{Environment, SettingCategory, SettingMetadata, TvModel};
use crate::error::CalibrationError;
use crate::ledger::{AiAnalysis, Checkpoint, CheckpointLedger, PatternCapture, UserFeedback};
use crate::settings::Settings;

use super::types::{CalibrationSession, SessionMode, SessionPhase};

/// Owner of one calibration run: session lifecycle, the checkpoint
/// ledger, and the current-settings projection.
///
/// Construct one per run and hand it by reference to whichever layer
/// drives the workflow; there is no global store. All mutations are
/// synchronous and single-writer. If a host genuinely shares a controller
/// across threads, wrap the whole thing in a mutex; internally every
/// mutation completes before returning and every read hands out an
/// immutable view.
#[derive(Debug, Default)]
pub struct SessionController {
    session: Option<CalibrationSession>,
    ledger: CheckpointLedger,
    tv_model: Option<TvModel>,
    tv_settings: Vec<SettingMetadata>,
    environment: Option<Environment>,
    current_settings: Settings,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a run: create the session and record checkpoint 0 from the
    /// initial settings.
    ///
    /// The session id stays empty until the durable store assigns one
    /// (see [`bind_session_id`](Self::bind_session_id)). Fails if a run
    /// is already in progress, or if the device metadata declares basic
    /// settings but `initial_settings` is empty -- a baseline checkpoint
    /// with no values would defeat rollback for every later checkpoint.
    pub fn start_session(
        &mut self,
        tv_model: TvModel,
        tv_settings: Vec<SettingMetadata>,
        environment: Environment,
        mode: SessionMode,
        initial_settings: Settings,
    ) -> Result<(), CalibrationError> {
        if self.session.is_some() {
            return Err(CalibrationError::InvalidArgument(
                "A session is already in progress; reset before starting another".to_string(),
            ));
        }

        let declares_basic = tv_settings
            .iter()
            .any(|m| m.setting_category == SettingCategory::Basic);
        if declares_basic && initial_settings.is_empty() {
            return Err(CalibrationError::InvalidArgument(
                "Initial settings are required for this model's basic settings".to_string(),
            ));
        }

        let session = CalibrationSession {
            id: String::new(),
            model_id: tv_model.id.clone(),
            model_number_entered: tv_model.model_number.clone(),
            environment: environment.clone(),
            mode,
            started_at: Utc::now(),
            completed_at: None,
            final_satisfaction: None,
            final_feedback: None,
        };

        self.ledger
            .append("", "Original Settings", initial_settings.clone(), None, None);
        self.current_settings = initial_settings;
        self.tv_model = Some(tv_model);
        self.tv_settings = tv_settings;
        self.environment = Some(environment);
        self.session = Some(session);

        info!("Started {:?} calibration session", mode);
        Ok(())
    }

    /// Record a settings change as a new checkpoint.
    ///
    /// The partial update is merged over the current projection and the
    /// full merged state is snapshotted -- checkpoints are never diffs.
    /// This is the only path by which the current-settings projection
    /// advances.
    pub fn record_change(
        &mut self,
        label: &str,
        partial: &Settings,
        pattern_capture: Option<PatternCapture>,
        analysis: Option<AiAnalysis>,
    ) -> Result<&Checkpoint, CalibrationError> {
        let session = self.require_active()?;
        let session_id = session.id.clone();

        let merged = self.current_settings.merge(partial);
        self.current_settings = merged.clone();
        Ok(self
            .ledger
            .append(&session_id, label, merged, pattern_capture, analysis))
    }

    /// Re-point the current view at an earlier checkpoint and return its
    /// settings snapshot.
    ///
    /// Read-only with respect to history: no checkpoint is created or
    /// removed. If the user edits again afterwards, `record_change`
    /// extends the ledger at its tail.
    pub fn restore(&mut self, checkpoint_number: usize) -> Result<Settings, CalibrationError> {
        self.require_active()?;
        let snapshot = self.ledger.rollback(checkpoint_number)?;
        self.current_settings = snapshot.clone();
        Ok(snapshot)
    }

    /// Attach the user's subjective response to an existing checkpoint.
    ///
    /// Available while the session exists, including after completion --
    /// feedback on the final picture often arrives with the closing
    /// screen.
    pub fn attach_feedback(
        &mut self,
        checkpoint_id: &str,
        feedback: UserFeedback,
    ) -> Result<(), CalibrationError> {
        self.require_session()?;
        self.ledger.attach_feedback(checkpoint_id, feedback)
    }

    /// Attach an externally produced analysis result to an existing
    /// checkpoint.
    pub fn attach_analysis(
        &mut self,
        checkpoint_id: &str,
        analysis: AiAnalysis,
    ) -> Result<(), CalibrationError> {
        self.require_session()?;
        self.ledger.attach_analysis(checkpoint_id, analysis)
    }

    /// Finish the run, recording the user's satisfaction (1-5) and any
    /// closing feedback. The ledger is retained for inspection.
    pub fn complete_session(
        &mut self,
        satisfaction: u8,
        feedback: Option<String>,
    ) -> Result<(), CalibrationError> {
        if !(1..=5).contains(&satisfaction) {
            return Err(CalibrationError::InvalidArgument(format!(
                "Satisfaction must be between 1 and 5, got {}",
                satisfaction
            )));
        }
        let session = match self.session.as_mut() {
            Some(s) if s.completed_at.is_none() => s,
            _ => {
                return Err(CalibrationError::InvalidArgument(
                    "No active session to complete".to_string(),
                ))
            }
        };

        session.completed_at = Some(Utc::now());
        session.final_satisfaction = Some(satisfaction);
        session.final_feedback = feedback;

        info!("Completed session with satisfaction {}", satisfaction);
        Ok(())
    }

    /// Adopt the id assigned by the durable store, propagating it onto
    /// every checkpoint already in the ledger. Idempotent: rebinding the
    /// same id is a no-op.
    pub fn bind_session_id(&mut self, session_id: &str) -> Result<(), CalibrationError> {
        let session = self.session.as_mut().ok_or_else(|| {
            CalibrationError::InvalidArgument("No session to bind an id to".to_string())
        })?;

        if session.id == session_id {
            return Ok(());
        }
        session.id = session_id.to_string();
        self.ledger.bind_session_id(session_id);

        debug!("Bound session id {}", session_id);
        Ok(())
    }

    /// Discard everything and return to the initial empty configuration.
    /// Available from any state.
    pub fn reset(&mut self) {
        self.session = None;
        self.ledger.clear();
        self.tv_model = None;
        self.tv_settings.clear();
        self.environment = None;
        self.current_settings = Settings::new();

        info!("Session state reset");
    }

    // --- Queries ---

    pub fn phase(&self) -> SessionPhase {
        match &self.session {
            None => SessionPhase::Idle,
            Some(s) if s.completed_at.is_some() => SessionPhase::Completed,
            Some(_) => SessionPhase::Active,
        }
    }

    pub fn session(&self) -> Option<&CalibrationSession> {
        self.session.as_ref()
    }

    /// The settings considered active for display and restoration.
    pub fn current_settings(&self) -> &Settings {
        &self.current_settings
    }

    pub fn current_checkpoint(&self) -> Option<&Checkpoint> {
        self.ledger.current()
    }

    /// All checkpoints in creation order.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        self.ledger.all()
    }

    /// Checkpoints ordered for history display, most recent first.
    pub fn checkpoints_newest_first(&self) -> Vec<&Checkpoint> {
        self.ledger.newest_first()
    }

    pub fn checkpoint_count(&self) -> usize {
        self.ledger.count()
    }

    /// Whether there is anywhere to roll back to (more than just the
    /// baseline checkpoint).
    pub fn can_rollback(&self) -> bool {
        self.ledger.count() > 1
    }

    pub fn checkpoint_labels(&self) -> Vec<&str> {
        self.ledger.all().iter().map(|cp| cp.label.as_str()).collect()
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    pub fn tv_model(&self) -> Option<&TvModel> {
        self.tv_model.as_ref()
    }

    /// Per-setting metadata for the session's model.
    pub fn tv_setting_metadata(&self) -> &[SettingMetadata] {
        &self.tv_settings
    }

    fn require_active(&self) -> Result<&CalibrationSession, CalibrationError> {
        match &self.session {
            Some(s) if s.completed_at.is_none() => Ok(s),
            Some(_) => Err(CalibrationError::InvalidArgument(
                "Session is already completed".to_string(),
            )),
            None => Err(CalibrationError::InvalidArgument(
                "No active session".to_string(),
            )),
        }
    }

    fn require_session(&self) -> Result<&CalibrationSession, CalibrationError> {
        self.session.as_ref().ok_or_else(|| {
            CalibrationError::InvalidArgument("No active session".to_string())
        })
    }
}
