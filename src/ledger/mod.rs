//! The checkpoint ledger: an append-only, creation-ordered history of
//! settings snapshots with point-in-time rollback and post-hoc analysis
//! and feedback attachments.

mod store;
mod types;

pub use store::CheckpointLedger;
pub use types::{
    AdjustDirection, AiAnalysis, Checkpoint, Observation, PatternCapture, PatternResult,
    Recommendation, UserFeedback,
};
