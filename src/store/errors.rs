use thiserror::Error;

use super::types::InstanceId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no instance found with id {0}")]
    NotFound(InstanceId),

    #[error("transition {transition} rejected for instance {id}: {reason}")]
    InvalidTransition {
        id: InstanceId,
        transition: &'static str,
        reason: String,
    },

    /// The orchestrator tore the step down while a store call was in flight.
    /// Callers treat this as a normal early exit, not a failure.
    #[error("step aborted by the orchestrator")]
    Aborted,

    #[error("instance store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("instance store returned HTTP {status}: {body}")]
    Unexpected { status: u16, body: String },
}
