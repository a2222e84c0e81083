// Transition controllers for the two workflow steps
// Each step reads the freshest instance status, pushes at most one mutating
// element write, polls for convergence where required, and requests the
// forward transition that matches what it observed.

pub mod monitoring;
pub mod scanner;

use std::time::Duration;
use thiserror::Error;

use crate::element::GatewayError;
use crate::store::{InstanceId, InstanceStatus, StoreError};

pub use monitoring::MonitoringStep;
pub use scanner::ScannerStep;

/// Terminal outcome of one step invocation. This is the only business
/// return channel back to the orchestrator besides the transitions already
/// applied on the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step did its work for this activity; the process moves on.
    Continue,
    /// Step completed the whole workflow branch; the token handler should
    /// finish the process.
    Finish,
    /// The orchestrator tore the step down mid-flight. Not an error.
    Aborted,
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("no instance found with id {0}")]
    InstanceNotFound(InstanceId),

    #[error("convergence not reached within {timeout:?}")]
    ConvergenceTimeout { timeout: Duration },

    #[error("poll succeeded from unexpected status {status}")]
    UnexpectedState { status: InstanceStatus },

    #[error("failed to encode scan request payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(StoreError),

    #[error("step aborted by the orchestrator")]
    Aborted,
}

impl From<StoreError> for StepError {
    fn from(err: StoreError) -> Self {
        match err {
            // Teardown by the orchestration layer is a normal early exit,
            // keep it distinguishable from real failures.
            StoreError::Aborted => StepError::Aborted,
            other => StepError::Store(other),
        }
    }
}

impl StepError {
    pub fn is_abort(&self) -> bool {
        matches!(self, StepError::Aborted)
    }
}
