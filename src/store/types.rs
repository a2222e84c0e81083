use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a workflow instance in the process-automation store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub Uuid);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for InstanceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(InstanceId(Uuid::parse_str(s)?))
    }
}

/// Workflow status of an instance. The set of legal statuses is owned by the
/// store; anything this crate does not know about lands in `Other` so the
/// steps can treat it as the unexpected/catch-all case instead of failing to
/// decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Ready,
    InProgress,
    Deactivating,
    Deactivate,
    Reprovision,
    Complete,
    Draft,
    Active,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceStatus::Ready => write!(f, "ready"),
            InstanceStatus::InProgress => write!(f, "in_progress"),
            InstanceStatus::Deactivating => write!(f, "deactivating"),
            InstanceStatus::Deactivate => write!(f, "deactivate"),
            InstanceStatus::Reprovision => write!(f, "reprovision"),
            InstanceStatus::Complete => write!(f, "complete"),
            InstanceStatus::Draft => write!(f, "draft"),
            InstanceStatus::Active => write!(f, "active"),
            InstanceStatus::Other(other) => write!(f, "{other}"),
        }
    }
}

/// Named status transitions the steps may request. The store validates each
/// one against the instance's current status and applies it atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    DeactivateToDeactivating,
    DeactivatingToComplete,
    CompleteToReady,
    ReadyToInProgress,
    ActiveToComplete,
    ActiveToDraft,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::DeactivateToDeactivating => "deactivate_to_deactivating",
            Transition::DeactivatingToComplete => "deactivating_to_complete",
            Transition::CompleteToReady => "complete_to_ready",
            Transition::ReadyToInProgress => "ready_to_inprogress",
            Transition::ActiveToComplete => "active_to_complete",
            Transition::ActiveToDraft => "active_to_draft",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One manifest configured on a scan instance. Scan request names and target
/// urls are derived from these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub url: String,
}

/// A workflow instance as read from the store. Status only ever changes
/// through [`Transition`] requests, never by writing this struct back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub status: InstanceStatus,
    #[serde(default)]
    pub manifests: Vec<Manifest>,
}
