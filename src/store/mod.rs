// Instance store facade for the process-automation platform
// The store owns instance status; the steps only request named transitions.

pub mod client;
pub mod errors;
pub mod types;

pub use client::{HttpInstanceStore, InstanceStore};
pub use errors::StoreError;
pub use types::{Instance, InstanceId, InstanceStatus, Manifest, Transition};

#[cfg(any(test, feature = "testing"))]
pub use client::MockInstanceStore;
