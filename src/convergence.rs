//! Convergence probe for scanner deactivation.
//!
//! The probe is a plain value built once, before polling starts, from the
//! same input data the outbound write was derived from. Every `check` is a
//! pure observation: it reads the element's scan-channels table and re-reads
//! each child channel instance, and never mutates anything.

use tracing::debug;

use crate::controller::StepError;
use crate::element::{ElementGateway, SCAN_CHANNELS_TABLE, SCAN_TITLE_COLUMN};
use crate::requests::{request_titles, ScanRequest};
use crate::store::{InstanceId, InstanceStatus, InstanceStore};

/// Target status the child channels must reach, derived from the scanner's
/// own status: a deactivating scanner completes its channels, any other
/// in-flight status sends them back to draft.
pub fn expected_child_status(status: &InstanceStatus) -> InstanceStatus {
    if *status == InstanceStatus::Deactivating {
        InstanceStatus::Complete
    } else {
        InstanceStatus::Draft
    }
}

/// Everything one scanner poll needs to observe convergence, captured by
/// value before the retry loop starts.
#[derive(Debug, Clone)]
pub struct ScanConvergenceProbe {
    element: String,
    titles: Vec<String>,
    channels: Vec<InstanceId>,
    expected_child_status: InstanceStatus,
}

impl ScanConvergenceProbe {
    pub fn new(
        element: impl Into<String>,
        requests: &[ScanRequest],
        channels: Vec<InstanceId>,
        status: &InstanceStatus,
    ) -> Self {
        Self {
            element: element.into(),
            titles: request_titles(requests),
            channels,
            expected_child_status: expected_child_status(status),
        }
    }

    /// Titles this probe matches against the scan-channels table.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// One observation pass. True only when the element has cleared every
    /// expected request title AND every child channel sits at the target
    /// status; partial convergence stays false.
    pub async fn check(
        &self,
        gateway: &dyn ElementGateway,
        store: &dyn InstanceStore,
    ) -> Result<bool, StepError> {
        let rows = gateway
            .query_table(&self.element, SCAN_CHANNELS_TABLE, &[])
            .await?;

        // An empty (or missing) table means the element processed everything.
        let element_cleared = rows.iter().all(|row| match row.cell(SCAN_TITLE_COLUMN) {
            Some(title) => !self.titles.iter().any(|expected| expected == title),
            None => true,
        });

        let mut children_converged = true;
        for channel in &self.channels {
            let child = store
                .read_by_id(*channel)
                .await?
                .ok_or(StepError::InstanceNotFound(*channel))?;
            if child.status != self.expected_child_status {
                children_converged = false;
                break;
            }
        }

        debug!(
            element = %self.element,
            element_cleared,
            children_converged,
            "scan convergence probe"
        );
        Ok(element_cleared && children_converged)
    }
}
