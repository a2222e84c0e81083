use tracing::info;

use super::{StepError, StepOutcome};
use crate::element::{
    ColumnFilter, ElementGateway, Monitoring, CHANNEL_MATCH_COLUMN, CHANNEL_STATUS_TABLE,
    MONITORING_PARAMETER,
};
use crate::requests::ChannelInput;
use crate::store::{InstanceStatus, InstanceStore, Transition};
use crate::telemetry::{ErrorReport, Severity};

const STEP_NAME: &str = "update_monitoring";

/// Monitoring-update step of the channel process.
///
/// Pushes the monitoring flag to every channel-status row matching the
/// channel pattern, then advances the instance along the channel workflow:
/// `deactivating` closes the branch out, `ready` moves to `in_progress`,
/// `in_progress` is left alone, anything else is logged and tolerated.
pub struct MonitoringStep<'a> {
    store: &'a dyn InstanceStore,
    gateway: &'a dyn ElementGateway,
}

impl<'a> MonitoringStep<'a> {
    pub fn new(store: &'a dyn InstanceStore, gateway: &'a dyn ElementGateway) -> Self {
        Self { store, gateway }
    }

    pub async fn run(&self, input: &ChannelInput) -> Result<StepOutcome, StepError> {
        let instance = self
            .store
            .read_by_id(input.instance_id)
            .await?
            .ok_or(StepError::InstanceNotFound(input.instance_id))?;
        let status = instance.status;

        // A deactivating channel stops being monitored, every other
        // in-flight status keeps monitoring on.
        let monitoring = if status == InstanceStatus::Deactivating {
            Monitoring::Off
        } else {
            Monitoring::On
        };

        let filters = [ColumnFilter {
            pid: CHANNEL_MATCH_COLUMN,
            value: input.channel_match.clone(),
        }];
        let rows = self
            .gateway
            .query_table(&input.element_name, CHANNEL_STATUS_TABLE, &filters)
            .await?;

        if rows.is_empty() {
            // Tolerated: the element may not have materialized the channel
            // yet. The step still advances the workflow.
            ErrorReport::new(
                STEP_NAME,
                &input.channel_name,
                Severity::Warning,
                "channel_not_found",
                format!(
                    "no rows matched '{}' in the channel-status table of {}",
                    input.channel_match, input.element_name
                ),
            )
            .emit();
        } else {
            for row in &rows {
                self.gateway
                    .set_parameter_by_key(
                        &input.element_name,
                        MONITORING_PARAMETER,
                        row.key(),
                        &monitoring.code().to_string(),
                    )
                    .await?;
            }
        }

        match status {
            InstanceStatus::Deactivating => {
                self.store
                    .request_transition(input.instance_id, Transition::DeactivatingToComplete)
                    .await?;
                info!(
                    channel = %input.channel_name,
                    element = %input.element_name,
                    "monitoring disabled, channel deactivation complete"
                );
                Ok(StepOutcome::Finish)
            }
            InstanceStatus::Ready => {
                self.store
                    .request_transition(input.instance_id, Transition::ReadyToInProgress)
                    .await?;
                Ok(StepOutcome::Continue)
            }
            InstanceStatus::InProgress => Ok(StepOutcome::Continue),
            other => {
                ErrorReport::new(
                    STEP_NAME,
                    &input.channel_name,
                    Severity::Warning,
                    "invalid_status_for_transition",
                    format!("status '{other}' has no monitoring transition, instance untouched"),
                )
                .emit();
                Ok(StepOutcome::Continue)
            }
        }
    }
}
