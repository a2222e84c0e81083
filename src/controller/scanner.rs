use tracing::{info, warn};

use super::{StepError, StepOutcome};
use crate::convergence::ScanConvergenceProbe;
use crate::element::{ElementGateway, SCAN_REQUEST_PARAMETER};
use crate::poll::{retry_until, PollSettings};
use crate::requests::{build_scan_requests, request_payload, ScannerInput, TagAction};
use crate::store::{InstanceStatus, InstanceStore, Transition};

/// Scanner-deactivation step of the scan process.
///
/// Acts only on `deactivate` and `reprovision` scanners. Pushes exactly one
/// delete payload to the element before polling begins, moves the child
/// channels once, then polls until the element clears the scan rows and the
/// children reach their target status.
pub struct ScannerStep<'a> {
    store: &'a dyn InstanceStore,
    gateway: &'a dyn ElementGateway,
    poll: PollSettings,
}

impl<'a> ScannerStep<'a> {
    pub fn new(
        store: &'a dyn InstanceStore,
        gateway: &'a dyn ElementGateway,
        poll: PollSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            poll,
        }
    }

    pub async fn run(&self, input: &ScannerInput) -> Result<StepOutcome, StepError> {
        let Some(mut instance) = self.store.read_by_id(input.instance_id).await? else {
            info!(instance = %input.instance_id, "no scan instance found, nothing to deactivate");
            return Ok(StepOutcome::Continue);
        };
        let mut status = instance.status.clone();

        if status != InstanceStatus::Deactivate && status != InstanceStatus::Reprovision {
            return Ok(StepOutcome::Continue);
        }

        if status == InstanceStatus::Deactivate {
            self.store
                .request_transition(input.instance_id, Transition::DeactivateToDeactivating)
                .await?;

            // The store may normalize or reject the transition; act on the
            // freshest status, never the one read before the request.
            instance = self
                .store
                .read_by_id(input.instance_id)
                .await?
                .ok_or(StepError::InstanceNotFound(input.instance_id))?;
            status = instance.status.clone();
        }

        let requests = build_scan_requests(input, &instance, TagAction::Delete);
        let payload = request_payload(&input.tag_device, &requests)?;

        // The one mutating element write of this invocation. Only its effect
        // is observed repeatedly below, the write itself is never retried.
        self.gateway
            .set_parameter(&input.tag_element, SCAN_REQUEST_PARAMETER, &payload)
            .await?;

        let channel_transition = if status == InstanceStatus::Deactivating {
            Transition::ActiveToComplete
        } else {
            Transition::ActiveToDraft
        };
        for channel in &input.channels {
            self.store
                .request_transition(*channel, channel_transition)
                .await?;
        }

        let probe = ScanConvergenceProbe::new(
            input.tag_element.clone(),
            &requests,
            input.channels.clone(),
            &status,
        );
        let converged = retry_until(
            || probe.check(self.gateway, self.store),
            self.poll.delay,
            self.poll.timeout,
        )
        .await?;

        if converged {
            match status {
                InstanceStatus::Deactivating => {
                    self.store
                        .request_transition(input.instance_id, Transition::DeactivatingToComplete)
                        .await?;
                    info!(scan = %input.scan_name, "scanner deactivated");
                    Ok(StepOutcome::Finish)
                }
                InstanceStatus::Reprovision => {
                    self.store
                        .request_transition(input.instance_id, Transition::CompleteToReady)
                        .await?;
                    info!(scan = %input.scan_name, "scanner reset for reprovisioning");
                    Ok(StepOutcome::Continue)
                }
                other => Err(StepError::UnexpectedState { status: other }),
            }
        } else {
            warn!(
                scan = %input.scan_name,
                element = %input.tag_element,
                "scan rows still present after the poll window"
            );
            Err(StepError::ConvergenceTimeout {
                timeout: self.poll.timeout,
            })
        }
    }
}
