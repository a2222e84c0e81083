use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, Instrument};

use tag_provision::{
    config, create_step_span, generate_correlation_id, init_config, init_telemetry, ChannelInput,
    ErrorReport, HttpElementGateway, HttpInstanceStore, InstanceId, MonitoringStep, ScannerInput,
    ScannerStep, Severity, StepError, StepOutcome,
};

#[derive(Parser)]
#[command(name = "tag-provision")]
#[command(about = "Workflow steps for provisioning TAG-monitored channels and scanners")]
#[command(
    long_about = "Each subcommand is one synchronous step of an externally-orchestrated \
                  provisioning process: it reads the instance's status, pushes configuration \
                  to the managed element, polls for convergence where required, and reports \
                  success or error back to the orchestrator through the exit status."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push the monitoring flag for a channel and advance its workflow status
    UpdateMonitoring {
        /// Id of the channel instance in the process-automation store
        #[arg(long)]
        instance_id: InstanceId,
        /// Name of the managed element carrying the channel
        #[arg(long)]
        element: String,
        /// Display name of the channel
        #[arg(long)]
        channel_name: String,
        /// Value matched against the channel-status table
        #[arg(long)]
        channel_match: String,
        #[arg(long, default_value = "")]
        monitoring_mode: String,
        #[arg(long, default_value = "")]
        threshold: String,
        #[arg(long, default_value = "")]
        notification: String,
        #[arg(long, default_value = "")]
        encryption: String,
        #[arg(long, default_value = "")]
        kms: String,
    },
    /// Tear down a scanner's scan requests and converge its channels
    DeactivateScanner {
        /// Id of the scan instance in the process-automation store
        #[arg(long)]
        instance_id: InstanceId,
        #[arg(long)]
        asset_id: String,
        #[arg(long)]
        scan_name: String,
        #[arg(long, default_value = "")]
        source_element: String,
        #[arg(long, default_value = "")]
        source_id: String,
        /// Device the scan requests are addressed to
        #[arg(long)]
        tag_device: String,
        /// Managed element holding the scan tables
        #[arg(long)]
        tag_element: String,
        #[arg(long)]
        tag_interface: String,
        #[arg(long)]
        scan_type: String,
        #[arg(long)]
        action: String,
        /// Child channel instance ids (repeatable)
        #[arg(long = "channel")]
        channels: Vec<InstanceId>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry()?;
    init_config()?;
    let cli = Cli::parse();

    let cfg = config()?;
    let store = HttpInstanceStore::new(&cfg.platform.store_url, cfg.platform.token.clone());
    let gateway = HttpElementGateway::new(&cfg.platform.gateway_url, cfg.platform.token.clone());
    let correlation_id = generate_correlation_id();

    match cli.command {
        Commands::UpdateMonitoring {
            instance_id,
            element,
            channel_name,
            channel_match,
            monitoring_mode,
            threshold,
            notification,
            encryption,
            kms,
        } => {
            let input = ChannelInput {
                instance_id,
                element_name: element,
                channel_name,
                channel_match,
                monitoring_mode,
                threshold,
                notification,
                encryption,
                kms,
            };
            let span = create_step_span(
                "update_monitoring",
                &input.instance_id.to_string(),
                &correlation_id,
            );
            let id = input.instance_id;
            let result = MonitoringStep::new(&store, &gateway)
                .run(&input)
                .instrument(span)
                .await;
            report("update_monitoring", id, result)
        }
        Commands::DeactivateScanner {
            instance_id,
            asset_id,
            scan_name,
            source_element,
            source_id,
            tag_device,
            tag_element,
            tag_interface,
            scan_type,
            action,
            channels,
        } => {
            let input = ScannerInput {
                instance_id,
                asset_id,
                scan_name,
                source_element,
                source_id,
                tag_device,
                tag_element,
                tag_interface,
                scan_type,
                action,
                channels,
            };
            let span = create_step_span(
                "deactivate_scanner",
                &input.instance_id.to_string(),
                &correlation_id,
            );
            let id = input.instance_id;
            let result = ScannerStep::new(&store, &gateway, cfg.poll.settings())
                .run(&input)
                .instrument(span)
                .await;
            report("deactivate_scanner", id, result)
        }
    }
}

/// Map the step outcome onto the ternary orchestrator signal. The final
/// stdout line is the machine-readable signal; diagnostics go to the
/// structured log.
fn report(
    step: &str,
    instance_id: InstanceId,
    result: Result<StepOutcome, StepError>,
) -> Result<()> {
    match result {
        Ok(StepOutcome::Finish) => {
            info!(step, "step finished the workflow branch");
            println!("FINISH");
            Ok(())
        }
        Ok(StepOutcome::Continue) => {
            info!(step, "step completed");
            println!("SUCCESS");
            Ok(())
        }
        Ok(StepOutcome::Aborted) => {
            // Orchestrator teardown: quiet success, nothing left to do.
            println!("SUCCESS");
            Ok(())
        }
        Err(err) if err.is_abort() => {
            println!("SUCCESS");
            Ok(())
        }
        Err(err) => {
            error!(step, error = %err, "step failed");
            ErrorReport::new(
                step,
                &instance_id.to_string(),
                Severity::Major,
                "step_failed",
                err.to_string(),
            )
            .emit();
            println!("ERROR");
            Err(err.into())
        }
    }
}
