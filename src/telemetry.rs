use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize tracing with JSON output for structured logging.
/// The orchestrator only ever sees success/error; everything diagnostic
/// goes through this sink.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("tag-provision telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking the log lines of one invocation
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span carrying the common attributes of one step invocation
pub fn create_step_span(step: &str, instance_id: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "workflow_step",
        step.name = step,
        instance.id = instance_id,
        correlation.id = correlation_id,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Major,
    Critical,
}

/// Timestamped report pushed to the structured log sink for anomalies the
/// orchestrator itself never sees (it only gets success/error).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub step: String,
    pub affected_item: String,
    pub severity: Severity,
    pub code: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
    pub fn new(
        step: &str,
        affected_item: &str,
        severity: Severity,
        code: &str,
        description: String,
    ) -> Self {
        Self {
            step: step.to_string(),
            affected_item: affected_item.to_string(),
            severity,
            code: code.to_string(),
            description,
            timestamp: Utc::now(),
        }
    }

    pub fn emit(&self) {
        let payload = serde_json::to_string(self).unwrap_or_default();
        match self.severity {
            Severity::Warning => tracing::warn!(report = %payload, "step report"),
            _ => tracing::error!(report = %payload, "step report"),
        }
    }
}
