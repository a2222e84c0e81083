// TAG Provision - workflow steps for provisioning monitored broadcast
// channels and scanners against the process-automation platform.
// This exposes the core components for testing and integration

pub mod config;
pub mod controller;
pub mod convergence;
pub mod element;
pub mod poll;
pub mod requests;
pub mod store;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, init_config, TagProvisionConfig};
pub use controller::{MonitoringStep, ScannerStep, StepError, StepOutcome};
pub use convergence::{expected_child_status, ScanConvergenceProbe};
pub use element::{
    ColumnFilter, ElementGateway, GatewayError, HttpElementGateway, Monitoring, TableRow,
};
pub use poll::{retry_until, PollSettings};
pub use requests::{
    build_scan_requests, request_payload, request_titles, scan_request_name, ChannelInput,
    ScanRequest, ScannerInput, TagAction, TagRequest,
};
pub use store::{
    HttpInstanceStore, Instance, InstanceId, InstanceStatus, InstanceStore, Manifest, StoreError,
    Transition,
};
pub use telemetry::{
    create_step_span, generate_correlation_id, init_telemetry, ErrorReport, Severity,
};
