//! Scan/channel request building.
//!
//! Requests are ephemeral value objects derived from instance data plus the
//! orchestrator-supplied parameters; they live only for the single outbound
//! element write. Request names are a pure function of that input, which is
//! what lets the convergence probe search for exactly the same titles later.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::{Instance, InstanceId};

/// Suffix the element expands per resolution/band when it materializes a
/// scan request into scan channels.
const SCAN_NAME_SUFFIX: &str = "#RES|BAND#";

/// Orchestrator-supplied parameters for the scanner-deactivation step.
#[derive(Debug, Clone)]
pub struct ScannerInput {
    pub instance_id: InstanceId,
    pub asset_id: String,
    pub scan_name: String,
    pub source_element: String,
    pub source_id: String,
    pub tag_device: String,
    pub tag_element: String,
    pub tag_interface: String,
    pub scan_type: String,
    pub action: String,
    pub channels: Vec<InstanceId>,
}

/// Orchestrator-supplied parameters for the monitoring-update step.
#[derive(Debug, Clone)]
pub struct ChannelInput {
    pub instance_id: InstanceId,
    pub element_name: String,
    pub channel_name: String,
    pub channel_match: String,
    pub monitoring_mode: String,
    pub threshold: String,
    pub notification: String,
    pub encryption: String,
    pub kms: String,
}

/// Action code understood by the element's scan request handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    Add,
    Delete,
}

impl TagAction {
    pub fn code(self) -> i32 {
        match self {
            TagAction::Add => 1,
            TagAction::Delete => 2,
        }
    }
}

/// One unit of work pushed to the element. Field names follow the element's
/// JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanRequest {
    pub action: i32,
    pub asset_id: String,
    pub interface: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub scan_type: String,
    pub url: String,
}

/// Envelope for the scan requests of one device.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagRequest {
    pub scan_requests: Vec<ScanRequest>,
}

/// Name of the scan request generated for one manifest.
pub fn scan_request_name(scan_name: &str, manifest_name: &str) -> String {
    format!("{scan_name} {manifest_name} {SCAN_NAME_SUFFIX}")
}

/// Build one scan request per manifest configured on the instance.
pub fn build_scan_requests(
    input: &ScannerInput,
    instance: &Instance,
    action: TagAction,
) -> Vec<ScanRequest> {
    instance
        .manifests
        .iter()
        .map(|manifest| ScanRequest {
            action: action.code(),
            asset_id: input.asset_id.clone(),
            interface: input.tag_interface.clone(),
            name: scan_request_name(&input.scan_name, &manifest.name),
            scan_type: input.scan_type.clone(),
            url: manifest.url.clone(),
        })
        .collect()
}

/// Titles the element will report for these requests, in request order.
pub fn request_titles(requests: &[ScanRequest]) -> Vec<String> {
    requests.iter().map(|request| request.name.clone()).collect()
}

/// Serialize the outbound payload: a map of device name to its requests.
pub fn request_payload(
    device: &str,
    requests: &[ScanRequest],
) -> Result<String, serde_json::Error> {
    let mut payload = BTreeMap::new();
    payload.insert(
        device.to_string(),
        TagRequest {
            scan_requests: requests.to_vec(),
        },
    );
    serde_json::to_string(&payload)
}
