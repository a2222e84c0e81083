// Managed-element gateway facade
// The element is the external device abstraction the steps push commands to
// and observe convergence on. Table and parameter ids come from the
// element's protocol and are positional contracts, not tunables.

pub mod errors;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use errors::GatewayError;
pub use http::HttpElementGateway;

/// Table listing the element's in-flight scan channels.
pub const SCAN_CHANNELS_TABLE: u32 = 1310;

/// Column of [`SCAN_CHANNELS_TABLE`] carrying the scan request title.
pub const SCAN_TITLE_COLUMN: usize = 13;

/// Table listing per-channel status rows.
pub const CHANNEL_STATUS_TABLE: u32 = 240;

/// Column of [`CHANNEL_STATUS_TABLE`] matched against the channel pattern.
pub const CHANNEL_MATCH_COLUMN: u32 = 248;

/// Keyed parameter toggling monitoring per channel-status row.
pub const MONITORING_PARAMETER: u32 = 356;

/// Standalone parameter receiving the serialized scan request payload.
pub const SCAN_REQUEST_PARAMETER: u32 = 3;

/// Value written to [`MONITORING_PARAMETER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monitoring {
    Off,
    On,
}

impl Monitoring {
    pub fn code(self) -> u8 {
        match self {
            Monitoring::Off => 0,
            Monitoring::On => 1,
        }
    }
}

/// One row of an element table. Cells are positional; specific columns carry
/// specific semantic fields (see the column constants above).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow(pub Vec<String>);

impl TableRow {
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Primary key of the row, by convention the first cell.
    pub fn key(&self) -> &str {
        self.cell(0).unwrap_or_default()
    }
}

/// Equality filter on one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnFilter {
    pub pid: u32,
    pub value: String,
}

/// Read/write access to a remote managed element. Reads are used by the
/// convergence probes and must stay side-effect free; writes happen once,
/// before polling begins.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ElementGateway: Send + Sync {
    /// Query a table, optionally filtered by column equality. A missing
    /// table reads as an empty row set.
    async fn query_table(
        &self,
        element: &str,
        table_id: u32,
        filters: &[ColumnFilter],
    ) -> Result<Vec<TableRow>, GatewayError>;

    /// Push a scalar value to a standalone parameter.
    async fn set_parameter(
        &self,
        element: &str,
        parameter_id: u32,
        value: &str,
    ) -> Result<(), GatewayError>;

    /// Push a value to one row of a keyed parameter.
    async fn set_parameter_by_key(
        &self,
        element: &str,
        parameter_id: u32,
        key: &str,
        value: &str,
    ) -> Result<(), GatewayError>;
}
