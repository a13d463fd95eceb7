//! Timeline steps: the UI-ready view of a shipment's history.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ShipmentStatus;

/// One step in a shipment's presentable timeline.
///
/// Derived on every read from the tracking-event ledger (or synthesized
/// from the shipment itself when the ledger is empty); never persisted
/// or cached beyond the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub status: ShipmentStatus,
    pub location: Option<String>,
    pub timestamp: Timestamp,

    /// True for every step except the chronologically last.
    pub completed: bool,

    /// True only for the chronologically last step.
    pub is_current: bool,

    pub handler: Option<String>,
    pub progress: u8,
}
