//! Tracking events: the immutable history ledger entries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ShipmentStatus;

/// One entry in a shipment's history ledger.
///
/// Every field is a snapshot frozen at the instant the event was
/// recorded. Later changes to the shipment's location, agent, or the
/// progress catalog must never retroactively alter an event; the ledger
/// is append-only and entries are never mutated or deleted.
///
/// The field names are the persisted record names — external consumers
/// rebuild history from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub shipment_id: Uuid,

    /// The status at the time of this event.
    pub status: ShipmentStatus,

    /// Human-readable text synthesized from the status and/or the
    /// location delta when the event was recorded.
    pub description: String,

    pub timestamp: Timestamp,

    /// The resolved location name at that instant; never re-derived.
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// The agent name at that instant.
    pub handler: Option<String>,

    /// Progress frozen from the catalog valid at insertion time.
    pub progress: u8,
}
