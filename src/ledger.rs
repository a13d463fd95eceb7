//! The history ledger: constructing and appending tracking events.
//!
//! An event captures status, location, coordinates, handler, and
//! progress exactly as they are at the instant of a significant change.
//! Everything is stamped from the post-update resolved view, so a
//! status-only update carries the previously known location forward
//! instead of blanking it out.

use jiff::Timestamp;

use crate::classify::ChangeFlags;
use crate::model::{Shipment, ShipmentStatus, TrackingEvent};
use crate::reconcile;
use crate::storage::{Result, Storage};

/// Builds the event for a significant change, or `None` when the
/// change flags say nothing ledger-worthy happened.
///
/// Repeated identical updates classify as not-significant and build
/// nothing, which is what keeps the ledger idempotent.
pub fn build_event(
    shipment: &Shipment,
    flags: ChangeFlags,
    now: Timestamp,
) -> Option<TrackingEvent> {
    if !flags.is_significant() {
        return None;
    }

    let resolved = reconcile::resolve(shipment);
    let (location, latitude, longitude) = match resolved.location {
        Some(location) => (Some(location.name), location.lat, location.lng),
        None => (None, None, None),
    };

    Some(TrackingEvent {
        shipment_id: shipment.id,
        status: shipment.status,
        description: describe_change(shipment.status, location.as_deref(), flags),
        timestamp: now,
        location,
        latitude,
        longitude,
        handler: resolved.agent.map(|agent| agent.name),
        progress: shipment.status.progress(),
    })
}

/// Builds and appends the event for a significant change.
///
/// Returns `Ok(None)` without writing when the change is not
/// significant. A storage error here means the shipment's own fields
/// were already updated; the caller surfaces it as a distinct
/// "history not recorded" condition rather than rolling anything back.
pub fn record_if_significant(
    storage: &Storage,
    shipment: &Shipment,
    flags: ChangeFlags,
    now: Timestamp,
) -> Result<Option<TrackingEvent>> {
    let Some(event) = build_event(shipment, flags, now) else {
        return Ok(None);
    };
    storage.append_event(&event)?;
    Ok(Some(event))
}

/// Synthesizes the event description from what changed.
///
/// Both changed: one sentence combining the status description and the
/// new location. Only one changed: describe only that one.
fn describe_change(status: ShipmentStatus, location: Option<&str>, flags: ChangeFlags) -> String {
    match (flags.status_changed, location) {
        (true, Some(location)) if flags.location_changed => {
            format!("{}. Now at {location}.", status.describe())
        }
        (true, _) => status.describe().to_string(),
        (false, Some(location)) => format!("Package location updated to {location}."),
        (false, None) => "Package location updated.".to_string(),
    }
}
