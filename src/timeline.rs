//! Timeline building: from the event ledger to presentable steps.

use crate::model::{Shipment, TimelineStep, TrackingEvent};
use crate::reconcile;

/// Maps a shipment's ordered event history to timeline steps.
///
/// Every step is `completed` except the chronologically last, which is
/// `is_current` instead. Per-step progress is read from the stored
/// event's frozen value, never recomputed: the catalog could be retuned
/// later and must not rewrite history.
///
/// An empty ledger synthesizes exactly one step from the shipment's
/// present fields. That bootstrap step is the only place progress is
/// computed fresh, because no frozen record exists yet.
pub fn build_timeline(shipment: &Shipment, events: &[TrackingEvent]) -> Vec<TimelineStep> {
    if events.is_empty() {
        return vec![bootstrap_step(shipment)];
    }

    let last = events.len() - 1;
    events
        .iter()
        .enumerate()
        .map(|(index, event)| TimelineStep {
            status: event.status,
            location: event.location.clone(),
            timestamp: event.timestamp,
            completed: index != last,
            is_current: index == last,
            handler: event.handler.clone(),
            progress: event.progress,
        })
        .collect()
}

/// The display-only truncation rule: past four steps, show the first
/// step plus the last three.
///
/// Returns leading and trailing slices; anything between them was
/// elided. Applied after the full timeline is built so the
/// completed/current flags are always computed over the whole history.
pub fn display_window(steps: &[TimelineStep]) -> (&[TimelineStep], &[TimelineStep]) {
    if steps.len() <= 4 {
        (steps, &[])
    } else {
        (&steps[..1], &steps[steps.len() - 3..])
    }
}

/// The single synthesized step for a shipment with no history yet.
fn bootstrap_step(shipment: &Shipment) -> TimelineStep {
    let resolved = reconcile::resolve(shipment);
    TimelineStep {
        status: shipment.status,
        location: resolved.location.map(|location| location.name),
        timestamp: shipment.created_at,
        completed: false,
        is_current: true,
        handler: resolved.agent.map(|agent| agent.name),
        progress: shipment.status.progress(),
    }
}
