//! Notification dispatch: best effort, never part of the update contract.
//!
//! The update response is complete before any notification runs.
//! Failures are logged and go nowhere else; they are never surfaced to
//! the caller, never retried synchronously, and never roll anything
//! back.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::model::{Shipment, TrackingEvent};

/// An external collaborator told about recorded tracking events
/// (email, push, webhooks).
///
/// The concrete implementation is owned by the process entry point and
/// injected into the update flow.
pub trait Notifier: Send + Sync {
    fn shipment_updated(&self, shipment: &Shipment, event: &TrackingEvent) -> Result<(), String>;
}

/// Dispatches one notification on its own thread.
///
/// The returned handle lets a caller that is about to exit wait for
/// the attempt to finish; ignoring it is equally valid.
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    shipment: Shipment,
    event: TrackingEvent,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = notifier.shipment_updated(&shipment, &event) {
            eprintln!(
                "warning: notification for {} failed: {e}",
                shipment.tracking_number
            );
        }
    })
}

/// Writes a one-line summary to stderr instead of sending anything.
///
/// The default collaborator for the admin CLI; real transports replace
/// it at the entry point.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn shipment_updated(&self, shipment: &Shipment, event: &TrackingEvent) -> Result<(), String> {
        eprintln!(
            "notify: {} is now {} ({}%)",
            shipment.tracking_number, event.status, event.progress
        );
        Ok(())
    }
}

/// Discards notifications. Used when they are disabled in config.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn shipment_updated(&self, _: &Shipment, _: &TrackingEvent) -> Result<(), String> {
        Ok(())
    }
}
