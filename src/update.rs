//! The shipment update operation.
//!
//! One update runs: load → resolve the "before" snapshot → apply the
//! requested fields → write the side-channel back → classify → persist
//! the shipment → append a ledger entry when the change is significant
//! → dispatch a fire-and-forget notification.
//!
//! The load-then-write pair is guarded by the shipment's version; a
//! concurrent writer causes a reload-and-retry so the classifier and
//! the ledger always see a consistent before/after pair.

use std::sync::Arc;
use std::thread::JoinHandle;

use jiff::Timestamp;

use crate::classify::{self, ChangeFlags};
use crate::ledger;
use crate::model::{AgentInfo, Note, Shipment, TrackingEvent, UpdateRequest};
use crate::notify::{self, Notifier};
use crate::reconcile;
use crate::storage::{Storage, StorageError};

/// How many times a version-conflicted update is retried against a
/// fresh snapshot before giving up.
const MAX_ATTEMPTS: u32 = 3;

/// Errors surfaced to the caller of an update.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("no shipment with tracking number '{0}'")]
    NotFound(String),

    /// Rejected before any read or write.
    #[error("update request sets none of status, estimated delivery date, location, or note")]
    EmptyRequest,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The result of a successful update operation.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Every supplied field already matched; nothing was written and
    /// the ledger is untouched. Success, not an error.
    Unchanged { shipment: Shipment },

    /// The shipment's fields were durably updated.
    Applied {
        shipment: Shipment,
        flags: ChangeFlags,

        /// The appended ledger entry, when the change was significant
        /// and the append succeeded.
        event: Option<TrackingEvent>,

        /// Set when the shipment write succeeded but the ledger append
        /// failed. The shipment update stands; this is the known
        /// partial-failure window, surfaced instead of masked.
        history_error: Option<StorageError>,

        /// The in-flight notification, if one was dispatched. Callers
        /// about to exit may join it; nothing waits on it otherwise.
        notification: Option<JoinHandle<()>>,
    },
}

/// Applies an update request to the shipment with the given tracking
/// number.
pub fn apply_update(
    storage: &Storage,
    notifier: &Arc<dyn Notifier>,
    tracking_number: &str,
    request: &UpdateRequest,
) -> Result<UpdateOutcome, UpdateError> {
    if !request.has_mutable_field() {
        return Err(UpdateError::EmptyRequest);
    }

    let mut shipment = storage
        .find_by_tracking(tracking_number)
        .map_err(|e| match e {
            StorageError::TrackingNotFound(t) => UpdateError::NotFound(t),
            e => e.into(),
        })?;

    let mut attempts = 0;
    let (shipment, flags, event, history_error) = loop {
        attempts += 1;

        let before = reconcile::snapshot(&shipment);
        let now = Timestamp::now();

        let mut updated = shipment.clone();
        if !apply_fields(&mut updated, request, now) {
            return Ok(UpdateOutcome::Unchanged { shipment });
        }
        reconcile::sync_side_channel(&mut updated);

        let flags = classify::classify(&before, &reconcile::snapshot(&updated));

        updated.updated_at = now;
        match storage.update_shipment(&mut updated) {
            Ok(()) => {
                // The shipment fields are durable from here on. The
                // append is attempted regardless of anything downstream,
                // and its failure must not undo the update.
                match ledger::record_if_significant(storage, &updated, flags, now) {
                    Ok(event) => break (updated, flags, event, None),
                    Err(e) => {
                        eprintln!(
                            "warning: shipment {} updated but its history entry was not recorded: {e}",
                            updated.tracking_number
                        );
                        break (updated, flags, None, Some(e));
                    }
                }
            }
            Err(StorageError::VersionConflict { .. }) if attempts < MAX_ATTEMPTS => {
                // A concurrent writer got in between; reclassify
                // against the fresh row.
                shipment = storage.load_shipment(shipment.id)?;
            }
            Err(e) => return Err(e.into()),
        }
    };

    let notification = event
        .as_ref()
        .map(|event| notify::dispatch(Arc::clone(notifier), shipment.clone(), event.clone()));

    Ok(UpdateOutcome::Applied {
        shipment,
        flags,
        event,
        history_error,
        notification,
    })
}

/// Applies the request's fields onto the shipment, returning whether
/// anything actually differed.
fn apply_fields(shipment: &mut Shipment, request: &UpdateRequest, now: Timestamp) -> bool {
    let mut touched = false;

    if let Some(status) = request.status
        && shipment.status != status
    {
        shipment.status = status;
        touched = true;
    }

    if let Some(date) = request.estimated_delivery_date
        && shipment.estimated_delivery != Some(date)
    {
        shipment.estimated_delivery = Some(date);
        touched = true;
    }

    if let Some(name) = &request.current_location_name
        && shipment.current_location.as_deref() != Some(name)
    {
        shipment.current_location = Some(name.clone());
        touched = true;
    }

    if let Some(lat) = request.current_lat
        && shipment.current_lat != Some(lat)
    {
        shipment.current_lat = Some(lat);
        touched = true;
    }

    if let Some(lng) = request.current_lng
        && shipment.current_lng != Some(lng)
    {
        shipment.current_lng = Some(lng);
        touched = true;
    }

    if request.agent_name.is_some()
        || request.agent_phone.is_some()
        || request.agent_email.is_some()
    {
        let mut agent = shipment
            .assigned_agent
            .clone()
            .unwrap_or_else(|| AgentInfo::named(request.agent_name.clone().unwrap_or_default()));
        if let Some(name) = &request.agent_name {
            agent.name.clone_from(name);
        }
        if let Some(phone) = &request.agent_phone {
            agent.phone = Some(phone.clone());
        }
        if let Some(email) = &request.agent_email {
            agent.email = Some(email.clone());
        }
        if shipment.assigned_agent.as_ref() != Some(&agent) {
            shipment.assigned_agent = Some(agent);
            touched = true;
        }
    }

    if let Some(text) = &request.note {
        shipment.notes.push(Note {
            text: text.clone(),
            created_at: now,
        });
        touched = true;
    }

    touched
}
