//! Change classification: is an update worth a history entry?
//!
//! The ledger exists to tell customers where their package is and what
//! is happening to it, not to audit every database write. Only status
//! and location movements count; pure field edits (sender phone,
//! declared value, agent contact details) never produce an entry.

use crate::reconcile::Snapshot;

/// What changed between two reconciled snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeFlags {
    pub status_changed: bool,
    pub location_changed: bool,
}

impl ChangeFlags {
    /// The composite "append a history entry" decision.
    pub fn is_significant(self) -> bool {
        self.status_changed || self.location_changed
    }
}

/// Compares pre- and post-update snapshots.
///
/// Location comparison is nullable-aware: a coordinate appearing or
/// disappearing counts as a change, two absent coordinates do not.
pub fn classify(before: &Snapshot, after: &Snapshot) -> ChangeFlags {
    ChangeFlags {
        status_changed: before.status != after.status,
        location_changed: before.location != after.location
            || before.latitude != after.latitude
            || before.longitude != after.longitude,
    }
}
