//! Tracking-event storage: append and ordered load only.
//!
//! There is deliberately no update or delete here. Once written, an
//! event is immutable; the ledger only ever grows.

use jiff::Timestamp;
use rusqlite::Row;
use uuid::Uuid;

use crate::model::{ShipmentStatus, TrackingEvent};

use super::{Result, Storage, StorageError};

impl Storage {
    /// Appends one event to a shipment's ledger.
    pub fn append_event(&self, event: &TrackingEvent) -> Result<()> {
        if !self.shipment_exists(event.shipment_id)? {
            return Err(StorageError::ShipmentNotFound(event.shipment_id));
        }
        self.conn().execute(
            "INSERT INTO tracking_event (shipment_id, status, description, timestamp,
                 location, latitude, longitude, handler, progress)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                event.shipment_id.to_string(),
                event.status.as_str(),
                &event.description,
                event.timestamp.to_string(),
                &event.location,
                event.latitude,
                event.longitude,
                &event.handler,
                event.progress,
            ],
        )?;
        Ok(())
    }

    /// Loads a shipment's full ledger, oldest first.
    ///
    /// Rows come back in insertion order and are then stably sorted by
    /// parsed timestamp, so insertion order breaks ties.
    pub fn load_events(&self, shipment_id: Uuid) -> Result<Vec<TrackingEvent>> {
        if !self.shipment_exists(shipment_id)? {
            return Err(StorageError::ShipmentNotFound(shipment_id));
        }
        let mut stmt = self.conn().prepare(
            "SELECT shipment_id, status, description, timestamp,
                    location, latitude, longitude, handler, progress
             FROM tracking_event
             WHERE shipment_id = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map([shipment_id.to_string()], raw_event)?;

        let mut events = Vec::new();
        for raw in rows {
            events.push(event_from_raw(raw?)?);
        }
        events.sort_by_key(|event| event.timestamp);
        Ok(events)
    }
}

struct RawEvent {
    shipment_id: String,
    status: String,
    description: String,
    timestamp: String,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    handler: Option<String>,
    progress: u8,
}

fn raw_event(row: &Row<'_>) -> rusqlite::Result<RawEvent> {
    Ok(RawEvent {
        shipment_id: row.get(0)?,
        status: row.get(1)?,
        description: row.get(2)?,
        timestamp: row.get(3)?,
        location: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        handler: row.get(7)?,
        progress: row.get(8)?,
    })
}

fn event_from_raw(raw: RawEvent) -> Result<TrackingEvent> {
    let shipment_id = raw
        .shipment_id
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid event shipment id: {e}")))?;
    let status = raw
        .status
        .parse::<ShipmentStatus>()
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;
    let timestamp = raw
        .timestamp
        .parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid event timestamp: {e}")))?;

    Ok(TrackingEvent {
        shipment_id,
        status,
        description: raw.description,
        timestamp,
        location: raw.location,
        latitude: raw.latitude,
        longitude: raw.longitude,
        handler: raw.handler,
        progress: raw.progress,
    })
}
