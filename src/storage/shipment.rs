//! Shipment storage: create, load, update, query by tracking number.

use jiff::{Timestamp, civil};
use rusqlite::Row;
use uuid::Uuid;

use crate::model::{Shipment, ShipmentStatus};

use super::{Result, Storage, StorageError};

const COLUMNS: &str = "id, tracking_number, status, sender, recipient, package, \
     estimated_delivery, current_location, current_lat, current_lng, \
     assigned_agent, notes, data, created_at, updated_at, version";

impl Storage {
    /// Inserts a new shipment row.
    pub fn create_shipment(&self, shipment: &Shipment) -> Result<()> {
        if self.shipment_exists(shipment.id)? {
            return Err(StorageError::ShipmentAlreadyExists(shipment.id));
        }
        self.conn().execute(
            "INSERT INTO shipment (id, tracking_number, status, sender, recipient, package,
                 estimated_delivery, current_location, current_lat, current_lng,
                 assigned_agent, notes, data, created_at, updated_at, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            rusqlite::params![
                shipment.id.to_string(),
                &shipment.tracking_number,
                shipment.status.as_str(),
                serde_json::to_string(&shipment.sender)?,
                serde_json::to_string(&shipment.recipient)?,
                serde_json::to_string(&shipment.package)?,
                shipment.estimated_delivery.map(|d| d.to_string()),
                &shipment.current_location,
                shipment.current_lat,
                shipment.current_lng,
                shipment
                    .assigned_agent
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                serde_json::to_string(&shipment.notes)?,
                serde_json::to_string(&shipment.data)?,
                shipment.created_at.to_string(),
                shipment.updated_at.to_string(),
                shipment.version,
            ],
        )?;
        Ok(())
    }

    /// Writes a shipment's fields back, guarded by its version.
    ///
    /// The row is only updated when the stored version still matches
    /// `shipment.version`; on success the version is bumped in place.
    /// A concurrent writer in between yields [`StorageError::VersionConflict`]
    /// so the caller can reload and retry.
    pub fn update_shipment(&self, shipment: &mut Shipment) -> Result<()> {
        let expected = shipment.version;
        let rows = self.conn().execute(
            "UPDATE shipment
             SET status = ?1, sender = ?2, recipient = ?3, package = ?4,
                 estimated_delivery = ?5, current_location = ?6,
                 current_lat = ?7, current_lng = ?8, assigned_agent = ?9,
                 notes = ?10, data = ?11, updated_at = ?12, version = ?13
             WHERE id = ?14 AND version = ?15",
            rusqlite::params![
                shipment.status.as_str(),
                serde_json::to_string(&shipment.sender)?,
                serde_json::to_string(&shipment.recipient)?,
                serde_json::to_string(&shipment.package)?,
                shipment.estimated_delivery.map(|d| d.to_string()),
                &shipment.current_location,
                shipment.current_lat,
                shipment.current_lng,
                shipment
                    .assigned_agent
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
                serde_json::to_string(&shipment.notes)?,
                serde_json::to_string(&shipment.data)?,
                shipment.updated_at.to_string(),
                expected + 1,
                shipment.id.to_string(),
                expected,
            ],
        )?;
        if rows == 0 {
            if self.shipment_exists(shipment.id)? {
                return Err(StorageError::VersionConflict {
                    id: shipment.id,
                    version: expected,
                });
            }
            return Err(StorageError::ShipmentNotFound(shipment.id));
        }
        shipment.version = expected + 1;
        Ok(())
    }

    /// Loads a single shipment by id.
    pub fn load_shipment(&self, id: Uuid) -> Result<Shipment> {
        let query = format!("SELECT {COLUMNS} FROM shipment WHERE id = ?1");
        let raw = self
            .conn()
            .query_row(&query, [id.to_string()], raw_shipment)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::ShipmentNotFound(id),
                e => e.into(),
            })?;
        shipment_from_raw(raw)
    }

    /// Loads a shipment by its public tracking number.
    pub fn find_by_tracking(&self, tracking_number: &str) -> Result<Shipment> {
        let query = format!("SELECT {COLUMNS} FROM shipment WHERE tracking_number = ?1");
        let raw = self
            .conn()
            .query_row(&query, [tracking_number], raw_shipment)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::TrackingNotFound(tracking_number.to_string())
                }
                e => e.into(),
            })?;
        shipment_from_raw(raw)
    }

    /// Lists all shipments, oldest first.
    pub fn list_shipments(&self) -> Result<Vec<Shipment>> {
        let query = format!("SELECT {COLUMNS} FROM shipment ORDER BY created_at");
        let mut stmt = self.conn().prepare(&query)?;
        let rows = stmt.query_map([], raw_shipment)?;

        let mut shipments = Vec::new();
        for raw in rows {
            shipments.push(shipment_from_raw(raw?)?);
        }
        Ok(shipments)
    }

    pub(super) fn shipment_exists(&self, id: Uuid) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM shipment WHERE id = ?1",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

/// Column values as stored, before parsing into domain types.
struct RawShipment {
    id: String,
    tracking_number: String,
    status: String,
    sender: String,
    recipient: String,
    package: String,
    estimated_delivery: Option<String>,
    current_location: Option<String>,
    current_lat: Option<f64>,
    current_lng: Option<f64>,
    assigned_agent: Option<String>,
    notes: String,
    data: String,
    created_at: String,
    updated_at: String,
    version: i64,
}

fn raw_shipment(row: &Row<'_>) -> rusqlite::Result<RawShipment> {
    Ok(RawShipment {
        id: row.get(0)?,
        tracking_number: row.get(1)?,
        status: row.get(2)?,
        sender: row.get(3)?,
        recipient: row.get(4)?,
        package: row.get(5)?,
        estimated_delivery: row.get(6)?,
        current_location: row.get(7)?,
        current_lat: row.get(8)?,
        current_lng: row.get(9)?,
        assigned_agent: row.get(10)?,
        notes: row.get(11)?,
        data: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
        version: row.get(15)?,
    })
}

/// Rebuilds a `Shipment` from raw column values.
fn shipment_from_raw(raw: RawShipment) -> Result<Shipment> {
    let id = raw
        .id
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid shipment id: {e}")))?;
    let status = raw
        .status
        .parse::<ShipmentStatus>()
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;
    let estimated_delivery = raw
        .estimated_delivery
        .as_deref()
        .map(str::parse::<civil::Date>)
        .transpose()
        .map_err(|e| StorageError::Corrupt(format!("invalid estimated_delivery: {e}")))?;
    let created_at = parse_timestamp(&raw.created_at, "created_at")?;
    let updated_at = parse_timestamp(&raw.updated_at, "updated_at")?;

    Ok(Shipment {
        id,
        tracking_number: raw.tracking_number,
        status,
        sender: serde_json::from_str(&raw.sender)?,
        recipient: serde_json::from_str(&raw.recipient)?,
        package: serde_json::from_str(&raw.package)?,
        estimated_delivery,
        current_location: raw.current_location,
        current_lat: raw.current_lat,
        current_lng: raw.current_lng,
        assigned_agent: raw
            .assigned_agent
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
        notes: serde_json::from_str(&raw.notes)?,
        data: serde_json::from_str(&raw.data)?,
        created_at,
        updated_at,
        version: raw.version,
    })
}

fn parse_timestamp(value: &str, column: &str) -> Result<Timestamp> {
    value
        .parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}")))
}
