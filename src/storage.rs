//! Local persistence for shipments and their tracking-event ledger.
//!
//! One SQLite database file under the data root:
//!
//! ```text
//! <root>/waybill.sqlite
//!   shipment        # one row per shipment; sub-records as JSON text
//!   tracking_event  # append-only history ledger
//! ```
//!
//! Enum-valued and structured columns are stored as strings and rebuilt
//! through explicit helpers; malformed rows surface as [`StorageError::Corrupt`].
//! The event table has no update or delete path — append-only is
//! enforced by the API surface.

mod event;
mod shipment;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("shipment not found: {0}")]
    ShipmentNotFound(Uuid),

    #[error("no shipment with tracking number '{0}'")]
    TrackingNotFound(String),

    #[error("shipment already exists: {0}")]
    ShipmentAlreadyExists(Uuid),

    /// The row changed under the caller; reload and retry.
    #[error("shipment {id} was modified concurrently (stale version {version})")]
    VersionConflict { id: Uuid, version: i64 },

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// SQLite-backed storage for shipments and tracking events.
pub struct Storage {
    conn: Connection,
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS shipment (
        id                 TEXT PRIMARY KEY,
        tracking_number    TEXT NOT NULL UNIQUE,
        status             TEXT NOT NULL,
        sender             TEXT NOT NULL,
        recipient          TEXT NOT NULL,
        package            TEXT NOT NULL,
        estimated_delivery TEXT,
        current_location   TEXT,
        current_lat        REAL,
        current_lng        REAL,
        assigned_agent     TEXT,
        notes              TEXT NOT NULL,
        data               TEXT NOT NULL,
        created_at         TEXT NOT NULL,
        updated_at         TEXT NOT NULL,
        version            INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tracking_event (
        shipment_id TEXT NOT NULL,
        status      TEXT NOT NULL,
        description TEXT NOT NULL,
        timestamp   TEXT NOT NULL,
        location    TEXT,
        latitude    REAL,
        longitude   REAL,
        handler     TEXT,
        progress    INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS tracking_event_by_shipment
        ON tracking_event (shipment_id, timestamp);
";

impl Storage {
    /// Opens (creating if needed) the database under the given root.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join("waybill.sqlite"))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Returns the default data root: `~/.waybill/data/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waybill").join("data"))
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
