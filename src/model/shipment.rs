//! Shipment: the root record for one package in transit.

use jiff::{Timestamp, civil};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::ShipmentStatus;

/// The loosely-typed side-channel map.
///
/// Historically this blob stored the agent and current location before
/// dedicated columns existed. It is still written on every update and
/// read as a fallback; unrelated keys must survive round-trips.
pub type SideChannel = serde_json::Map<String, serde_json::Value>;

/// One package in transit from sender to recipient.
///
/// Mutable root entity: created on intake, mutated by status, location,
/// and agent updates. Never physically deleted while active — a
/// cancellation is just another status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: Uuid,
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub sender: Party,
    pub recipient: Party,
    pub package: PackageDetails,
    pub estimated_delivery: Option<civil::Date>,

    /// Free-text location name; geocoding happens downstream.
    pub current_location: Option<String>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,

    pub assigned_agent: Option<AgentInfo>,
    pub notes: Vec<Note>,

    /// Legacy/overflow key-value data. Only the reconciler and the
    /// persistence layer touch this directly.
    #[serde(default)]
    pub data: SideChannel,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    /// Optimistic-concurrency counter, bumped on every persisted update.
    pub version: i64,
}

impl Shipment {
    /// Creates a new pending shipment with a derived tracking number.
    pub fn new(
        sender: Party,
        recipient: Party,
        package: PackageDetails,
        origin: Option<String>,
        now: Timestamp,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            tracking_number: tracking_number_for(id),
            status: ShipmentStatus::Pending,
            sender,
            recipient,
            package,
            estimated_delivery: None,
            current_location: origin,
            current_lat: None,
            current_lng: None,
            assigned_agent: None,
            notes: Vec::new(),
            data: SideChannel::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }
}

/// Derives the public tracking number from a shipment id.
///
/// `WB-` plus the first ten hex chars of the id's SHA-256, uppercased.
/// Deterministic so the number can be re-derived from the id alone.
pub fn tracking_number_for(id: Uuid) -> String {
    let digest = Sha256::digest(id.as_bytes());
    let hex = hex::encode(&digest[..5]);
    format!("WB-{}", hex.to_uppercase())
}

/// Contact and address details for a sender or recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Physical attributes of the package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDetails {
    pub weight_kg: f64,
    pub length_cm: Option<f64>,
    pub width_cm: Option<f64>,
    pub height_cm: Option<f64>,
    pub declared_value: Option<f64>,
}

/// The delivery agent assigned to a shipment.
///
/// The serde field names match the legacy side-channel blob (`photo`,
/// `id`) so blob entries written before the dedicated column existed
/// still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, rename = "photo", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl AgentInfo {
    /// An agent known only by name; everything else unset.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            email: None,
            rating: None,
            photo_url: None,
            agent_id: None,
        }
    }
}

/// A resolved location: name plus optional coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// A free-text note recorded against a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub text: String,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_number_is_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(tracking_number_for(id), tracking_number_for(id));
    }

    #[test]
    fn tracking_number_shape() {
        let number = tracking_number_for(Uuid::new_v4());
        let hex = number.strip_prefix("WB-").unwrap();
        assert_eq!(hex.len(), 10);
        assert!(hex.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn new_shipment_starts_pending_with_empty_side_channel() {
        let shipment = Shipment::new(
            Party {
                name: "Ada".into(),
                phone: None,
                email: None,
                address: None,
            },
            Party {
                name: "Grace".into(),
                phone: None,
                email: None,
                address: None,
            },
            PackageDetails {
                weight_kg: 1.5,
                length_cm: None,
                width_cm: None,
                height_cm: None,
                declared_value: None,
            },
            Some("Origin Hub".into()),
            Timestamp::now(),
        );

        assert_eq!(shipment.status, ShipmentStatus::Pending);
        assert_eq!(shipment.current_location.as_deref(), Some("Origin Hub"));
        assert!(shipment.data.is_empty());
        assert_eq!(shipment.version, 0);
    }

    #[test]
    fn agent_blob_field_names_match_legacy_shape() {
        let agent = AgentInfo {
            photo_url: Some("https://example.com/a.jpg".into()),
            agent_id: Some("JS-4D9F".into()),
            ..AgentInfo::named("John Smith")
        };
        let value = serde_json::to_value(&agent).unwrap();
        assert_eq!(value["photo"], "https://example.com/a.jpg");
        assert_eq!(value["id"], "JS-4D9F");
        assert!(value.get("photo_url").is_none());
    }
}
