//! State reconciliation: one logical shipment view from two storage shapes.
//!
//! Agent, current location, and signature live both in dedicated columns
//! and in the legacy side-channel map. Resolution order per field:
//!
//! 1. the dedicated column, if non-empty;
//! 2. the side-channel entry, if present and well-formed;
//! 3. for the agent id only, a deterministic synthetic default.
//!
//! On write, the resolved agent and location are serialized back into
//! the map alongside the columns, preserving unrelated keys, because
//! the map is still read by the timeline fallback path and by external
//! reporting collaborators that predate the columns.

use serde_json::Value;

use crate::model::{AgentInfo, LocationInfo, Shipment, ShipmentStatus, SideChannel};

/// Side-channel keys written by the pre-column schema.
const AGENT_KEY: &str = "agent";
const LOCATION_KEY: &str = "currentLocation";
const SIGNATURE_KEY: &str = "signature";

/// A shipment's reconciled fields, source-independent.
///
/// Past this boundary the side-channel blob never leaks into decision
/// logic.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub agent: Option<AgentInfo>,
    pub location: Option<LocationInfo>,
    pub signature: Option<String>,
}

/// The classifier-facing slice of a reconciled shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub status: ShipmentStatus,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Merges columns and side-channel into one resolved view.
pub fn resolve(shipment: &Shipment) -> Resolved {
    let mut agent = shipment
        .assigned_agent
        .clone()
        .or_else(|| blob_agent(&shipment.data));
    if let Some(agent) = agent.as_mut()
        && agent.agent_id.is_none()
    {
        agent.agent_id = Some(synthesize_agent_id(&agent.name, &shipment.tracking_number));
    }

    let location = column_location(shipment).or_else(|| blob_location(&shipment.data));

    let signature = shipment
        .data
        .get(SIGNATURE_KEY)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Resolved {
        agent,
        location,
        signature,
    }
}

/// Captures the resolved status-and-location snapshot used for change
/// classification and ledger stamping.
pub fn snapshot(shipment: &Shipment) -> Snapshot {
    let (location, latitude, longitude) = match resolve(shipment).location {
        Some(location) => (Some(location.name), location.lat, location.lng),
        None => (None, None, None),
    };
    Snapshot {
        status: shipment.status,
        location,
        latitude,
        longitude,
    }
}

/// Re-serializes the agent and location columns into the side-channel
/// map. Only those keys are overwritten; everything else in the map is
/// preserved. Empty columns leave the map untouched — the blob entry
/// may be the only surviving source for that field.
pub fn sync_side_channel(shipment: &mut Shipment) {
    if let Some(agent) = &shipment.assigned_agent
        && let Ok(value) = serde_json::to_value(agent)
    {
        shipment.data.insert(AGENT_KEY.to_string(), value);
    }

    if let Some(location) = column_location(shipment)
        && let Ok(value) = serde_json::to_value(&location)
    {
        shipment.data.insert(LOCATION_KEY.to_string(), value);
    }
}

/// The location from dedicated columns, if the name column is non-empty.
fn column_location(shipment: &Shipment) -> Option<LocationInfo> {
    shipment
        .current_location
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| LocationInfo {
            name: name.to_string(),
            lat: shipment.current_lat,
            lng: shipment.current_lng,
        })
}

/// The agent stored in the side-channel, if parseable.
fn blob_agent(data: &SideChannel) -> Option<AgentInfo> {
    let value = data.get(AGENT_KEY)?;
    serde_json::from_value(value.clone()).ok()
}

/// The location stored in the side-channel.
///
/// The legacy writers stored either a bare name string or a
/// `{name, lat, lng}` object; both shapes are accepted. Anything else
/// is treated as absent.
fn blob_location(data: &SideChannel) -> Option<LocationInfo> {
    match data.get(LOCATION_KEY)? {
        Value::String(name) if !name.is_empty() => Some(LocationInfo {
            name: name.clone(),
            lat: None,
            lng: None,
        }),
        value @ Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

/// Uppercase initials of the agent name, a hyphen, then the last four
/// characters of the tracking number: `John Smith` + `WB-1A2B3C4D9F`
/// → `JS-4D9F`.
fn synthesize_agent_id(name: &str, tracking_number: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    let tail: String = tracking_number
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{initials}-{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::{PackageDetails, Party};

    fn sample_party(name: &str) -> Party {
        Party {
            name: name.into(),
            phone: None,
            email: None,
            address: None,
        }
    }

    fn sample_shipment() -> Shipment {
        let mut shipment = Shipment::new(
            sample_party("Ada"),
            sample_party("Grace"),
            PackageDetails {
                weight_kg: 2.0,
                length_cm: None,
                width_cm: None,
                height_cm: None,
                declared_value: None,
            },
            None,
            Timestamp::now(),
        );
        shipment.tracking_number = "WB-1A2B3C4D9F".into();
        shipment
    }

    #[test]
    fn column_agent_wins_over_blob_agent() {
        let mut shipment = sample_shipment();
        shipment.assigned_agent = Some(AgentInfo::named("Column Agent"));
        shipment.data.insert(
            "agent".into(),
            serde_json::json!({"name": "Blob Agent"}),
        );

        let resolved = resolve(&shipment);
        assert_eq!(resolved.agent.unwrap().name, "Column Agent");
    }

    #[test]
    fn blob_agent_used_when_column_empty() {
        let mut shipment = sample_shipment();
        shipment.data.insert(
            "agent".into(),
            serde_json::json!({"name": "Blob Agent", "phone": "555-0101"}),
        );

        let agent = resolve(&shipment).agent.unwrap();
        assert_eq!(agent.name, "Blob Agent");
        assert_eq!(agent.phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn agent_id_synthesized_from_initials_and_tracking_tail() {
        let mut shipment = sample_shipment();
        shipment.assigned_agent = Some(AgentInfo::named("John Smith"));

        let agent = resolve(&shipment).agent.unwrap();
        assert_eq!(agent.agent_id.as_deref(), Some("JS-4D9F"));
    }

    #[test]
    fn stored_agent_id_is_not_replaced() {
        let mut shipment = sample_shipment();
        shipment.assigned_agent = Some(AgentInfo {
            agent_id: Some("AGT-7".into()),
            ..AgentInfo::named("John Smith")
        });

        let agent = resolve(&shipment).agent.unwrap();
        assert_eq!(agent.agent_id.as_deref(), Some("AGT-7"));
    }

    #[test]
    fn no_agent_resolves_to_none() {
        let resolved = resolve(&sample_shipment());
        assert!(resolved.agent.is_none());
    }

    #[test]
    fn column_location_wins_and_carries_coordinates() {
        let mut shipment = sample_shipment();
        shipment.current_location = Some("Origin Hub".into());
        shipment.current_lat = Some(52.5);
        shipment.current_lng = Some(13.4);
        shipment
            .data
            .insert("currentLocation".into(), serde_json::json!("Old Depot"));

        let location = resolve(&shipment).location.unwrap();
        assert_eq!(location.name, "Origin Hub");
        assert_eq!(location.lat, Some(52.5));
        assert_eq!(location.lng, Some(13.4));
    }

    #[test]
    fn blob_location_accepts_bare_string() {
        let mut shipment = sample_shipment();
        shipment
            .data
            .insert("currentLocation".into(), serde_json::json!("Old Depot"));

        let location = resolve(&shipment).location.unwrap();
        assert_eq!(location.name, "Old Depot");
        assert!(location.lat.is_none());
    }

    #[test]
    fn blob_location_accepts_object() {
        let mut shipment = sample_shipment();
        shipment.data.insert(
            "currentLocation".into(),
            serde_json::json!({"name": "Old Depot", "lat": 1.0, "lng": 2.0}),
        );

        let location = resolve(&shipment).location.unwrap();
        assert_eq!(location.name, "Old Depot");
        assert_eq!(location.lat, Some(1.0));
        assert_eq!(location.lng, Some(2.0));
    }

    #[test]
    fn malformed_blob_values_are_ignored() {
        let mut shipment = sample_shipment();
        shipment.data.insert("agent".into(), serde_json::json!(42));
        shipment
            .data
            .insert("currentLocation".into(), serde_json::json!(false));

        let resolved = resolve(&shipment);
        assert!(resolved.agent.is_none());
        assert!(resolved.location.is_none());
    }

    #[test]
    fn signature_comes_from_the_blob() {
        let mut shipment = sample_shipment();
        shipment
            .data
            .insert("signature".into(), serde_json::json!("G. Hopper"));

        assert_eq!(resolve(&shipment).signature.as_deref(), Some("G. Hopper"));
    }

    #[test]
    fn sync_writes_columns_back_and_preserves_unrelated_keys() {
        let mut shipment = sample_shipment();
        shipment
            .data
            .insert("legacyRef".into(), serde_json::json!("LR-77"));
        shipment.assigned_agent = Some(AgentInfo::named("John Smith"));
        shipment.current_location = Some("Origin Hub".into());
        shipment.current_lat = Some(52.5);

        sync_side_channel(&mut shipment);

        assert_eq!(shipment.data["legacyRef"], "LR-77");
        assert_eq!(shipment.data["agent"]["name"], "John Smith");
        assert_eq!(shipment.data["currentLocation"]["name"], "Origin Hub");
        assert_eq!(shipment.data["currentLocation"]["lat"], 52.5);
    }

    #[test]
    fn sync_leaves_blob_untouched_when_columns_empty() {
        let mut shipment = sample_shipment();
        shipment
            .data
            .insert("currentLocation".into(), serde_json::json!("Old Depot"));

        sync_side_channel(&mut shipment);

        // The blob entry is still the only source; it must survive.
        assert_eq!(shipment.data["currentLocation"], "Old Depot");
        assert!(!shipment.data.contains_key("agent"));
    }

    #[test]
    fn snapshot_uses_the_resolved_location() {
        let mut shipment = sample_shipment();
        shipment.status = ShipmentStatus::Processing;
        shipment
            .data
            .insert("currentLocation".into(), serde_json::json!("Old Depot"));

        let snapshot = snapshot(&shipment);
        assert_eq!(snapshot.status, ShipmentStatus::Processing);
        assert_eq!(snapshot.location.as_deref(), Some("Old Depot"));
        assert!(snapshot.latitude.is_none());
    }
}
