//! The update request: a partial set of shipment fields.

use jiff::civil;
use serde::{Deserialize, Serialize};

use super::ShipmentStatus;

/// A partial update to a shipment. Absent fields mean "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRequest {
    pub status: Option<ShipmentStatus>,
    pub estimated_delivery_date: Option<civil::Date>,
    pub current_location_name: Option<String>,
    pub current_lat: Option<f64>,
    pub current_lng: Option<f64>,
    pub agent_name: Option<String>,
    pub agent_phone: Option<String>,
    pub agent_email: Option<String>,
    pub note: Option<String>,
}

impl UpdateRequest {
    /// Whether the request sets any of the recognized mutable fields.
    ///
    /// Coordinates and agent contact details only ride along with one
    /// of these; a request carrying nothing else is rejected up front.
    pub fn has_mutable_field(&self) -> bool {
        self.status.is_some()
            || self.estimated_delivery_date.is_some()
            || self.current_location_name.is_some()
            || self.note.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_has_no_mutable_field() {
        assert!(!UpdateRequest::default().has_mutable_field());
    }

    #[test]
    fn coordinates_alone_do_not_count() {
        let request = UpdateRequest {
            current_lat: Some(1.0),
            current_lng: Some(2.0),
            agent_phone: Some("555-0101".into()),
            ..UpdateRequest::default()
        };
        assert!(!request.has_mutable_field());
    }

    #[test]
    fn each_recognized_field_counts() {
        let cases = [
            UpdateRequest {
                status: Some(ShipmentStatus::InTransit),
                ..UpdateRequest::default()
            },
            UpdateRequest {
                estimated_delivery_date: Some(civil::date(2026, 8, 14)),
                ..UpdateRequest::default()
            },
            UpdateRequest {
                current_location_name: Some("Origin Hub".into()),
                ..UpdateRequest::default()
            },
            UpdateRequest {
                note: Some("Left at depot".into()),
                ..UpdateRequest::default()
            },
        ];
        for request in cases {
            assert!(request.has_mutable_field());
        }
    }
}
