//! Shipment status enumeration and the delivery-progress catalog.
//!
//! The catalog maps every recognized status string to a progress
//! percentage and a one-line description. The percentages are an
//! external contract consumed by reporting collaborators; they are
//! fixed data, not computed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of shipment statuses.
///
/// Serialized everywhere (database, JSON, CLI) as the exact
/// human-readable strings, which are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Awaiting Payment")]
    AwaitingPayment,
    #[serde(rename = "Payment Confirmed")]
    PaymentConfirmed,
    #[serde(rename = "Processing")]
    Processing,
    #[serde(rename = "Ready for Pickup")]
    ReadyForPickup,
    #[serde(rename = "Driver En Route")]
    DriverEnRoute,
    #[serde(rename = "Picked Up")]
    PickedUp,
    #[serde(rename = "At Warehouse")]
    AtWarehouse,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Departed Facility")]
    DepartedFacility,
    #[serde(rename = "Arrived at Facility")]
    ArrivedAtFacility,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Returned to Sender")]
    ReturnedToSender,
    #[serde(rename = "Cancelled")]
    Cancelled,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Delayed")]
    Delayed,
    #[serde(rename = "Weather Delay")]
    WeatherDelay,
    #[serde(rename = "Address Issue")]
    AddressIssue,
    #[serde(rename = "Customs Hold")]
    CustomsHold,
    #[serde(rename = "Inspection Required")]
    InspectionRequired,
    #[serde(rename = "Payment Verification Required")]
    PaymentVerificationRequired,
    #[serde(rename = "Lost Package")]
    LostPackage,
    #[serde(rename = "Damaged Package")]
    DamagedPackage,
}

/// Returned when a string is not one of the recognized statuses.
#[derive(Debug, thiserror::Error)]
#[error("unknown status: '{0}'")]
pub struct UnknownStatus(pub String);

impl ShipmentStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 24] = [
        Self::Pending,
        Self::AwaitingPayment,
        Self::PaymentConfirmed,
        Self::Processing,
        Self::ReadyForPickup,
        Self::DriverEnRoute,
        Self::PickedUp,
        Self::AtWarehouse,
        Self::InTransit,
        Self::DepartedFacility,
        Self::ArrivedAtFacility,
        Self::OutForDelivery,
        Self::Delivered,
        Self::ReturnedToSender,
        Self::Cancelled,
        Self::OnHold,
        Self::Delayed,
        Self::WeatherDelay,
        Self::AddressIssue,
        Self::CustomsHold,
        Self::InspectionRequired,
        Self::PaymentVerificationRequired,
        Self::LostPackage,
        Self::DamagedPackage,
    ];

    /// The canonical status string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::AwaitingPayment => "Awaiting Payment",
            Self::PaymentConfirmed => "Payment Confirmed",
            Self::Processing => "Processing",
            Self::ReadyForPickup => "Ready for Pickup",
            Self::DriverEnRoute => "Driver En Route",
            Self::PickedUp => "Picked Up",
            Self::AtWarehouse => "At Warehouse",
            Self::InTransit => "In Transit",
            Self::DepartedFacility => "Departed Facility",
            Self::ArrivedAtFacility => "Arrived at Facility",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::ReturnedToSender => "Returned to Sender",
            Self::Cancelled => "Cancelled",
            Self::OnHold => "On Hold",
            Self::Delayed => "Delayed",
            Self::WeatherDelay => "Weather Delay",
            Self::AddressIssue => "Address Issue",
            Self::CustomsHold => "Customs Hold",
            Self::InspectionRequired => "Inspection Required",
            Self::PaymentVerificationRequired => "Payment Verification Required",
            Self::LostPackage => "Lost Package",
            Self::DamagedPackage => "Damaged Package",
        }
    }

    /// Delivery progress for this status, 0–100.
    pub fn progress(self) -> u8 {
        progress_for(self.as_str())
    }

    /// One-line human description, used when synthesizing event text.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Pending => "Shipment received and awaiting processing",
            Self::AwaitingPayment => "Waiting for payment to be completed",
            Self::PaymentConfirmed => "Payment received and confirmed",
            Self::Processing => "Shipment is being processed at origin",
            Self::ReadyForPickup => "Package is ready for carrier pickup",
            Self::DriverEnRoute => "Driver is on the way to collect the package",
            Self::PickedUp => "Package collected by carrier",
            Self::AtWarehouse => "Package arrived at sorting warehouse",
            Self::InTransit => "Package is moving through the carrier network",
            Self::DepartedFacility => "Package departed a carrier facility",
            Self::ArrivedAtFacility => "Package arrived at a carrier facility",
            Self::OutForDelivery => "Package is out for delivery",
            Self::Delivered => "Package delivered",
            Self::ReturnedToSender => "Package returned to sender",
            Self::Cancelled => "Shipment cancelled",
            Self::OnHold => "Shipment placed on hold",
            Self::Delayed => "Shipment delayed",
            Self::WeatherDelay => "Delivery delayed due to weather",
            Self::AddressIssue => "Delivery address needs attention",
            Self::CustomsHold => "Package held at customs",
            Self::InspectionRequired => "Package held for inspection",
            Self::PaymentVerificationRequired => "Payment requires verification",
            Self::LostPackage => "Package reported lost",
            Self::DamagedPackage => "Package reported damaged",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Delivery progress for a status string, 0–100.
///
/// Unrecognized strings resolve to 0 rather than erroring: the catalog
/// is advisory, not a validity gate. Failure statuses (returned, lost,
/// damaged, cancelled) also map to 0 — progress is a snapshot
/// indicator, not a non-decreasing counter.
pub fn progress_for(status: &str) -> u8 {
    match status {
        "Pending" => 5,
        "Awaiting Payment" => 10,
        "Payment Confirmed" => 20,
        "Processing" => 30,
        "Ready for Pickup" => 35,
        "Driver En Route" => 40,
        "Picked Up" => 45,
        "At Warehouse" => 50,
        "In Transit" => 60,
        "Departed Facility" => 65,
        "Arrived at Facility" => 70,
        "Out for Delivery" => 85,
        "Delivered" => 100,
        "On Hold" => 15,
        "Delayed" | "Weather Delay" => 55,
        "Address Issue" => 50,
        "Customs Hold" => 65,
        "Inspection Required" => 70,
        "Payment Verification Required" => 10,
        // Terminal failures and anything unrecognized.
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_round_trips_through_its_string() {
        for status in ShipmentStatus::ALL {
            let parsed: ShipmentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("in transit".parse::<ShipmentStatus>().is_err());
        assert!("In Transit".parse::<ShipmentStatus>().is_ok());
    }

    #[test]
    fn progress_is_bounded_for_all_statuses() {
        for status in ShipmentStatus::ALL {
            assert!(status.progress() <= 100, "{status} out of range");
        }
    }

    #[test]
    fn contract_values_are_exact() {
        assert_eq!(progress_for("Pending"), 5);
        assert_eq!(progress_for("Processing"), 30);
        assert_eq!(progress_for("In Transit"), 60);
        assert_eq!(progress_for("Out for Delivery"), 85);
        assert_eq!(progress_for("Delivered"), 100);
        assert_eq!(progress_for("On Hold"), 15);
        assert_eq!(progress_for("Picked Up"), 45);
        assert_eq!(progress_for("Returned to Sender"), 0);
        assert_eq!(progress_for("Cancelled"), 0);
        assert_eq!(progress_for("Lost Package"), 0);
        assert_eq!(progress_for("Damaged Package"), 0);
    }

    #[test]
    fn unknown_status_resolves_to_zero() {
        assert_eq!(progress_for("Teleporting"), 0);
        assert_eq!(progress_for(""), 0);
        assert_eq!(progress_for("delivered"), 0);
    }

    #[test]
    fn every_status_has_a_description() {
        for status in ShipmentStatus::ALL {
            assert!(!status.describe().is_empty());
        }
    }

    #[test]
    fn serde_uses_the_canonical_strings() {
        let json = serde_json::to_string(&ShipmentStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"Out for Delivery\"");
        let back: ShipmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ShipmentStatus::OutForDelivery);
    }
}
