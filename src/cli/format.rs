//! Output formatting for CLI display.

use jiff::Timestamp;

use crate::model::{
    AgentInfo, LocationInfo, PackageDetails, Party, Shipment, TimelineStep, TrackingEvent,
};
use crate::reconcile::Resolved;

/// Multi-line summary of a shipment's resolved fields.
pub(super) fn format_shipment(shipment: &Shipment, resolved: &Resolved) -> String {
    let mut lines = vec![
        format!("Tracking:  {}", shipment.tracking_number),
        format!(
            "Status:    {} ({}%)",
            shipment.status,
            shipment.status.progress()
        ),
        format!("From:      {}", format_party(&shipment.sender)),
        format!("To:        {}", format_party(&shipment.recipient)),
        format!("Package:   {}", format_package(&shipment.package)),
    ];
    if let Some(location) = &resolved.location {
        lines.push(format!("Location:  {}", format_location(location)));
    }
    if let Some(agent) = &resolved.agent {
        lines.push(format!("Agent:     {}", format_agent(agent)));
    }
    if let Some(eta) = shipment.estimated_delivery {
        lines.push(format!("ETA:       {eta}"));
    }
    if let Some(signature) = &resolved.signature {
        lines.push(format!("Signed:    {signature}"));
    }
    for note in &shipment.notes {
        lines.push(format!(
            "Note:      {} ({})",
            note.text,
            format_timestamp(note.created_at)
        ));
    }
    lines.join("\n")
}

/// One history line: time, status, progress, description.
pub(super) fn format_event(event: &TrackingEvent) -> String {
    format!(
        "{}  {:<30} {:>3}%  {}",
        format_timestamp(event.timestamp),
        event.status.to_string(),
        event.progress,
        event.description
    )
}

/// One timeline line. The current step is marked with an arrow,
/// completed steps with a check.
pub(super) fn format_step(step: &TimelineStep) -> String {
    let marker = if step.is_current { "→" } else { "✓" };
    let location = step.location.as_deref().unwrap_or("location unknown");
    let mut line = format!(
        "{marker} {}  {:<30} {:>3}%  {location}",
        format_timestamp(step.timestamp),
        step.status.to_string(),
        step.progress
    );
    if let Some(handler) = &step.handler {
        line.push_str(&format!("  ({handler})"));
    }
    line
}

pub(super) fn format_party(party: &Party) -> String {
    match &party.address {
        Some(address) => format!("{}, {address}", party.name),
        None => party.name.clone(),
    }
}

fn format_agent(agent: &AgentInfo) -> String {
    let mut text = agent.name.clone();
    if let Some(id) = &agent.agent_id {
        text.push_str(&format!(" [{id}]"));
    }
    if let Some(phone) = &agent.phone {
        text.push_str(&format!(", {phone}"));
    }
    text
}

fn format_package(package: &PackageDetails) -> String {
    let mut text = format!("{:.1} kg", package.weight_kg);
    if let (Some(l), Some(w), Some(h)) = (package.length_cm, package.width_cm, package.height_cm) {
        text.push_str(&format!(", {l:.0}x{w:.0}x{h:.0} cm"));
    }
    if let Some(value) = package.declared_value {
        text.push_str(&format!(", declared value {value:.2}"));
    }
    text
}

fn format_location(location: &LocationInfo) -> String {
    match (location.lat, location.lng) {
        (Some(lat), Some(lng)) => format!("{} ({lat:.4}, {lng:.4})", location.name),
        _ => location.name.clone(),
    }
}

fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.strftime("%Y-%m-%d %H:%M").to_string()
}
