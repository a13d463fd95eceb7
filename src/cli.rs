//! CLI interface for Waybill.
//!
//! The admin console for the shipment ledger. Each subcommand is
//! non-interactive: arguments in, structured output out. Data goes to
//! stdout; human status lines go to stderr.
//!
//! Shipments are referenced by tracking number, with or without the
//! `WB-` prefix, case-insensitively.

mod format;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use jiff::{Timestamp, civil};

use crate::config::Config;
use crate::model::{
    PackageDetails, Party, Shipment, ShipmentStatus, TrackingEvent, UpdateRequest,
};
use crate::notify::{NoopNotifier, Notifier, StderrNotifier};
use crate::reconcile;
use crate::storage::Storage;
use crate::timeline;
use crate::update::{self, UpdateOutcome};

use format::{format_event, format_shipment, format_step};

/// Waybill — track your shipments.
#[derive(Debug, Parser)]
#[command(name = "waybill", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: moving a shipment
  1. waybill new --sender "Ada Lovelace" --recipient "Grace Hopper" \
       --weight 2.5 --origin "Origin Hub"
     → prints a tracking number (e.g. WB-1A2B3C4D9F)
  2. waybill update WB-1A2B3C4D9F --status "Picked Up" --agent-name "John Smith"
  3. waybill update WB-1A2B3C4D9F --status "In Transit" --location "Central Depot"
  4. waybill track WB-1A2B3C4D9F"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Intake a new shipment. Prints the tracking number.
    New(NewArgs),

    /// List all shipments.
    List,

    /// Show a shipment's resolved fields and full event history.
    Show {
        /// Tracking number.
        tracking: String,

        /// Print the resolved record and history as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Apply a status, location, or agent update.
    ///
    /// At least one of --status, --eta, --location, or --note is
    /// required. A new history entry is recorded only when the status
    /// or the location actually changed.
    Update(UpdateArgs),

    /// Print the delivery timeline.
    Track {
        /// Tracking number.
        tracking: String,

        /// Show every step instead of collapsing long timelines.
        #[arg(long)]
        full: bool,
    },
}

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Sender name.
    #[arg(long)]
    sender: String,
    #[arg(long)]
    sender_phone: Option<String>,
    #[arg(long)]
    sender_email: Option<String>,
    #[arg(long)]
    sender_address: Option<String>,

    /// Recipient name.
    #[arg(long)]
    recipient: String,
    #[arg(long)]
    recipient_phone: Option<String>,
    #[arg(long)]
    recipient_email: Option<String>,
    #[arg(long)]
    recipient_address: Option<String>,

    /// Package weight in kilograms.
    #[arg(long)]
    weight: f64,
    /// Package length in centimeters.
    #[arg(long)]
    length: Option<f64>,
    /// Package width in centimeters.
    #[arg(long)]
    width: Option<f64>,
    /// Package height in centimeters.
    #[arg(long)]
    height: Option<f64>,
    /// Declared value.
    #[arg(long)]
    value: Option<f64>,

    /// Initial location name (e.g. the intake hub).
    #[arg(long)]
    origin: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Tracking number.
    tracking: String,

    /// New status: the exact catalog string, e.g. "In Transit".
    #[arg(long, value_parser = parse_status)]
    status: Option<ShipmentStatus>,

    /// Estimated delivery date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    eta: Option<civil::Date>,

    /// Current location name.
    #[arg(long)]
    location: Option<String>,

    /// Current latitude.
    #[arg(long)]
    lat: Option<f64>,

    /// Current longitude.
    #[arg(long)]
    lng: Option<f64>,

    /// Assigned agent's name.
    #[arg(long)]
    agent_name: Option<String>,

    /// Assigned agent's phone.
    #[arg(long)]
    agent_phone: Option<String>,

    /// Assigned agent's email.
    #[arg(long)]
    agent_email: Option<String>,

    /// Free-text note appended to the shipment.
    #[arg(long)]
    note: Option<String>,
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::New(args) => cmd_new(storage, &args),
        Command::List => cmd_list(storage),
        Command::Show { tracking, json } => cmd_show(storage, &tracking, json),
        Command::Update(args) => cmd_update(config, storage, &args),
        Command::Track { tracking, full } => cmd_track(storage, &tracking, full),
    }
}

fn cmd_new(storage: &Storage, args: &NewArgs) -> Result<(), String> {
    let shipment = Shipment::new(
        Party {
            name: args.sender.clone(),
            phone: args.sender_phone.clone(),
            email: args.sender_email.clone(),
            address: args.sender_address.clone(),
        },
        Party {
            name: args.recipient.clone(),
            phone: args.recipient_phone.clone(),
            email: args.recipient_email.clone(),
            address: args.recipient_address.clone(),
        },
        PackageDetails {
            weight_kg: args.weight,
            length_cm: args.length,
            width_cm: args.width,
            height_cm: args.height,
            declared_value: args.value,
        },
        args.origin.clone(),
        Timestamp::now(),
    );

    storage
        .create_shipment(&shipment)
        .map_err(|e| format!("failed to create shipment: {e}"))?;

    println!("{}", shipment.tracking_number);
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let shipments = storage
        .list_shipments()
        .map_err(|e| format!("failed to list shipments: {e}"))?;

    if shipments.is_empty() {
        println!("No shipments");
        return Ok(());
    }

    for shipment in &shipments {
        let location = reconcile::resolve(shipment)
            .location
            .map_or_else(|| "location unknown".to_string(), |l| l.name);
        println!(
            "{}  [{}]  to {}  ({location})",
            shipment.tracking_number, shipment.status, shipment.recipient.name
        );
    }

    Ok(())
}

fn cmd_show(storage: &Storage, reference: &str, json: bool) -> Result<(), String> {
    let shipment = resolve_shipment(storage, reference)?;
    let events = load_events(storage, &shipment)?;
    let resolved = reconcile::resolve(&shipment);

    if json {
        let payload = serde_json::json!({
            "shipment": shipment,
            "agent": resolved.agent,
            "currentLocation": resolved.location,
            "signature": resolved.signature,
            "history": events,
        });
        let text = serde_json::to_string_pretty(&payload)
            .map_err(|e| format!("failed to serialize shipment: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    println!("{}", format_shipment(&shipment, &resolved));
    if events.is_empty() {
        println!("\nNo tracking events recorded.");
    } else {
        println!("\nHistory:");
        for event in &events {
            println!("  {}", format_event(event));
        }
    }

    Ok(())
}

fn cmd_update(config: &Config, storage: &Storage, args: &UpdateArgs) -> Result<(), String> {
    let notifier: Arc<dyn Notifier> = if config.notifications {
        Arc::new(StderrNotifier)
    } else {
        Arc::new(NoopNotifier)
    };

    let request = UpdateRequest {
        status: args.status,
        estimated_delivery_date: args.eta,
        current_location_name: args.location.clone(),
        current_lat: args.lat,
        current_lng: args.lng,
        agent_name: args.agent_name.clone(),
        agent_phone: args.agent_phone.clone(),
        agent_email: args.agent_email.clone(),
        note: args.note.clone(),
    };

    let tracking = normalize_tracking(&args.tracking);
    let outcome = update::apply_update(storage, &notifier, &tracking, &request)
        .map_err(|e| e.to_string())?;

    match outcome {
        UpdateOutcome::Unchanged { shipment } => {
            eprintln!("{}: no changes detected", shipment.tracking_number);
        }
        UpdateOutcome::Applied {
            shipment,
            event,
            notification,
            ..
        } => {
            match &event {
                Some(event) => eprintln!("{}: {}", shipment.tracking_number, event.description),
                None => eprintln!("{} updated", shipment.tracking_number),
            }
            // The response above is complete; waiting here only keeps
            // the process alive long enough for the best-effort send.
            if let Some(handle) = notification {
                let _ = handle.join();
            }
        }
    }

    Ok(())
}

fn cmd_track(storage: &Storage, reference: &str, full: bool) -> Result<(), String> {
    let shipment = resolve_shipment(storage, reference)?;
    let events = load_events(storage, &shipment)?;
    let steps = timeline::build_timeline(&shipment, &events);

    if full {
        for step in &steps {
            println!("{}", format_step(step));
        }
        return Ok(());
    }

    let (head, tail) = timeline::display_window(&steps);
    for step in head {
        println!("{}", format_step(step));
    }
    if !tail.is_empty() {
        let elided = steps.len() - head.len() - tail.len();
        if elided > 0 {
            println!("  ... {elided} step(s) hidden, use --full ...");
        }
        for step in tail {
            println!("{}", format_step(step));
        }
    }

    Ok(())
}

/// Loads and normalizes a tracking-number reference.
fn resolve_shipment(storage: &Storage, reference: &str) -> Result<Shipment, String> {
    let tracking = normalize_tracking(reference);
    storage
        .find_by_tracking(&tracking)
        .map_err(|e| e.to_string())
}

fn load_events(storage: &Storage, shipment: &Shipment) -> Result<Vec<TrackingEvent>, String> {
    storage
        .load_events(shipment.id)
        .map_err(|e| format!("failed to load history: {e}"))
}

/// Uppercases a reference and restores the `WB-` prefix if missing.
fn normalize_tracking(reference: &str) -> String {
    let upper = reference.trim().to_uppercase();
    if upper.starts_with("WB-") {
        upper
    } else {
        format!("WB-{upper}")
    }
}

/// Parses an exact status string, listing the catalog on failure.
fn parse_status(s: &str) -> Result<ShipmentStatus, String> {
    s.parse::<ShipmentStatus>().map_err(|e| {
        let recognized: Vec<&str> = ShipmentStatus::ALL.iter().map(|s| s.as_str()).collect();
        format!("{e}\nRecognized statuses: {}", recognized.join(", "))
    })
}

fn parse_date(s: &str) -> Result<civil::Date, String> {
    s.parse::<civil::Date>()
        .map_err(|e| format!("invalid date '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tracking_accepts_bare_and_prefixed() {
        assert_eq!(normalize_tracking("WB-1A2B3C4D9F"), "WB-1A2B3C4D9F");
        assert_eq!(normalize_tracking("1a2b3c4d9f"), "WB-1A2B3C4D9F");
        assert_eq!(normalize_tracking("  wb-1a2b3c4d9f "), "WB-1A2B3C4D9F");
    }

    #[test]
    fn parse_status_accepts_exact_strings() {
        assert_eq!(
            parse_status("Out for Delivery").unwrap(),
            ShipmentStatus::OutForDelivery
        );
    }

    #[test]
    fn parse_status_error_lists_the_catalog() {
        let err = parse_status("shipped").unwrap_err();
        assert!(err.contains("unknown status"));
        assert!(err.contains("Out for Delivery"));
    }

    #[test]
    fn parse_date_round_trips() {
        assert_eq!(parse_date("2026-08-14").unwrap(), civil::date(2026, 8, 14));
        assert!(parse_date("yesterday").is_err());
    }
}
