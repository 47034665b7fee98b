//! tracking-gate CLI entry point.

mod cli;

use chrono::Utc;
use clap::Parser;
use cli::{CardArgs, Cli, Command};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracking_gate::card::{validate, CardField};
use tracking_gate::gate::ShipmentEvent;
use tracking_gate::payment::ResolverConfig;
use tracking_gate::{
    AccessGate, AlwaysGrant, GateConfig, GateEvent, GateState, InMemoryAccessStore,
    InMemoryShipmentDirectory, LruAccessCache, PaymentStatusResolver, ShipmentRecord, TrackingId,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Build configuration (file, then CLI overrides)
    let config = cli.load_config()?;

    // Initialize tracing: RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("tracking-gate v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Card(card) => check_card(&card),
        Command::Track {
            tracking_id,
            prepaid,
            grant,
            card,
        } => track(&config, &tracking_id, prepaid, grant, &card).await?,
    }

    Ok(())
}

fn check_card(card: &CardArgs) {
    let input = card.to_input();
    let errors = validate(&input);

    println!("Network:     {}", input.network());
    println!("Card number: {}", input.card_number);
    println!("Expiry:      {}", input.expiry_date);
    println!("Holder:      {}", input.holder_name);
    println!();

    for field in [
        CardField::CardNumber,
        CardField::ExpiryDate,
        CardField::Cvv,
        CardField::HolderName,
    ] {
        let message = errors.message(field);
        if message.is_empty() {
            println!("  {field:<12} ok");
        } else {
            println!("  {field:<12} {message}");
        }
    }

    println!();
    println!(
        "Submit {}",
        if errors.is_valid() { "enabled" } else { "disabled" }
    );
}

/// A single demo shipment so an unlocked request has something to show.
fn demo_shipment(tracking_id: &TrackingId) -> ShipmentRecord {
    ShipmentRecord {
        tracking_id: tracking_id.to_string(),
        status: "In transit".to_string(),
        origin: "Felixstowe, GB".to_string(),
        destination: "Rotterdam, NL".to_string(),
        history: vec![ShipmentEvent {
            timestamp: Utc::now(),
            location: "Felixstowe, GB".to_string(),
            description: "Departed origin port".to_string(),
        }],
    }
}

async fn track(
    config: &GateConfig,
    raw_id: &str,
    prepaid: bool,
    grant: bool,
    card: &CardArgs,
) -> color_eyre::Result<()> {
    let store = InMemoryAccessStore::new();
    let cache = LruAccessCache::with_capacity(config.cache.capacity);
    let resolver = Arc::new(PaymentStatusResolver::new(
        Arc::new(store),
        Arc::new(cache),
        ResolverConfig::from(config),
    ));

    let shipments = InMemoryShipmentDirectory::new();
    if let Ok(id) = TrackingId::parse(raw_id) {
        shipments.insert(demo_shipment(&id));
        if prepaid {
            resolver.record(id.as_str(), resolver.price(), None, None).await;
        }
    }

    let mut gate = AccessGate::new(Arc::clone(&resolver), Arc::new(shipments), config);
    if grant {
        gate = gate.with_outcome_policy(Arc::new(AlwaysGrant));
    }
    let mut events = gate.subscribe();

    let mut result = gate.submit_identifier(raw_id).await.map(|_| ());
    if result.is_ok() && gate.state() == GateState::PaymentRequired {
        println!("Payment of {} required", gate.price());
        if card.is_present() {
            gate.fill_card(card.to_input())?;
            result = gate.submit_payment().await.map(|_| ());
        } else {
            gate.cancel()?;
        }
    }

    while let Ok(event) = events.try_recv() {
        match event {
            GateEvent::StateChanged { from, to } => println!("  {from} -> {to}"),
            GateEvent::Notice { level, message } => println!("  [{level:?}] {message}"),
        }
    }

    if let Some(shipment) = gate.shipment() {
        println!();
        println!(
            "{}: {} ({} -> {})",
            shipment.tracking_id, shipment.status, shipment.origin, shipment.destination
        );
        for event in &shipment.history {
            println!(
                "  {} {} - {}",
                event.timestamp.format("%Y-%m-%d %H:%M"),
                event.location,
                event.description
            );
        }
    }

    if gate.state() == GateState::Denied {
        gate.acknowledge()?;
    }

    let stats = resolver.stats();
    info!(
        "Resolver stats: store_hits={} cache_hits={} reconciliations={} write_failures={}",
        stats.store_hits, stats.cache_hits, stats.reconciliations, stats.write_failures
    );

    result.map_err(Into::into)
}
