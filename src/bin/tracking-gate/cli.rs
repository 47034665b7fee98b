//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracking_gate::config::default_config_path;
use tracking_gate::{CardInput, GateConfig};

/// Payment-gated premium shipment tracking.
#[derive(Parser, Debug)]
#[command(name = "tracking-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level. Overrides the config file; `RUST_LOG` overrides both.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to configuration file.
    #[arg(long, short, env = "TRACKING_GATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Simulated processing delay in milliseconds.
    #[arg(long, env = "TRACKING_GATE_PROCESSING_DELAY_MS", global = true)]
    pub processing_delay_ms: Option<u64>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate card details and show how they would be displayed.
    Card(CardArgs),

    /// Run a tracking request through the access gate.
    Track {
        /// Tracking identifier.
        tracking_id: String,

        /// Treat the identifier as already unlocked.
        #[arg(long)]
        prepaid: bool,

        /// Grant card payments instead of simulating a decline.
        #[arg(long)]
        grant: bool,

        /// Card details to submit if payment is required.
        #[command(flatten)]
        card: CardArgs,
    },
}

/// Card fields.
#[derive(Args, Debug, Default)]
pub struct CardArgs {
    /// Card number.
    #[arg(long)]
    pub number: Option<String>,

    /// Expiry date (MM/YY).
    #[arg(long)]
    pub expiry: Option<String>,

    /// Card verification value.
    #[arg(long)]
    pub cvv: Option<String>,

    /// Cardholder name.
    #[arg(long)]
    pub name: Option<String>,
}

impl CardArgs {
    /// Whether any card field was given.
    pub fn is_present(&self) -> bool {
        self.number.is_some() || self.expiry.is_some() || self.cvv.is_some() || self.name.is_some()
    }

    /// Build a formatted card input; missing fields are left empty.
    pub fn to_input(&self) -> CardInput {
        CardInput::new(
            self.number.as_deref().unwrap_or_default(),
            self.expiry.as_deref().unwrap_or_default(),
            self.cvv.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default(),
        )
    }
}

impl Cli {
    /// Load the configuration file (if any) and apply CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given config file cannot be loaded.
    pub fn load_config(&self) -> color_eyre::Result<GateConfig> {
        let mut config = if let Some(ref path) = self.config {
            GateConfig::from_file(path)?
        } else {
            let path = default_config_path();
            if path.exists() {
                GateConfig::from_file(&path)?
            } else {
                GateConfig::default()
            }
        };

        if let Some(ref level) = self.log_level {
            config.log_level.clone_from(level);
        }
        if let Some(delay) = self.processing_delay_ms {
            config.gate.processing_delay_ms = delay;
        }

        Ok(config)
    }
}
