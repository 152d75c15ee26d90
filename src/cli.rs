//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveTime;
use clap::{Parser, Subcommand, ValueEnum};

use crate::io::export::Format;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    /// TOML configuration file; built-in defaults when omitted.
    #[clap(long, global = true, env = "MICROGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[clap(long, global = true, env = "MICROGRID_JSON_LOGS")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    #[clap(name = "serve")]
    Serve(ServeArgs),

    /// Run one simulation and print it to stdout.
    #[clap(name = "simulate")]
    Simulate(SimulateArgs),
}

#[derive(Parser)]
pub struct ServeArgs {
    /// Bind address, overriding `server.host`.
    #[clap(long)]
    pub host: Option<String>,

    /// Bind port, overriding `server.port`.
    #[clap(long)]
    pub port: Option<u16>,
}

#[derive(Parser)]
pub struct SimulateArgs {
    /// `auto`, `sunny`, `cloudy`, `rainy`, or any other label for the fallback.
    #[clap(long, default_value = "sunny")]
    pub weather: String,

    /// Number of homes.
    #[clap(long, default_value = "20", allow_negative_numbers = true)]
    pub homes: i64,

    /// Battery capacity in kWh.
    #[clap(long = "battery-cap", default_value = "10", allow_negative_numbers = true)]
    pub battery_cap: f64,

    /// Time of day as `HH:MM:SS`; the site's current time when omitted.
    #[clap(long, value_parser = parse_time)]
    pub at: Option<NaiveTime>,

    /// Random seed, overriding `simulation.seed`.
    #[clap(long)]
    pub seed: Option<u64>,

    #[clap(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
    Csv,
}

impl From<OutputFormat> for Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => Self::Json,
            OutputFormat::Text => Self::Text,
            OutputFormat::Csv => Self::Csv,
        }
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("expected HH:MM:SS, got \"{s}\": {e}"))
}
