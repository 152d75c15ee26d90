//! API request and response bodies.
//!
//! Query parameter names follow the browser client (`batteryCap`).

use serde::{Deserialize, Serialize};

fn default_weather() -> String {
    "sunny".to_string()
}

fn default_homes() -> i64 {
    20
}

fn default_battery_cap() -> f64 {
    10.0
}

/// Query parameters of `GET /simulate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulateQuery {
    /// `auto`, `sunny`, `cloudy`, `rainy`, or anything else for the fallback.
    #[serde(default = "default_weather")]
    pub weather: String,
    #[serde(default = "default_homes")]
    pub homes: i64,
    /// Battery capacity (kWh).
    #[serde(rename = "batteryCap", default = "default_battery_cap")]
    pub battery_cap: f64,
}

impl Default for SimulateQuery {
    fn default() -> Self {
        Self {
            weather: default_weather(),
            homes: default_homes(),
            battery_cap: default_battery_cap(),
        }
    }
}

/// Body of `POST /agent/ask`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error kind.
    pub error: &'static str,
    /// Human-readable detail.
    pub message: String,
}
