//! Core simulation types: inputs, random draws, and the result payload.

use chrono::NaiveTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::devices::battery::LEVEL_PERCENT_RANGE;
use crate::devices::demand::per_home_draw_range;
use crate::weather::{Location, WeatherMode};

use super::advisor::Alert;

/// Rounds to two decimal places, the precision of every real field served.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Everything a single simulation depends on apart from the weather and draws.
///
/// Counts and capacities are taken as given; negative values flow through the
/// arithmetic unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    /// Requested weather source.
    pub weather: WeatherMode,
    /// Number of homes on the microgrid.
    pub homes: i64,
    /// Battery capacity in kWh.
    pub battery_capacity_kwh: f64,
    /// Site to fetch live weather for; `None` uses the configured site.
    pub location: Option<Location>,
    /// Local time of day being simulated.
    pub now: NaiveTime,
}

impl SimulationInput {
    pub fn new(
        weather: impl Into<WeatherMode>,
        homes: i64,
        battery_capacity_kwh: f64,
        now: NaiveTime,
    ) -> Self {
        Self {
            weather: weather.into(),
            homes,
            battery_capacity_kwh,
            location: None,
            now,
        }
    }

    #[must_use]
    pub fn at_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// The two randomized quantities of a simulation.
///
/// Sampled from an injected random source so tests can pin exact values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draws {
    /// Draw of a single home (kW).
    pub per_home_kw: f64,
    /// Battery charge level (percent).
    pub battery_level_percent: u8,
}

impl Draws {
    /// Samples the per-home draw for `hour` and a battery level.
    ///
    /// The per-home draw is uniform over the peak or off-peak band for the
    /// hour; the battery level is a uniform integer in 30..=95.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, hour: u32) -> Self {
        let per_home_kw = rng.random_range(per_home_draw_range(hour));
        let battery_level_percent = rng.random_range(LEVEL_PERCENT_RANGE);
        Self {
            per_home_kw,
            battery_level_percent,
        }
    }
}

/// Power actually delivered to each load class (kW).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub hospital_kw: f64,
    pub school_kw: f64,
    pub homes_kw: f64,
}

/// Full snapshot produced by one simulation.
///
/// Real-valued fields are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Simulated time of day, `HH:MM:SS`.
    pub current_time: String,
    pub hour: u32,

    /// Weather mode as requested.
    pub weather: String,
    pub cloud_cover_percent: u8,
    pub sunrise_time: String,
    pub sunset_time: String,

    pub homes: i64,
    pub battery_capacity_kwh: f64,

    pub solar_power_kw: f64,
    pub battery_level_percent: u8,
    pub battery_support_kw: f64,

    pub total_demand_kw: f64,
    pub total_supply_kw: f64,

    pub distribution: Distribution,

    pub alert: Alert,
    /// Ordered diagnostics; never empty.
    pub suggestions: Vec<String>,
}
