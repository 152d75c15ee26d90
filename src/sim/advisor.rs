//! Alert and diagnostic suggestions derived from a simulated instant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cloud cover at or above which generation warnings are raised.
pub const HIGH_CLOUD_COVER_PERCENT: u8 = 70;

/// Daytime solar output below which the panels are flagged.
pub const LOW_SOLAR_KW: f64 = 1.0;

const SUFFICIENT_MESSAGE: &str = "✅ Supply sufficient";
const SHORTAGE_MESSAGE: &str = "⚠️ Not enough energy. Low priority load reduced!";

/// Headline status of the microgrid. Serialized as its display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alert {
    #[serde(rename = "✅ Supply sufficient")]
    Sufficient,
    #[serde(rename = "⚠️ Not enough energy. Low priority load reduced!")]
    Shortage,
}

impl Alert {
    /// Shortage iff supply is strictly below demand.
    pub fn from_balance(total_supply_kw: f64, total_demand_kw: f64) -> Self {
        if total_supply_kw < total_demand_kw {
            Self::Shortage
        } else {
            Self::Sufficient
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Sufficient => SUFFICIENT_MESSAGE,
            Self::Shortage => SHORTAGE_MESSAGE,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Unrounded figures the suggestion rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub is_daylight: bool,
    pub solar_power_kw: f64,
    pub cloud_cover_percent: u8,
    pub total_supply_kw: f64,
    pub total_demand_kw: f64,
    pub battery_is_low: bool,
}

/// Builds the ordered suggestion list. Never empty.
///
/// Rules fire independently in this order: low daytime solar, heavy cloud
/// (two entries), shortage (three entries), low battery. When none fire the
/// list holds a single stability message.
pub fn suggestions(a: &Assessment) -> Vec<String> {
    let mut out = Vec::new();

    if a.is_daylight && a.solar_power_kw < LOW_SOLAR_KW {
        out.push(
            "⚠️ Solar output is very low during daytime. Check solar panel efficiency/shading."
                .to_string(),
        );
    }

    if a.cloud_cover_percent >= HIGH_CLOUD_COVER_PERCENT {
        out.push(format!(
            "☁️ High cloud cover ({}%). Solar generation reduced.",
            a.cloud_cover_percent
        ));
        out.push("🔋 Use battery backup carefully during low solar production hours.".to_string());
    }

    if a.total_supply_kw < a.total_demand_kw {
        let shortfall = a.total_demand_kw - a.total_supply_kw;
        out.push(format!(
            "⚡ Energy shortage: {shortfall:.2} kW. Add solar panels or reduce load."
        ));
        out.push("🏠 Reduce home electricity usage during 6pm–11pm peak hours.".to_string());
        out.push("🔋 Increase battery capacity for night & cloudy weather.".to_string());
    }

    if a.battery_is_low {
        out.push(
            "🔋 Battery is low. Charge battery during peak solar time (10am–2pm).".to_string(),
        );
    }

    if out.is_empty() {
        out.push(STABLE_MESSAGE.to_string());
    }

    out
}

/// The sole suggestion when nothing needs attention.
pub const STABLE_MESSAGE: &str = "✅ Microgrid stable. Continue monitoring regularly.";
