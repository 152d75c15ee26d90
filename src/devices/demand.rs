//! Demand profiles for the three load classes served by the microgrid.

use std::ops::RangeInclusive;

use crate::devices::types::{Device, DeviceContext};

/// Critical hospital load, drawn around the clock.
pub const HOSPITAL_DEMAND_KW: f64 = 3.0;

/// School load during teaching hours.
pub const SCHOOL_DAY_DEMAND_KW: f64 = 2.0;

/// School standby load outside teaching hours.
pub const SCHOOL_NIGHT_DEMAND_KW: f64 = 0.5;

/// Hours (inclusive) during which the school runs at full load.
pub const SCHOOL_HOURS: RangeInclusive<u32> = 8..=15;

/// Per-home draw during the evening and night peak.
pub const HOME_PEAK_DRAW_KW: RangeInclusive<f64> = 0.35..=0.55;

/// Per-home draw during daytime off-peak.
pub const HOME_OFF_PEAK_DRAW_KW: RangeInclusive<f64> = 0.20..=0.40;

/// Whether homes are in their evening/night peak (18-23 or 0-6).
pub fn is_home_peak_hour(hour: u32) -> bool {
    (18..=23).contains(&hour) || hour <= 6
}

/// Range the per-home draw is sampled from at the given hour.
pub fn per_home_draw_range(hour: u32) -> RangeInclusive<f64> {
    if is_home_peak_hour(hour) {
        HOME_PEAK_DRAW_KW
    } else {
        HOME_OFF_PEAK_DRAW_KW
    }
}

/// The hospital: a fixed critical load.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hospital;

impl Device for Hospital {
    fn power_kw(&self, _context: &DeviceContext) -> f64 {
        HOSPITAL_DEMAND_KW
    }

    fn device_type(&self) -> &'static str {
        "Hospital"
    }
}

/// The school: full load during teaching hours, standby otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct School;

impl Device for School {
    fn power_kw(&self, context: &DeviceContext) -> f64 {
        if SCHOOL_HOURS.contains(&context.hour) {
            SCHOOL_DAY_DEMAND_KW
        } else {
            SCHOOL_NIGHT_DEMAND_KW
        }
    }

    fn device_type(&self) -> &'static str {
        "School"
    }
}

/// A group of identical homes sharing one sampled per-home draw.
///
/// The count is not validated: a negative count produces negative demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homes {
    /// Number of homes on the microgrid.
    pub count: i64,

    /// Draw of a single home in kilowatts.
    pub per_home_kw: f64,
}

impl Homes {
    pub fn new(count: i64, per_home_kw: f64) -> Self {
        Self { count, per_home_kw }
    }
}

impl Device for Homes {
    fn power_kw(&self, _context: &DeviceContext) -> f64 {
        self.count as f64 * self.per_home_kw
    }

    fn device_type(&self) -> &'static str {
        "Homes"
    }
}
