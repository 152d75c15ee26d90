//! Common types and traits for device simulation components.

use chrono::{NaiveTime, Timelike};

/// Time-of-day information passed to devices during power calculations.
///
/// # Fields
/// * `hour` - Wall-clock hour (0-23), used by hour-banded demand profiles
/// * `decimal_hour` - Hour of day as a real number (13.5 = 13:30), used by the solar curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceContext {
    pub hour: u32,
    pub decimal_hour: f64,
}

impl DeviceContext {
    /// Creates a context from clock components.
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour,
            decimal_hour: f64::from(hour) + f64::from(minute) / 60.0 + f64::from(second) / 3600.0,
        }
    }

    /// Creates a context from a time of day.
    pub fn from_time(time: NaiveTime) -> Self {
        Self::new(time.hour(), time.minute(), time.second())
    }
}

/// Trait defining a device that produces or consumes electricity.
///
/// This trait provides a common interface for all devices in the microgrid so
/// the engine can query them uniformly.
pub trait Device {
    /// Returns the power magnitude in kilowatts at the given time of day.
    ///
    /// Supply devices report what they can deliver, loads report what they
    /// draw. Both are non-negative for sane inputs.
    fn power_kw(&self, context: &DeviceContext) -> f64;

    /// Returns a human-readable type name for the device.
    fn device_type(&self) -> &'static str;
}
