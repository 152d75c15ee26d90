use std::ops::RangeInclusive;

use crate::devices::types::{Device, DeviceContext};

/// Range the battery charge level is sampled from, in percent.
pub const LEVEL_PERCENT_RANGE: RangeInclusive<u8> = 30..=95;

/// Charge level below which the battery is considered low.
pub const LOW_LEVEL_PERCENT: u8 = 35;

/// A battery energy storage system seen as a supply source.
///
/// `Battery` does not track state of charge across calls: the level is an
/// externally sampled snapshot, and the whole stored energy at that level is
/// offered to the microgrid as support power for the current instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Battery {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Charge level in percent.
    pub level_percent: u8,
}

impl Battery {
    /// Creates a battery snapshot.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (not validated)
    /// * `level_percent` - Current charge level in percent
    pub fn new(capacity_kwh: f64, level_percent: u8) -> Self {
        Self {
            capacity_kwh,
            level_percent,
        }
    }

    /// Support power available from the battery: `level/100 * capacity`.
    pub fn available_kw(&self) -> f64 {
        f64::from(self.level_percent) / 100.0 * self.capacity_kwh
    }

    /// Whether the charge level is below [`LOW_LEVEL_PERCENT`].
    pub fn is_low(&self) -> bool {
        self.level_percent < LOW_LEVEL_PERCENT
    }
}

impl Device for Battery {
    fn power_kw(&self, _context: &DeviceContext) -> f64 {
        self.available_kw()
    }

    fn device_type(&self) -> &'static str {
        "Battery"
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn available_power_scales_with_level() {
        assert_relative_eq!(Battery::new(10.0, 30).available_kw(), 3.0);
        assert_relative_eq!(Battery::new(10.0, 95).available_kw(), 9.5);
        assert_eq!(Battery::new(0.0, 80).available_kw(), 0.0);
    }

    #[test]
    fn low_threshold_is_exclusive() {
        assert!(Battery::new(10.0, 34).is_low());
        assert!(!Battery::new(10.0, 35).is_low());
    }

    #[test]
    fn negative_capacity_is_not_rejected() {
        let battery = Battery::new(-10.0, 50);
        assert_relative_eq!(battery.available_kw(), -5.0);
    }

    #[test]
    fn device_reports_available_power() {
        let battery = Battery::new(12.0, 50);
        assert_relative_eq!(battery.power_kw(&DeviceContext::new(3, 0, 0)), 6.0);
        assert_eq!(battery.device_type(), "Battery");
    }
}
