use crate::devices::types::{Device, DeviceContext};
use crate::weather::WeatherSnapshot;

/// Nameplate capacity of the community solar plant.
pub const DEFAULT_PANEL_CAPACITY_KW: f64 = 10.0;

/// Floor for the cloud derating: even full overcast yields diffuse light.
pub const MIN_SOLAR_FACTOR: f64 = 0.2;

/// Keeps the curve denominator positive when sunrise and sunset coincide.
const NOON_GUARD_HOURS: f64 = 0.01;

/// Derating applied to clear-sky output for the given cloud cover.
///
/// Returns `max(0.2, 1 - cloud/100)`: 1.0 under a clear sky, never below 0.2.
pub fn solar_factor(cloud_cover_percent: u8) -> f64 {
    (1.0 - f64::from(cloud_cover_percent) / 100.0).max(MIN_SOLAR_FACTOR)
}

/// A solar plant whose output follows a triangular daylight curve.
///
/// The curve peaks at solar noon (midway between sunrise and sunset) and
/// falls linearly to zero at the edges of the daylight window. Output is then
/// derated by cloud cover via [`solar_factor`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolarPlant {
    /// Clear-sky peak output in kilowatts.
    pub capacity_kw: f64,

    /// Hour the daylight window opens (inclusive).
    pub sunrise_hour: u32,

    /// Hour the daylight window closes (inclusive).
    pub sunset_hour: u32,

    /// Sky obscured by cloud, in percent.
    pub cloud_cover_percent: u8,
}

impl SolarPlant {
    /// Creates a plant operating under the given weather.
    ///
    /// # Arguments
    ///
    /// * `capacity_kw` - Clear-sky peak output in kilowatts
    /// * `weather` - Resolved cloud cover and daylight bounds
    pub fn new(capacity_kw: f64, weather: &WeatherSnapshot) -> Self {
        Self {
            capacity_kw,
            sunrise_hour: weather.sunrise_hour,
            sunset_hour: weather.sunset_hour,
            cloud_cover_percent: weather.cloud_cover_percent,
        }
    }

    /// Whether `decimal_hour` falls inside `[sunrise, sunset]`.
    ///
    /// Always false when sunrise is after sunset.
    pub fn is_daylight(&self, decimal_hour: f64) -> bool {
        f64::from(self.sunrise_hour) <= decimal_hour && decimal_hour <= f64::from(self.sunset_hour)
    }

    /// Position on the daylight curve, in `[0, 1]`.
    pub fn shape(&self, decimal_hour: f64) -> f64 {
        if !self.is_daylight(decimal_hour) {
            return 0.0;
        }

        let sunrise = f64::from(self.sunrise_hour);
        let mid = (sunrise + f64::from(self.sunset_hour)) / 2.0;
        let denom = (mid - sunrise) + NOON_GUARD_HOURS;

        (1.0 - (decimal_hour - mid).abs() / denom).max(0.0)
    }

    /// Solar output in kilowatts at the given decimal hour.
    pub fn output_kw(&self, decimal_hour: f64) -> f64 {
        self.capacity_kw * self.shape(decimal_hour) * solar_factor(self.cloud_cover_percent)
    }
}

impl Device for SolarPlant {
    fn power_kw(&self, context: &DeviceContext) -> f64 {
        self.output_kw(context.decimal_hour)
    }

    fn device_type(&self) -> &'static str {
        "SolarPlant"
    }
}
