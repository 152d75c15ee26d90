//! Weather resolution: maps a weather mode to cloud cover and daylight bounds.
//!
//! Manual modes use fixed cloud cover with static 06:00/18:00 daylight. The
//! `auto` mode asks a [`WeatherProvider`] and falls back to the static values
//! when the provider is unavailable. The fallback is an explicit
//! [`WeatherResolution::Fallback`] outcome rather than a swallowed error.

mod open_meteo;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use open_meteo::OpenMeteo;

/// Cloud cover used when the mode is unknown or the provider is unavailable.
pub const FALLBACK_CLOUD_COVER_PERCENT: u8 = 40;

/// Static daylight window used by every mode except a successful `auto`.
pub const STATIC_SUNRISE_HOUR: u32 = 6;
pub const STATIC_SUNSET_HOUR: u32 = 18;

/// Requested weather source for a simulation.
///
/// Unknown names are kept verbatim so they can be echoed back; they simulate
/// with [`FALLBACK_CLOUD_COVER_PERCENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherMode {
    Auto,
    Sunny,
    Cloudy,
    Rainy,
    Other(String),
}

impl WeatherMode {
    /// The mode name as requested.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => "auto",
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Other(name) => name,
        }
    }

    /// Fixed cloud cover for manual modes, `None` for `auto`.
    pub fn static_cloud_cover(&self) -> Option<u8> {
        match self {
            Self::Auto => None,
            Self::Sunny => Some(10),
            Self::Cloudy => Some(60),
            Self::Rainy => Some(90),
            Self::Other(_) => Some(FALLBACK_CLOUD_COVER_PERCENT),
        }
    }
}

impl From<&str> for WeatherMode {
    fn from(name: &str) -> Self {
        match name {
            "auto" => Self::Auto,
            "sunny" => Self::Sunny,
            "cloudy" => Self::Cloudy,
            "rainy" => Self::Rainy,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for WeatherMode {
    fn from(name: String) -> Self {
        match Self::from(name.as_str()) {
            Self::Other(_) => Self::Other(name),
            known => known,
        }
    }
}

impl fmt::Display for WeatherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic coordinates of the microgrid site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Kurduvadi, Maharashtra.
    pub const KURDUVADI: Self = Self {
        latitude: 18.13645,
        longitude: 75.44015,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::KURDUVADI
    }
}

/// Cloud cover and daylight bounds for one simulation.
///
/// `sunrise_hour < sunset_hour` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub cloud_cover_percent: u8,
    pub sunrise_hour: u32,
    pub sunset_hour: u32,
    /// Display-only `HH:MM`.
    pub sunrise_time: String,
    /// Display-only `HH:MM`.
    pub sunset_time: String,
}

impl WeatherSnapshot {
    /// Snapshot with the given cloud cover and the static 06:00/18:00 window.
    pub fn with_static_daylight(cloud_cover_percent: u8) -> Self {
        Self {
            cloud_cover_percent,
            sunrise_hour: STATIC_SUNRISE_HOUR,
            sunset_hour: STATIC_SUNSET_HOUR,
            sunrise_time: format!("{STATIC_SUNRISE_HOUR:02}:00"),
            sunset_time: format!("{STATIC_SUNSET_HOUR:02}:00"),
        }
    }
}

/// Failure to obtain live weather. Never surfaced to simulation callers.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather provider returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed weather payload: {0}")]
    Malformed(String),
}

/// Source of live weather for the `auto` mode.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current cloud cover and today's sunrise/sunset at `location`.
    async fn current(&self, location: Location) -> Result<WeatherSnapshot, WeatherError>;
}

/// How the weather for a simulation was obtained.
#[derive(Debug)]
pub enum WeatherResolution {
    /// A manual mode with fixed values.
    Static(WeatherSnapshot),
    /// Live data from the provider.
    Live(WeatherSnapshot),
    /// The provider failed; fallback defaults are used.
    Fallback {
        snapshot: WeatherSnapshot,
        error: WeatherError,
    },
}

impl WeatherResolution {
    pub fn snapshot(&self) -> &WeatherSnapshot {
        match self {
            Self::Static(snapshot) | Self::Live(snapshot) | Self::Fallback { snapshot, .. } => {
                snapshot
            }
        }
    }

    pub fn into_snapshot(self) -> WeatherSnapshot {
        match self {
            Self::Static(snapshot) | Self::Live(snapshot) | Self::Fallback { snapshot, .. } => {
                snapshot
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Resolves the weather for `mode`, consulting `provider` only for `auto`.
pub async fn resolve(
    mode: &WeatherMode,
    location: Location,
    provider: &dyn WeatherProvider,
) -> WeatherResolution {
    if let Some(cloud_cover) = mode.static_cloud_cover() {
        return WeatherResolution::Static(WeatherSnapshot::with_static_daylight(cloud_cover));
    }

    match provider.current(location).await {
        Ok(snapshot) => {
            debug!(
                cloud_cover = snapshot.cloud_cover_percent,
                sunrise = %snapshot.sunrise_time,
                sunset = %snapshot.sunset_time,
                "live weather"
            );
            WeatherResolution::Live(snapshot)
        }
        Err(error) => {
            warn!(%error, "weather provider unavailable, using fallback defaults");
            WeatherResolution::Fallback {
                snapshot: WeatherSnapshot::with_static_daylight(FALLBACK_CLOUD_COVER_PERCENT),
                error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(WeatherSnapshot);

    #[async_trait]
    impl WeatherProvider for Fixed {
        async fn current(&self, _location: Location) -> Result<WeatherSnapshot, WeatherError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl WeatherProvider for Broken {
        async fn current(&self, _location: Location) -> Result<WeatherSnapshot, WeatherError> {
            Err(WeatherError::Malformed("missing daily.sunrise".to_string()))
        }
    }

    fn live() -> WeatherSnapshot {
        WeatherSnapshot {
            cloud_cover_percent: 73,
            sunrise_hour: 6,
            sunset_hour: 18,
            sunrise_time: "06:55".to_string(),
            sunset_time: "18:14".to_string(),
        }
    }

    #[test]
    fn mode_parsing_keeps_unknown_names() {
        assert_eq!(WeatherMode::from("auto"), WeatherMode::Auto);
        assert_eq!(WeatherMode::from("rainy"), WeatherMode::Rainy);
        let other = WeatherMode::from("Sunny");
        assert_eq!(other, WeatherMode::Other("Sunny".to_string()));
        assert_eq!(other.to_string(), "Sunny");
    }

    #[test]
    fn manual_cloud_cover() {
        assert_eq!(WeatherMode::Sunny.static_cloud_cover(), Some(10));
        assert_eq!(WeatherMode::Cloudy.static_cloud_cover(), Some(60));
        assert_eq!(WeatherMode::Rainy.static_cloud_cover(), Some(90));
        assert_eq!(WeatherMode::from("foggy").static_cloud_cover(), Some(40));
        assert_eq!(WeatherMode::Auto.static_cloud_cover(), None);
    }

    #[test]
    fn static_daylight_strings() {
        let snapshot = WeatherSnapshot::with_static_daylight(10);
        assert_eq!(snapshot.sunrise_time, "06:00");
        assert_eq!(snapshot.sunset_time, "18:00");
        assert_eq!((snapshot.sunrise_hour, snapshot.sunset_hour), (6, 18));
    }

    #[tokio::test]
    async fn manual_modes_skip_the_provider() {
        let resolution = resolve(&WeatherMode::Cloudy, Location::KURDUVADI, &Broken).await;
        assert!(matches!(resolution, WeatherResolution::Static(_)));
        assert_eq!(resolution.snapshot().cloud_cover_percent, 60);
    }

    #[tokio::test]
    async fn auto_uses_live_data() {
        let resolution = resolve(&WeatherMode::Auto, Location::KURDUVADI, &Fixed(live())).await;
        assert!(matches!(resolution, WeatherResolution::Live(_)));
        assert_eq!(resolution.into_snapshot(), live());
    }

    #[tokio::test]
    async fn auto_falls_back_on_failure() {
        let resolution = resolve(&WeatherMode::Auto, Location::KURDUVADI, &Broken).await;
        assert!(resolution.is_fallback());
        assert_eq!(
            resolution.snapshot(),
            &WeatherSnapshot::with_static_daylight(FALLBACK_CLOUD_COVER_PERCENT)
        );
    }
}
