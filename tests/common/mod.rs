//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use microgrid_sim::sim::Simulator;
use microgrid_sim::weather::{Location, WeatherError, WeatherProvider, WeatherSnapshot};

/// Address nothing listens on; connections are refused immediately.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";

/// Time of day helper.
pub fn at(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

/// 2026-01-10 at the given time of day.
pub fn on_reference_day(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 10)
        .unwrap()
        .and_time(at(h, m, s))
}

/// Provider that always reports the same snapshot.
pub struct FixedWeather(pub WeatherSnapshot);

#[async_trait]
impl WeatherProvider for FixedWeather {
    async fn current(&self, _: Location) -> Result<WeatherSnapshot, WeatherError> {
        Ok(self.0.clone())
    }
}

/// Provider that always fails.
pub struct OfflineWeather;

#[async_trait]
impl WeatherProvider for OfflineWeather {
    async fn current(&self, _: Location) -> Result<WeatherSnapshot, WeatherError> {
        Err(WeatherError::Malformed("offline".to_string()))
    }
}

/// Seeded simulator (10 kW panels, Kurduvadi) over the given provider.
pub fn seeded_simulator(provider: impl WeatherProvider + 'static, seed: u64) -> Simulator {
    Simulator::new(Arc::new(provider), 10.0, Location::KURDUVADI, Some(seed))
}
