//! Open-Meteo forecast client (no API key required).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Location, WeatherError, WeatherProvider, WeatherSnapshot};

/// Open-Meteo API client.
pub struct OpenMeteo {
    client: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteo {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.open-meteo.com";

    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, without the `/v1/forecast` path
    /// * `timezone` - IANA zone the sunrise/sunset times are reported in
    /// * `timeout` - Whole-request timeout
    pub fn new(
        base_url: impl Into<String>,
        timezone: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timezone: timezone.into(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteo {
    async fn current(&self, location: Location) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);
        debug!(
            %url,
            latitude = location.latitude,
            longitude = location.longitude,
            "fetching weather"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", "cloud_cover".to_string()),
                ("daily", "sunrise,sunset".to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        response.json::<ForecastResponse>().await?.into_snapshot()
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Current,
    daily: Daily,
}

#[derive(Debug, Deserialize)]
struct Current {
    cloud_cover: f64,
}

#[derive(Debug, Deserialize)]
struct Daily {
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

impl ForecastResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let sunrise = self
            .daily
            .sunrise
            .first()
            .ok_or_else(|| WeatherError::Malformed("no sunrise for today".to_string()))?;
        let sunset = self
            .daily
            .sunset
            .first()
            .ok_or_else(|| WeatherError::Malformed("no sunset for today".to_string()))?;

        let (sunrise_hour, sunrise_time) = parse_local_clock(sunrise)?;
        let (sunset_hour, sunset_time) = parse_local_clock(sunset)?;

        Ok(WeatherSnapshot {
            cloud_cover_percent: self.current.cloud_cover.clamp(0.0, 100.0) as u8,
            sunrise_hour,
            sunset_hour,
            sunrise_time,
            sunset_time,
        })
    }
}

/// Splits `2026-01-10T06:55` into the hour and the `HH:MM` display string.
fn parse_local_clock(stamp: &str) -> Result<(u32, String), WeatherError> {
    let parsed = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M")
        .map_err(|e| WeatherError::Malformed(format!("bad timestamp \"{stamp}\": {e}")))?;
    Ok((parsed.hour(), parsed.format("%H:%M").to_string()))
}
