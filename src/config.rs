//! TOML-based service configuration.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::devices::solar::DEFAULT_PANEL_CAPACITY_KW;
use crate::sim::clock::SiteClock;
use crate::weather::{Location, OpenMeteo};

/// Top-level configuration parsed from TOML.
///
/// All sections have defaults, so an empty file (or no file at all, via
/// [`AppConfig::default`]) is a working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,
    /// Microgrid site location and clock.
    #[serde(default)]
    pub site: SiteConfig,
    /// Live weather provider.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Simulation constants.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Language-model backend for the agent routes.
    #[serde(default)]
    pub agent: AgentConfig,
}

/// HTTP listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address (an IP literal).
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError {
            field: "server.host".to_string(),
            message: format!("\"{}\" is not an IP address", self.host),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Microgrid site location and clock.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// IANA time zone of the site, used for the simulation clock and weather.
    pub timezone: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: Location::KURDUVADI.latitude,
            longitude: Location::KURDUVADI.longitude,
            timezone: "Asia/Kolkata".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }

    /// Clock for the configured zone.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the zone name is unknown.
    pub fn clock(&self) -> Result<SiteClock, ConfigError> {
        SiteClock::in_zone(&self.timezone)
            .map_err(|e| ConfigError::new("site.timezone", e.to_string()))
    }
}

/// Live weather provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// Open-Meteo API root.
    pub base_url: String,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: OpenMeteo::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Simulation constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Clear-sky solar plant capacity (kW).
    pub panel_capacity_kw: f64,
    /// Fixed random seed; unset draws fresh randomness per process.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            panel_capacity_kw: DEFAULT_PANEL_CAPACITY_KW,
            seed: None,
        }
    }
}

/// Language-model backend (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// API root, without the `/v1/chat/completions` path.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Environment variable holding the API key. Unset disables the agent.
    pub api_key_env: String,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
    /// Sampling temperature (0.0-2.0).
    pub temperature: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            temperature: 0.3,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"site.timezone"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl AppConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Only operator
    /// settings are checked here; per-request inputs are never validated.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.server.socket_addr() {
            errors.push(e);
        }

        let site = &self.site;
        if !(-90.0..=90.0).contains(&site.latitude) {
            errors.push(ConfigError::new("site.latitude", "must be in [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&site.longitude) {
            errors.push(ConfigError::new("site.longitude", "must be in [-180, 180]"));
        }
        if let Err(e) = site.clock() {
            errors.push(e);
        }

        if self.weather.base_url.is_empty() {
            errors.push(ConfigError::new("weather.base_url", "must not be empty"));
        }
        if self.weather.timeout_secs == 0 {
            errors.push(ConfigError::new("weather.timeout_secs", "must be > 0"));
        }

        if self.simulation.panel_capacity_kw <= 0.0 {
            errors.push(ConfigError::new("simulation.panel_capacity_kw", "must be > 0"));
        }

        let agent = &self.agent;
        if agent.timeout_secs == 0 {
            errors.push(ConfigError::new("agent.timeout_secs", "must be > 0"));
        }
        if !(0.0..=2.0).contains(&agent.temperature) {
            errors.push(ConfigError::new("agent.temperature", "must be in [0.0, 2.0]"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let cfg = AppConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "defaults should be valid: {errors:?}");
    }

    #[test]
    fn defaults_match_reference_site() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.site.location(), Location::KURDUVADI);
        assert_eq!(cfg.site.timezone, "Asia/Kolkata");
        assert_eq!(cfg.weather.timeout_secs, 10);
        assert_eq!(cfg.simulation.panel_capacity_kw, 10.0);
        assert!(cfg.simulation.seed.is_none());
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[site]
latitude = 52.37
longitude = 4.89
timezone = "Europe/Amsterdam"

[weather]
base_url = "http://localhost:9000"
timeout_secs = 3

[simulation]
panel_capacity_kw = 12.5
seed = 7

[agent]
base_url = "http://localhost:11434"
model = "llama3"
api_key_env = "LOCAL_LLM_KEY"
timeout_secs = 120
temperature = 0.0
"#;
        let cfg = AppConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.server.port), Some(8080));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(Some(7)));
        assert_eq!(cfg.as_ref().map(|c| &*c.agent.model), Some("llama3"));
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = AppConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(Some(99)));
        assert_eq!(
            cfg.as_ref().map(|c| c.simulation.panel_capacity_kw),
            Some(10.0)
        );
        assert_eq!(cfg.as_ref().map(|c| c.server.port), Some(5000));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[server]
port = 5000
bogus_field = true
"#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn socket_addr_requires_ip() {
        let mut cfg = AppConfig::default();
        assert_eq!(
            cfg.server.socket_addr().ok(),
            Some(SocketAddr::from(([127, 0, 0, 1], 5000)))
        );
        cfg.server.host = "localhost".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "server.host"));
    }

    #[test]
    fn validation_catches_bad_timezone() {
        let mut cfg = AppConfig::default();
        cfg.site.timezone = "Nowhere/Special".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "site.timezone"));
    }

    #[test]
    fn validation_catches_out_of_range_site() {
        let mut cfg = AppConfig::default();
        cfg.site.latitude = 91.0;
        cfg.site.longitude = -181.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "site.latitude"));
        assert!(errors.iter().any(|e| e.field == "site.longitude"));
    }

    #[test]
    fn validation_catches_zero_timeouts_and_capacity() {
        let mut cfg = AppConfig::default();
        cfg.weather.timeout_secs = 0;
        cfg.agent.timeout_secs = 0;
        cfg.simulation.panel_capacity_kw = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weather.timeout_secs"));
        assert!(errors.iter().any(|e| e.field == "agent.timeout_secs"));
        assert!(errors.iter().any(|e| e.field == "simulation.panel_capacity_kw"));
    }

    #[test]
    fn validation_catches_bad_temperature() {
        let mut cfg = AppConfig::default();
        cfg.agent.temperature = 3.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "agent.temperature"));
    }

    #[test]
    fn error_display_includes_field() {
        let e = ConfigError::new("site.timezone", "unknown");
        assert_eq!(e.to_string(), "config error: site.timezone: unknown");
    }
}
