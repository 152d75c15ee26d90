//! Download formats for the latest simulation result.
//!
//! Three renderings of a [`SimulationResult`]: pretty JSON, a fixed-layout
//! text report and a one-row CSV. Each is written to any `Write` so the same
//! code serves HTTP downloads and the command line.

use std::fmt;
use std::io::{self, Write};

use crate::sim::SimulationResult;

const REPORT_TITLE: &str = "AI SMART MICROGRID REPORT (SDG 7)";
const RULE_WIDTH: usize = 40;

/// Joins suggestions into the single CSV cell.
pub const SUGGESTION_SEPARATOR: &str = " | ";

/// Column header for CSV export.
const HEADER: &str = "current_time,hour,weather,cloud_cover_percent,sunrise_time,sunset_time,\
                      homes,battery_capacity_kwh,solar_power_kw,battery_level_percent,\
                      battery_support_kw,total_demand_kw,total_supply_kw,\
                      hospital_kw,school_kw,homes_kw,alert,suggestions";

/// A download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Text,
    Csv,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
            Self::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }

    /// Renders `result` in this format.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if serialization fails.
    pub fn render(self, result: &SimulationResult) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        match self {
            Self::Json => buf.extend_from_slice(to_pretty_json(result)?.as_bytes()),
            Self::Text => buf.extend_from_slice(render_text_report(result).as_bytes()),
            Self::Csv => write_csv(result, &mut buf)?,
        }
        Ok(buf)
    }
}

/// `microgrid_report_<stamp>.<ext>`, where `stamp` is `YYYYMMDD_HHMMSS`.
pub fn report_filename(stamp: &str, format: Format) -> String {
    format!("microgrid_report_{stamp}.{}", format.extension())
}

/// Pretty-printed JSON of the result.
///
/// # Errors
///
/// Returns an `io::Error` if serialization fails.
pub fn to_pretty_json(result: &SimulationResult) -> io::Result<String> {
    serde_json::to_string_pretty(result).map_err(io::Error::other)
}

/// Real numbers as shown in the text report: shortest form, always with a
/// decimal point (`10.0`, `4.36`).
struct Real(f64);

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Renders the fixed-layout plain-text report. Lines are joined by `\n`
/// with no trailing newline.
pub fn render_text_report(r: &SimulationResult) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);
    let d = &r.distribution;

    let mut lines = vec![
        REPORT_TITLE.to_string(),
        heavy,
        format!("Hour: {}", r.hour),
        format!("Weather: {}", r.weather),
        format!("Homes: {}", r.homes),
        format!("Battery Capacity (kWh): {}", Real(r.battery_capacity_kwh)),
        rule.clone(),
        format!("Solar Power (kW): {}", Real(r.solar_power_kw)),
        format!("Battery Level (%): {}", r.battery_level_percent),
        format!("Battery Support (kW): {}", Real(r.battery_support_kw)),
        format!("Total Demand (kW): {}", Real(r.total_demand_kw)),
        format!("Total Supply (kW): {}", Real(r.total_supply_kw)),
        rule.clone(),
        "Power Distribution (kW):".to_string(),
        format!("  Hospital: {}", Real(d.hospital_kw)),
        format!("  School:   {}", Real(d.school_kw)),
        format!("  Homes:    {}", Real(d.homes_kw)),
        rule.clone(),
        format!("Alert: {}", r.alert),
        rule,
        "AI Suggestions:".to_string(),
    ];
    lines.extend(r.suggestions.iter().map(|s| format!(" - {s}")));
    lines.join("\n")
}

/// Writes the result as a header row and one data row.
///
/// # Arguments
///
/// * `result` - Simulation result to flatten
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &SimulationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let d = &result.distribution;
    wtr.write_record(&[
        result.current_time.clone(),
        result.hour.to_string(),
        result.weather.clone(),
        result.cloud_cover_percent.to_string(),
        result.sunrise_time.clone(),
        result.sunset_time.clone(),
        result.homes.to_string(),
        format!("{:.2}", result.battery_capacity_kwh),
        format!("{:.2}", result.solar_power_kw),
        result.battery_level_percent.to_string(),
        format!("{:.2}", result.battery_support_kw),
        format!("{:.2}", result.total_demand_kw),
        format!("{:.2}", result.total_supply_kw),
        format!("{:.2}", d.hospital_kw),
        format!("{:.2}", d.school_kw),
        format!("{:.2}", d.homes_kw),
        result.alert.message().to_string(),
        result.suggestions.join(SUGGESTION_SEPARATOR),
    ])?;

    wtr.flush()?;
    Ok(())
}
