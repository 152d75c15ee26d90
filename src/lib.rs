//! Community microgrid simulator: solar, battery and priority load shedding
//! for a hospital, a school and homes, served over HTTP with optional
//! language-model analysis.

pub mod agent;
#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
/// Solar plant, load classes and battery.
pub mod devices;
pub mod io;
/// Simulation engine and the latest-result slot.
pub mod sim;
pub mod telemetry;
pub mod weather;
