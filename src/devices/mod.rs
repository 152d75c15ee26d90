//! Device models for the microgrid's supply and demand sides.

/// Battery storage seen as a support source.
pub mod battery;
/// Hospital, school, and residential load profiles.
pub mod demand;
/// Solar generation model.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use battery::Battery;
pub use demand::{Homes, Hospital, School};
pub use solar::SolarPlant;
pub use types::Device;
pub use types::DeviceContext;
