/// Alert and suggestion rules.
pub mod advisor;
/// Priority allocation of supply across load classes.
pub mod allocation;
/// Site wall clock.
pub mod clock;
pub mod engine;
/// Latest-result slot shared by the serving layer.
pub mod latest;
pub mod types;

pub use engine::{Simulator, simulate};
pub use latest::LatestResult;
pub use types::{Distribution, Draws, SimulationInput, SimulationResult};
