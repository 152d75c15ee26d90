/// Download formats for a simulation result.
pub mod export;
