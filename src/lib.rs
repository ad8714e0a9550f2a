pub mod annealing;
pub mod cancel;
pub mod energy;
pub mod error;
pub mod metropolis;
pub mod qubo;
pub mod rng;
pub mod tempering;

// Re-export commonly used types for convenience
pub use annealing::{simulated_annealing, CoolingSchedule, SaConfig, SaResult};
pub use cancel::CancellationToken;
pub use energy::{EnergyFunction, NeighborFunction, State};
pub use error::{Result, StochoptError};
pub use rng::RandomNumberGenerator;
pub use tempering::{parallel_tempering, PtConfig, PtResult, Spacing};
