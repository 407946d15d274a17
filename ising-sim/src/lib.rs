//! Metropolis Monte Carlo for the 2D square-lattice Ising model.
//!
//! Temperature and field sweeps with independent repetitions, majority-vote
//! coarse-graining of equilibrated snapshots, and Onsager's exact
//! magnetization as a reference curve.

pub mod coarse_graining;
pub mod config;
pub mod error;
pub mod geometry;
pub mod lattice;
pub mod mcmc;
pub mod onsager;
pub mod output;
pub mod simulation;
pub mod spins;
pub mod statistics;

mod parallel;

pub use coarse_graining::{coarse_grain_chain, iterative_coarse_graining, reduce_block};
pub use config::{
    CoarseGrainConfig, DataRunConfig, FieldSweepConfig, ParamRange, TemperatureSweepConfig,
};
pub use error::{IsingError, Result};
pub use lattice::Lattice;
pub use onsager::{onsager_magnetization, reference_curve, T_CRIT};
pub use simulation::{multi_seed_magnetization, sweep_over_field, sweep_over_temperature};
pub use spins::SpinGrid;
pub use statistics::{FieldSweepResult, TemperatureSweepResult};
