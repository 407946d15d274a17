pub mod sweep;

pub use sweep::{equilibrate, metropolis_sweep, K_B};
