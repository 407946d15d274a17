//! Typed errors for lattice construction, sampling, coarse-graining and output.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsingError {
    /// Lattice side length must be at least one.
    #[error("lattice size must be positive, got {size}")]
    InvalidDimension { size: usize },

    /// A supplied initial configuration does not hold `size * size` spins.
    #[error("initial state has {actual} spins, expected {expected}")]
    InitialStateShape { expected: usize, actual: usize },

    /// Block size does not evenly divide the grid being coarse-grained.
    #[error("grid {rows}x{cols} is not divisible by block size {block_size}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        block_size: usize,
    },

    /// The sampling schedule never records a measurement.
    #[error("n_steps = {n_steps} records no samples (sampling happens every 100th sweep)")]
    InsufficientSamples { n_steps: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_dimension_mismatch() {
        let err = IsingError::DimensionMismatch {
            rows: 5,
            cols: 5,
            block_size: 3,
        };
        assert_eq!(err.to_string(), "grid 5x5 is not divisible by block size 3");
    }

    #[test]
    fn display_insufficient_samples() {
        let err = IsingError::InsufficientSamples { n_steps: 100 };
        assert!(err.to_string().contains("n_steps = 100"));
    }

    #[test]
    fn io_error_keeps_source() {
        let err = IsingError::Io {
            path: PathBuf::from("data/M0.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let dyn_err: &dyn std::error::Error = &err;
        assert!(dyn_err.source().is_some());
        assert!(err.to_string().starts_with("failed to write data/M0.txt"));
    }
}
