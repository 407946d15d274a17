use serde::Serialize;

use super::stats::{column_mean, column_variance};
use crate::config::{FieldSweepConfig, TemperatureSweepConfig};

/// Observables of a temperature sweep repeated over independent seeds.
///
/// Matrices are indexed `[repetition][point]`; per-point vectors have one
/// entry per swept temperature. The configuration that produced the data
/// travels with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSweepResult {
    /// Temperatures actually simulated.
    pub temperatures: Vec<f64>,
    /// `M`: per-repetition mean spin.
    pub magnetization: Vec<Vec<f64>>,
    /// `E`: per-repetition mean energy per site.
    pub energy: Vec<Vec<f64>>,
    /// `X`: variance of `M` across repetitions.
    pub susceptibility: Vec<f64>,
    /// `C`: variance of `E` across repetitions.
    pub heat_capacity: Vec<f64>,
    pub config: TemperatureSweepConfig,
}

impl TemperatureSweepResult {
    /// Assemble a result from per-repetition rows, deriving `X` and `C` as
    /// population variances over the repetition axis.
    pub fn from_rows(
        config: TemperatureSweepConfig,
        temperatures: Vec<f64>,
        magnetization: Vec<Vec<f64>>,
        energy: Vec<Vec<f64>>,
    ) -> Self {
        let susceptibility = column_variance(&magnetization);
        let heat_capacity = column_variance(&energy);
        Self {
            temperatures,
            magnetization,
            energy,
            susceptibility,
            heat_capacity,
            config,
        }
    }

    pub fn n_repeats(&self) -> usize {
        self.magnetization.len()
    }

    pub fn n_points(&self) -> usize {
        self.temperatures.len()
    }

    /// Magnetization averaged over repetitions.
    pub fn mean_magnetization(&self) -> Vec<f64> {
        column_mean(&self.magnetization)
    }

    /// Energy per site averaged over repetitions.
    pub fn mean_energy(&self) -> Vec<f64> {
        column_mean(&self.energy)
    }

    /// Mean magnetization divided by its largest value (`M / M_0`).
    pub fn reduced_magnetization(&self) -> Vec<f64> {
        let mean = self.mean_magnetization();
        let max = mean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == 0.0 || !max.is_finite() {
            return mean;
        }
        mean.into_iter().map(|m| m / max).collect()
    }
}

/// Magnetization (and energy per site) along a field sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSweepResult {
    pub fields: Vec<f64>,
    pub magnetization: Vec<f64>,
    pub energy: Vec<f64>,
    pub config: FieldSweepConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variances_over_repetitions() {
        let res = TemperatureSweepResult::from_rows(
            TemperatureSweepConfig::default(),
            vec![1.0, 2.0],
            vec![vec![1.0, 0.5], vec![0.5, 0.5]],
            vec![vec![-2.0, -1.0], vec![-1.0, -1.0]],
        );
        assert_eq!(res.n_repeats(), 2);
        assert_eq!(res.n_points(), 2);
        assert_eq!(res.susceptibility, vec![0.0625, 0.0]);
        assert_eq!(res.heat_capacity, vec![0.25, 0.0]);
        assert_eq!(res.mean_magnetization(), vec![0.75, 0.5]);
        assert_eq!(res.mean_energy(), vec![-1.5, -1.0]);
    }

    #[test]
    fn test_reduced_magnetization() {
        let res = TemperatureSweepResult::from_rows(
            TemperatureSweepConfig::default(),
            vec![1.0, 2.0, 3.0],
            vec![vec![0.8, 0.4, 0.0]],
            vec![vec![-2.0, -1.5, -0.5]],
        );
        assert_eq!(res.reduced_magnetization(), vec![1.0, 0.5, 0.0]);
    }
}
