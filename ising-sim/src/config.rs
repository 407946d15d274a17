use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{IsingError, Result};
use crate::onsager::T_CRIT;

/// Measurements are taken on every sweep whose index is a multiple of this.
pub const SAMPLE_INTERVAL: usize = 100;

fn validate_range(r: &ParamRange) -> std::result::Result<(), ValidationError> {
    if r.num_points < 1 {
        return Err(ValidationError::new("num_points must be >= 1"));
    }
    if !r.start.is_finite() || !r.stop.is_finite() {
        return Err(ValidationError::new("range bounds must be finite"));
    }
    Ok(())
}

/// Inclusive, linearly spaced parameter range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_range"))]
pub struct ParamRange {
    pub start: f64,
    pub stop: f64,
    pub num_points: usize,
}

impl ParamRange {
    pub fn new(start: f64, stop: f64, num_points: usize) -> Self {
        Self {
            start,
            stop,
            num_points,
        }
    }

    /// `num_points` values from `start` to `stop`, both included.
    ///
    /// A single point yields `[start]`. The last value is exactly `stop`.
    pub fn values(&self) -> Vec<f64> {
        match self.num_points {
            0 => vec![],
            1 => vec![self.start],
            n => {
                let step = (self.stop - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.stop
                        } else {
                            self.start + i as f64 * step
                        }
                    })
                    .collect()
            }
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

fn validate_temperature_sweep(cfg: &TemperatureSweepConfig) -> std::result::Result<(), ValidationError> {
    if cfg.n_repeats < 1 {
        return Err(ValidationError::new("n_repeats must be >= 1"));
    }
    if !cfg.field.is_finite() {
        return Err(ValidationError::new("field must be finite"));
    }
    if cfg.temperatures().iter().any(|&t| !(t > 0.0 && t.is_finite())) {
        return Err(ValidationError::new("temperatures must be positive and finite"));
    }
    Ok(())
}

/// Parameters of a temperature sweep repeated over independent seeds.
///
/// Repetition `r` seeds every one of its lattices with `base_seed + r`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_temperature_sweep"))]
pub struct TemperatureSweepConfig {
    /// Lattice side length `N`.
    pub size: usize,
    #[validate]
    pub temperatures: ParamRange,
    /// Production sweeps are indexed `1..n_steps`.
    pub n_steps: usize,
    /// Discarded sweeps before production.
    pub n_equil: usize,
    #[serde(default)]
    pub field: f64,
    #[serde(default = "default_n_repeats")]
    pub n_repeats: usize,
    #[serde(default)]
    pub base_seed: u64,
    /// Round each swept temperature to this many decimals before simulating.
    #[serde(default)]
    pub temperature_decimals: Option<u32>,
    /// Run every (repetition, point) on the calling thread.
    #[serde(default)]
    pub sequential: bool,
}

fn default_n_repeats() -> usize {
    5
}

impl Default for TemperatureSweepConfig {
    fn default() -> Self {
        Self {
            size: 50,
            temperatures: ParamRange::new(0.5, 3.5, 50),
            n_steps: 1001,
            n_equil: 100,
            field: 0.0,
            n_repeats: default_n_repeats(),
            base_seed: 0,
            temperature_decimals: None,
            sequential: false,
        }
    }
}

impl TemperatureSweepConfig {
    /// Temperatures actually simulated, after optional rounding.
    pub fn temperatures(&self) -> Vec<f64> {
        let values = self.temperatures.values();
        match self.temperature_decimals {
            Some(d) => values.into_iter().map(|t| round_to(t, d)).collect(),
            None => values,
        }
    }

    /// Seed shared by every lattice of repetition `repeat`.
    pub fn seed_for(&self, repeat: usize) -> u64 {
        self.base_seed + repeat as u64
    }

    /// Measurements per point: multiples of [`SAMPLE_INTERVAL`] in `1..n_steps`.
    pub fn samples_per_point(&self) -> usize {
        self.n_steps.saturating_sub(1) / SAMPLE_INTERVAL
    }

    pub fn check(&self) -> Result<()> {
        check_size(self.size)?;
        check_valid(self)?;
        if self.samples_per_point() == 0 {
            return Err(IsingError::InsufficientSamples {
                n_steps: self.n_steps,
            });
        }
        Ok(())
    }
}

fn validate_field_sweep(cfg: &FieldSweepConfig) -> std::result::Result<(), ValidationError> {
    if !(cfg.temperature > 0.0 && cfg.temperature.is_finite()) {
        return Err(ValidationError::new("temperature must be positive and finite"));
    }
    Ok(())
}

/// Parameters of a single-repetition field sweep at fixed temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_field_sweep"))]
pub struct FieldSweepConfig {
    pub size: usize,
    pub temperature: f64,
    #[validate]
    pub fields: ParamRange,
    /// Production sweeps are indexed `0..n_steps`.
    #[serde(default = "default_field_n_steps")]
    pub n_steps: usize,
    #[serde(default = "default_field_n_equil")]
    pub n_equil: usize,
    /// Seed shared by the lattice of every field value.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub sequential: bool,
}

fn default_field_n_steps() -> usize {
    1001
}

fn default_field_n_equil() -> usize {
    100
}

impl Default for FieldSweepConfig {
    fn default() -> Self {
        Self {
            size: 50,
            temperature: 1.5,
            fields: ParamRange::new(-2.0, 0.0, 50),
            n_steps: default_field_n_steps(),
            n_equil: default_field_n_equil(),
            seed: 0,
            sequential: false,
        }
    }
}

impl FieldSweepConfig {
    /// Measurements per point: multiples of [`SAMPLE_INTERVAL`] in `0..n_steps`.
    pub fn samples_per_point(&self) -> usize {
        self.n_steps.div_ceil(SAMPLE_INTERVAL)
    }

    pub fn check(&self) -> Result<()> {
        check_size(self.size)?;
        check_valid(self)?;
        if self.samples_per_point() == 0 {
            return Err(IsingError::InsufficientSamples {
                n_steps: self.n_steps,
            });
        }
        Ok(())
    }
}

fn validate_coarse_grain(cfg: &CoarseGrainConfig) -> std::result::Result<(), ValidationError> {
    if cfg.block_size < 1 {
        return Err(ValidationError::new("block_size must be >= 1"));
    }
    if !(cfg.temperature > 0.0 && cfg.temperature.is_finite()) {
        return Err(ValidationError::new("temperature must be positive and finite"));
    }
    Ok(())
}

/// Parameters of one equilibrate-then-coarse-grain run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_coarse_grain"))]
pub struct CoarseGrainConfig {
    pub size: usize,
    pub temperature: f64,
    /// Sweeps run before the snapshot is taken.
    pub n_steps: usize,
    pub n_iterations: usize,
    pub block_size: usize,
    #[serde(default)]
    pub seed: u64,
}

impl Default for CoarseGrainConfig {
    fn default() -> Self {
        Self {
            size: 729,
            temperature: T_CRIT,
            n_steps: 1000,
            n_iterations: 4,
            block_size: 3,
            seed: 0,
        }
    }
}

impl CoarseGrainConfig {
    pub fn check(&self) -> Result<()> {
        check_size(self.size)?;
        check_valid(self)
    }
}

/// Everything the `ising-data` driver runs, persisted as `run_config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRunConfig {
    pub temperature_sweep: TemperatureSweepConfig,
    pub field_sweep: FieldSweepConfig,
    /// Outer seeds for the stacked magnetization matrix.
    pub n_seeds: usize,
    /// Temperatures at which a snapshot is coarse-grained.
    pub coarse_temperatures: Vec<f64>,
    pub coarse_graining: CoarseGrainConfig,
    pub out_dir: PathBuf,
}

impl Default for DataRunConfig {
    fn default() -> Self {
        Self {
            temperature_sweep: TemperatureSweepConfig {
                temperature_decimals: Some(2),
                ..Default::default()
            },
            field_sweep: FieldSweepConfig::default(),
            n_seeds: 5,
            coarse_temperatures: vec![T_CRIT - 0.3, T_CRIT, T_CRIT + 0.3],
            coarse_graining: CoarseGrainConfig::default(),
            out_dir: PathBuf::from("data"),
        }
    }
}

impl DataRunConfig {
    pub fn check(&self) -> Result<()> {
        self.temperature_sweep.check()?;
        self.field_sweep.check()?;
        for &temperature in &self.coarse_temperatures {
            CoarseGrainConfig {
                temperature,
                ..self.coarse_graining.clone()
            }
            .check()?;
        }
        Ok(())
    }
}

fn check_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(IsingError::InvalidDimension { size });
    }
    Ok(())
}

fn check_valid<T: Validate>(cfg: &T) -> Result<()> {
    cfg.validate()
        .map_err(|e| IsingError::InvalidConfig(format!("{e}")))
}
