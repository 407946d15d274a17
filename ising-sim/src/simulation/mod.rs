pub mod point;

pub use point::{sample_point, PointSample, PointSpec};

use tracing::info;

use crate::config::{FieldSweepConfig, TemperatureSweepConfig};
use crate::error::Result;
use crate::parallel::par_over_points;
use crate::spins::SpinGrid;
use crate::statistics::{FieldSweepResult, TemperatureSweepResult};

/// Sweep temperature over `config.temperatures`, repeated `config.n_repeats`
/// times.
///
/// Every (repetition, temperature) pair is an independent simulation: a fresh
/// lattice (copied from `init_state` or random), `n_equil` discarded sweeps,
/// then production sweeps `1..n_steps` sampled every 100th sweep. All lattices
/// of repetition `r` are seeded with `config.seed_for(r)`, so the output is
/// reproducible and does not depend on `config.sequential`.
///
/// `on_point` is called once per finished pair (useful for progress bars).
pub fn sweep_over_temperature(
    config: &TemperatureSweepConfig,
    init_state: Option<&SpinGrid>,
    on_point: &(dyn Fn() + Sync),
) -> Result<TemperatureSweepResult> {
    config.check()?;

    let temperatures = config.temperatures();
    info!(
        size = config.size,
        n_points = temperatures.len(),
        n_repeats = config.n_repeats,
        n_steps = config.n_steps,
        n_equil = config.n_equil,
        "temperature sweep started"
    );

    let samples = par_over_points(
        config.n_repeats,
        temperatures.len(),
        config.sequential,
        |repeat, point| {
            let sample = sample_point(&PointSpec {
                size: config.size,
                temperature: temperatures[point],
                field: config.field,
                init_state,
                n_equil: config.n_equil,
                production: 1..config.n_steps,
                seed: config.seed_for(repeat),
            });
            on_point();
            sample
        },
    )?;

    let magnetization = samples
        .iter()
        .map(|row| row.iter().map(|s| s.magnetization).collect())
        .collect();
    let energy = samples
        .iter()
        .map(|row| row.iter().map(|s| s.energy).collect())
        .collect();

    info!("temperature sweep finished");
    Ok(TemperatureSweepResult::from_rows(
        config.clone(),
        temperatures,
        magnetization,
        energy,
    ))
}

/// Sweep the external field at fixed temperature, one repetition.
///
/// Each field value gets a fresh lattice seeded with `config.seed`, `n_equil`
/// discarded sweeps, then production sweeps `0..n_steps` sampled every 100th
/// sweep (the first production sweep included).
pub fn sweep_over_field(
    config: &FieldSweepConfig,
    init_state: Option<&SpinGrid>,
    on_point: &(dyn Fn() + Sync),
) -> Result<FieldSweepResult> {
    config.check()?;

    let fields = config.fields.values();
    info!(
        size = config.size,
        temperature = config.temperature,
        n_points = fields.len(),
        "field sweep started"
    );

    let samples = par_over_points(1, fields.len(), config.sequential, |_, point| {
        let sample = sample_point(&PointSpec {
            size: config.size,
            temperature: config.temperature,
            field: fields[point],
            init_state,
            n_equil: config.n_equil,
            production: 0..config.n_steps,
            seed: config.seed,
        });
        on_point();
        sample
    })?;
    let row = samples.into_iter().next().unwrap_or_default();

    info!("field sweep finished");
    Ok(FieldSweepResult {
        fields,
        magnetization: row.iter().map(|s| s.magnetization).collect(),
        energy: row.iter().map(|s| s.energy).collect(),
        config: config.clone(),
    })
}

/// Repeat the temperature sweep for `n_seeds` outer seeds and stack every
/// magnetization row, giving an `(n_seeds * n_repeats) x n_points` matrix.
///
/// Outer seed `s` shifts the base seed by `s * n_repeats`, so no two rows share
/// a random stream.
pub fn multi_seed_magnetization(
    config: &TemperatureSweepConfig,
    n_seeds: usize,
    init_state: Option<&SpinGrid>,
    on_point: &(dyn Fn() + Sync),
) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::with_capacity(n_seeds * config.n_repeats);
    for seed in 0..n_seeds {
        let cfg = TemperatureSweepConfig {
            base_seed: config.base_seed + (seed * config.n_repeats) as u64,
            ..config.clone()
        };
        rows.extend(sweep_over_temperature(&cfg, init_state, on_point)?.magnetization);
    }
    Ok(rows)
}
