use std::ops::Range;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;

use crate::config::SAMPLE_INTERVAL;
use crate::error::{IsingError, Result};
use crate::lattice::Lattice;
use crate::mcmc::{equilibrate, metropolis_sweep};
use crate::spins::SpinGrid;
use crate::statistics::Statistics;

/// Sample averages of one simulation at one parameter point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSample {
    /// Mean over samples of the mean spin.
    pub magnetization: f64,
    /// Mean over samples of the total energy, divided by the number of sites.
    pub energy: f64,
    pub n_samples: usize,
}

/// Thermodynamic parameters and schedule of one independent simulation.
#[derive(Debug, Clone)]
pub struct PointSpec<'a> {
    pub size: usize,
    pub temperature: f64,
    pub field: f64,
    pub init_state: Option<&'a SpinGrid>,
    pub n_equil: usize,
    /// Indices of the production sweeps; a sample is taken after every sweep
    /// whose index is a multiple of [`SAMPLE_INTERVAL`].
    pub production: Range<usize>,
    pub seed: u64,
}

/// Build a fresh lattice, equilibrate it, then run and sample the production
/// sweeps.
///
/// The lattice and its generator live only for this call, so any two points
/// can run concurrently and a point's result depends only on its spec.
pub fn sample_point(spec: &PointSpec<'_>) -> Result<PointSample> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(spec.seed);
    let mut lattice = Lattice::new(
        spec.size,
        spec.temperature,
        spec.field,
        spec.init_state,
        &mut rng,
    )?;

    equilibrate(&mut lattice, &mut rng, spec.n_equil);

    // Channels: magnetization, total energy.
    let mut stats = Statistics::new(2);
    for sweep_id in spec.production.clone() {
        metropolis_sweep(&mut lattice, &mut rng);
        if sweep_id % SAMPLE_INTERVAL == 0 {
            stats.update(&[lattice.magnetization(), lattice.total_energy()]);
        }
    }

    let avg = stats.average().ok_or(IsingError::InsufficientSamples {
        n_steps: spec.production.end,
    })?;

    debug!(
        temperature = spec.temperature,
        field = spec.field,
        seed = spec.seed,
        n_samples = stats.count,
        magnetization = avg[0],
        "point sampled"
    );

    Ok(PointSample {
        magnetization: avg[0],
        energy: avg[1] / lattice.n_sites() as f64,
        n_samples: stats.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(production: Range<usize>) -> PointSpec<'static> {
        PointSpec {
            size: 6,
            temperature: 2.0,
            field: 0.0,
            init_state: None,
            n_equil: 5,
            production,
            seed: 1,
        }
    }

    #[test]
    fn test_sample_count_follows_schedule() {
        assert_eq!(sample_point(&spec(1..201)).unwrap().n_samples, 2);
        assert_eq!(sample_point(&spec(0..201)).unwrap().n_samples, 3);
        assert_eq!(sample_point(&spec(1..1001)).unwrap().n_samples, 10);
    }

    #[test]
    fn test_no_samples_is_an_error() {
        assert!(matches!(
            sample_point(&spec(1..100)),
            Err(IsingError::InsufficientSamples { n_steps: 100 })
        ));
    }

    #[test]
    fn test_frozen_aligned_point() {
        let init = SpinGrid::filled(8, 8, 1);
        let s = sample_point(&PointSpec {
            size: 8,
            temperature: 0.4,
            field: 0.0,
            init_state: Some(&init),
            n_equil: 10,
            production: 1..301,
            seed: 3,
        })
        .unwrap();
        assert_eq!(s.n_samples, 3);
        assert!(s.magnetization > 0.99);
        // Ground state energy per site is -2J.
        assert!((s.energy + 2.0).abs() < 0.05, "e = {}", s.energy);
    }

    #[test]
    fn test_same_spec_same_sample() {
        let a = sample_point(&spec(1..301)).unwrap();
        let b = sample_point(&spec(1..301)).unwrap();
        assert_eq!(a, b);
    }
}
