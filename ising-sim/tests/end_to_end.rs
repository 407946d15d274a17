use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use ising_sim::mcmc::equilibrate;
use ising_sim::{
    iterative_coarse_graining, onsager_magnetization, reduce_block, sweep_over_field,
    sweep_over_temperature, CoarseGrainConfig, FieldSweepConfig, IsingError, Lattice, ParamRange,
    SpinGrid, TemperatureSweepConfig,
};

#[test]
fn test_create_yields_valid_spins() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(11);
    for n in [1, 2, 7, 16] {
        let lattice = Lattice::new(n, 2.0, 0.0, None, &mut rng).unwrap();
        assert_eq!(lattice.state().shape(), (n, n));
        assert!(lattice.state().as_slice().iter().all(|&s| s == 1 || s == -1));
    }
    assert!(matches!(
        Lattice::new(0, 2.0, 0.0, None, &mut rng),
        Err(IsingError::InvalidDimension { size: 0 })
    ));
}

#[test]
fn test_single_point_scenario() {
    let cfg = TemperatureSweepConfig {
        size: 10,
        temperatures: ParamRange::new(1.0, 1.0, 1),
        n_steps: 201,
        n_equil: 50,
        n_repeats: 1,
        ..Default::default()
    };
    let res = sweep_over_temperature(&cfg, None, &|| {}).unwrap();
    assert_eq!(res.n_repeats(), 1);
    assert_eq!(res.n_points(), 1);
    assert_eq!(res.susceptibility, vec![0.0]);
    assert_eq!(res.heat_capacity, vec![0.0]);
}

#[test]
fn test_sweep_is_reproducible() {
    let cfg = TemperatureSweepConfig {
        size: 8,
        temperatures: ParamRange::new(1.5, 3.0, 4),
        n_steps: 301,
        n_equil: 20,
        n_repeats: 2,
        base_seed: 9,
        ..Default::default()
    };
    let a = sweep_over_temperature(&cfg, None, &|| {}).unwrap();
    let b = sweep_over_temperature(&cfg, None, &|| {}).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_ordered_start_stays_ordered_when_cold() {
    let init = SpinGrid::filled(12, 12, 1);
    let cfg = TemperatureSweepConfig {
        size: 12,
        temperatures: ParamRange::new(0.5, 1.0, 2),
        n_steps: 301,
        n_equil: 20,
        n_repeats: 2,
        ..Default::default()
    };
    let res = sweep_over_temperature(&cfg, Some(&init), &|| {}).unwrap();
    for row in &res.magnetization {
        for &m in row {
            assert!(m > 0.95, "m = {m}");
        }
    }
    for row in &res.energy {
        assert!(row[0] < -1.9, "e = {}", row[0]);
    }
}

#[test]
fn test_too_few_steps() {
    let cfg = TemperatureSweepConfig {
        size: 4,
        n_steps: 50,
        ..Default::default()
    };
    assert!(matches!(
        sweep_over_temperature(&cfg, None, &|| {}),
        Err(IsingError::InsufficientSamples { n_steps: 50 })
    ));
    let cfg = FieldSweepConfig {
        size: 4,
        n_steps: 0,
        ..Default::default()
    };
    assert!(matches!(
        sweep_over_field(&cfg, None, &|| {}),
        Err(IsingError::InsufficientSamples { n_steps: 0 })
    ));
}

#[test]
fn test_coarse_graining_chain() {
    let cfg = CoarseGrainConfig {
        size: 9,
        temperature: 1.0,
        n_steps: 50,
        n_iterations: 2,
        block_size: 3,
        seed: 1,
    };
    let states = iterative_coarse_graining(&cfg).unwrap();
    let shapes: Vec<_> = states.iter().map(SpinGrid::shape).collect();
    assert_eq!(shapes, vec![(9, 9), (3, 3), (1, 1)]);
    assert_eq!(states[1], reduce_block(&states[0], 3).unwrap());
}

#[test]
fn test_cold_lattice_matches_onsager() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(3);
    let init = SpinGrid::filled(16, 16, 1);
    let mut lattice = Lattice::new(16, 1.5, 0.0, Some(&init), &mut rng).unwrap();
    equilibrate(&mut lattice, &mut rng, 200);
    let exact = onsager_magnetization(1.5);
    assert!((lattice.magnetization().abs() - exact).abs() < 0.05);
    assert_eq!(onsager_magnetization(3.0), 0.0);
}
