use rand::Rng;

use crate::lattice::Lattice;

/// Boltzmann constant in simulation units.
pub const K_B: f64 = 1.0;

/// One Metropolis sweep: `n_sites` single-spin-flip trials.
///
/// Every trial draws its site uniformly with replacement, so within one sweep
/// some sites are proposed several times and others not at all. A trial that
/// lowers the energy is always accepted; otherwise it is accepted with
/// probability `exp(-delta_e / (K_B * T))`. The uniform draw is only made for
/// trials that do not lower the energy. `delta_e` is the physical cost of
/// reversing the spin, [`Lattice::flip_energy`], i.e. `-2 * local_energy`.
///
/// Returns the number of accepted flips.
pub fn metropolis_sweep<R: Rng>(lattice: &mut Lattice, rng: &mut R) -> usize {
    let n = lattice.size();
    let beta = 1.0 / (K_B * lattice.temperature);
    let mut accepted = 0;
    for _ in 0..lattice.n_sites() {
        let i = rng.gen_range(0..n);
        let j = rng.gen_range(0..n);
        let delta_e = lattice.flip_energy(i, j);
        if delta_e < 0.0 || rng.gen::<f64>() < (-delta_e * beta).exp() {
            lattice.flip(i, j);
            accepted += 1;
        }
    }
    accepted
}

/// Run `n_sweeps` sweeps and discard everything but the final state.
pub fn equilibrate<R: Rng>(lattice: &mut Lattice, rng: &mut R, n_sweeps: usize) {
    for _ in 0..n_sweeps {
        metropolis_sweep(lattice, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spins::SpinGrid;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_sweep_keeps_spins_valid() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let mut lat = Lattice::random(12, 2.3, 0.1, &mut rng).unwrap();
        for _ in 0..50 {
            metropolis_sweep(&mut lat, &mut rng);
            assert_eq!(lat.state().shape(), (12, 12));
            assert!(lat.state().as_slice().iter().all(|&s| s == 1 || s == -1));
        }
    }

    #[test]
    fn test_cold_aligned_lattice_stays_ordered() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let mut lat = Lattice::from_state(16, 0.5, 0.0, &SpinGrid::filled(16, 16, 1)).unwrap();
        equilibrate(&mut lat, &mut rng, 200);
        // A flip costs 8J; exp(-16) per trial leaves the ground state untouched.
        assert!(lat.magnetization() > 0.99, "m = {}", lat.magnetization());
        assert!(lat.total_energy() < -500.0);
    }

    #[test]
    fn test_cold_lattice_orders_from_random_start() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let mut lat = Lattice::random(8, 1.0, 0.0, &mut rng).unwrap();
        let e0 = lat.total_energy();
        equilibrate(&mut lat, &mut rng, 500);
        assert!(lat.total_energy() < e0);
        assert!(lat.total_energy() <= -64.0, "E = {}", lat.total_energy());
    }

    #[test]
    fn test_strong_field_aligns_spins() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(2);
        let mut lat = Lattice::random(10, 1.5, -5.0, &mut rng).unwrap();
        equilibrate(&mut lat, &mut rng, 100);
        assert!(lat.magnetization() < -0.95, "m = {}", lat.magnetization());
    }

    #[test]
    fn test_hot_lattice_accepts_most_flips() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        let mut lat = Lattice::random(10, 1.0e6, 0.0, &mut rng).unwrap();
        let accepted = metropolis_sweep(&mut lat, &mut rng);
        assert!(accepted > 95, "accepted = {accepted}");
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let run = || {
            let mut rng = Xoshiro256StarStar::seed_from_u64(42);
            let mut lat = Lattice::random(10, 2.0, 0.0, &mut rng).unwrap();
            equilibrate(&mut lat, &mut rng, 20);
            lat.snapshot()
        };
        assert_eq!(run(), run());
    }
}
