use crate::geometry::Torus;

/// Nearest-neighbour coupling constant.
pub const J: f64 = 1.0;

/// Energy contribution of the spin at `site`:
/// `-J * s * (sum of the 4 neighbours) - field * s`.
#[inline]
pub fn local_energy(torus: &Torus, spins: &[i8], field: f64, site: usize) -> f64 {
    let s = spins[site] as f64;
    let neighbor_sum: i32 = torus
        .neighbors4(site)
        .iter()
        .map(|&k| spins[k] as i32)
        .sum();
    -J * s * neighbor_sum as f64 - field * s
}

/// Energy change caused by reversing the spin at `site`.
///
/// Reversing `s` negates its local contribution, so the change has the
/// magnitude of twice [`local_energy`] and the opposite sign: negative when
/// the spin currently opposes its neighbours and the field.
#[inline]
pub fn flip_energy(torus: &Torus, spins: &[i8], field: f64, site: usize) -> f64 {
    -2.0 * local_energy(torus, spins, field, site)
}

/// Total energy of a configuration.
///
/// Sums [`local_energy`] over every site and halves the result, since each
/// bond is seen from both ends. Not incremental: O(n_sites) per call.
pub fn total_energy(torus: &Torus, spins: &[i8], field: f64) -> f64 {
    let total: f64 = (0..torus.n_sites)
        .map(|site| local_energy(torus, spins, field, site))
        .sum();
    total / 2.0
}
