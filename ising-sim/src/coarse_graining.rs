//! Majority-vote block reduction of spin snapshots.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;

use crate::config::CoarseGrainConfig;
use crate::error::{IsingError, Result};
use crate::lattice::Lattice;
use crate::mcmc::equilibrate;
use crate::spins::SpinGrid;

/// Most frequent value in `values`; ties go to the smallest value.
fn mode(values: &mut [i8]) -> i8 {
    values.sort_unstable();
    let mut best = values[0];
    let mut best_run = 0;
    let mut run = 0;
    let mut prev = values[0];
    for &v in values.iter() {
        if v == prev {
            run += 1;
        } else {
            prev = v;
            run = 1;
        }
        // Strict comparison keeps the earlier (smaller) value on ties.
        if run > best_run {
            best_run = run;
            best = v;
        }
    }
    best
}

/// Reduce `state` by replacing every `block_size x block_size` tile with the
/// mode of its cells.
///
/// Fails with [`IsingError::DimensionMismatch`] unless both dimensions are
/// divisible by `block_size`; a zero block size is rejected the same way.
pub fn reduce_block(state: &SpinGrid, block_size: usize) -> Result<SpinGrid> {
    let (rows, cols) = state.shape();
    if block_size == 0 || rows % block_size != 0 || cols % block_size != 0 {
        return Err(IsingError::DimensionMismatch {
            rows,
            cols,
            block_size,
        });
    }

    let mut tile = Vec::with_capacity(block_size * block_size);
    Ok(SpinGrid::from_fn(
        rows / block_size,
        cols / block_size,
        |bi, bj| {
            tile.clear();
            for i in bi * block_size..(bi + 1) * block_size {
                for j in bj * block_size..(bj + 1) * block_size {
                    tile.push(state.get(i, j));
                }
            }
            mode(&mut tile)
        },
    ))
}

/// Apply [`reduce_block`] `n_iterations` times, returning the original and
/// every intermediate grid in order (`n_iterations + 1` grids).
pub fn coarse_grain_chain(
    state: SpinGrid,
    n_iterations: usize,
    block_size: usize,
) -> Result<Vec<SpinGrid>> {
    let mut states = Vec::with_capacity(n_iterations + 1);
    states.push(state);
    for iteration in 1..=n_iterations {
        let prev = &states[states.len() - 1];
        let next = reduce_block(prev, block_size)?;
        debug!(
            iteration,
            before = ?prev.shape(),
            after = ?next.shape(),
            "coarse-graining step"
        );
        states.push(next);
    }
    Ok(states)
}

/// Check that `size` survives `n_iterations` reductions by `block_size`.
fn check_chain(size: usize, n_iterations: usize, block_size: usize) -> Result<()> {
    let mut side = size;
    for _ in 0..n_iterations {
        if block_size == 0 || side % block_size != 0 {
            return Err(IsingError::DimensionMismatch {
                rows: side,
                cols: side,
                block_size,
            });
        }
        side /= block_size;
    }
    Ok(())
}

/// Equilibrate one random lattice at `config.temperature`, snapshot it, and
/// coarse-grain the snapshot `config.n_iterations` times.
///
/// Divisibility of the whole chain is checked before any sweep runs.
pub fn iterative_coarse_graining(config: &CoarseGrainConfig) -> Result<Vec<SpinGrid>> {
    config.check()?;
    check_chain(config.size, config.n_iterations, config.block_size)?;

    let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
    let mut lattice = Lattice::random(config.size, config.temperature, 0.0, &mut rng)?;
    equilibrate(&mut lattice, &mut rng, config.n_steps);
    debug!(shape = ?lattice.state().shape(), "initial lattice snapshot");

    coarse_grain_chain(lattice.snapshot(), config.n_iterations, config.block_size)
}
