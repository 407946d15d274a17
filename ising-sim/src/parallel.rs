use rayon::prelude::*;

use crate::error::Result;

/// Evaluate `body(row, col)` for every cell of an `n_rows x n_cols` grid of
/// independent simulations, optionally in parallel.
///
/// Each cell is computed exactly once and lands in its own `(row, col)` slot
/// of the returned row-major matrix, so no two tasks share output. The first
/// error (in cell order) aborts the whole grid.
///
/// When `sequential` is true the cells run on the current thread, which is
/// useful when an outer layer already saturates the cores.
pub fn par_over_points<T: Send>(
    n_rows: usize,
    n_cols: usize,
    sequential: bool,
    body: impl Fn(usize, usize) -> Result<T> + Send + Sync,
) -> Result<Vec<Vec<T>>> {
    let cells: Vec<(usize, usize)> = (0..n_rows)
        .flat_map(|r| (0..n_cols).map(move |c| (r, c)))
        .collect();

    let work = |&(r, c): &(usize, usize)| body(r, c);

    let flat: Vec<T> = if sequential {
        cells.iter().map(work).collect::<Result<_>>()?
    } else {
        cells.par_iter().map(work).collect::<Result<_>>()?
    };

    let mut values = flat.into_iter();
    Ok((0..n_rows)
        .map(|_| values.by_ref().take(n_cols).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IsingError;

    #[test]
    fn test_cells_land_in_their_slots() {
        for sequential in [true, false] {
            let grid = par_over_points(3, 4, sequential, |r, c| Ok(10 * r + c)).unwrap();
            assert_eq!(grid.len(), 3);
            assert_eq!(grid[0], vec![0, 1, 2, 3]);
            assert_eq!(grid[2], vec![20, 21, 22, 23]);
        }
    }

    #[test]
    fn test_error_aborts() {
        let res = par_over_points(2, 2, false, |r, c| {
            if r == 1 && c == 0 {
                Err(IsingError::InsufficientSamples { n_steps: 0 })
            } else {
                Ok(())
            }
        });
        assert!(matches!(res, Err(IsingError::InsufficientSamples { .. })));
    }
}
