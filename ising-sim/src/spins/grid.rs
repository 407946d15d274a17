use serde::{Deserialize, Serialize};

/// Row-major 2D array of spins.
///
/// Used both as the live state of a [`Lattice`](crate::Lattice) and as the
/// snapshot type handed to coarse-graining. Values are ±1 whenever the grid
/// was produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinGrid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<i8>,
}

impl SpinGrid {
    /// Grid of `rows * cols` copies of `value`.
    pub fn filled(rows: usize, cols: usize, value: i8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Grid whose cell `(i, j)` is `f(i, j)`, filled in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> i8) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                cells.push(f(i, j));
            }
        }
        Self { rows, cols, cells }
    }

    /// Wrap a row-major buffer. Returns `None` when the length does not match.
    pub fn from_vec(rows: usize, cols: usize, cells: Vec<i8>) -> Option<Self> {
        (cells.len() == rows * cols).then_some(Self { rows, cols, cells })
    }

    /// Build from nested rows, e.g. `SpinGrid::from_rows(&[[1, -1], [-1, 1]])`.
    pub fn from_rows<R: AsRef<[i8]>>(rows: &[R]) -> Option<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for r in rows {
            let r = r.as_ref();
            if r.len() != n_cols {
                return None;
            }
            cells.extend_from_slice(r);
        }
        Some(Self {
            rows: n_rows,
            cols: n_cols,
            cells,
        })
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i8 {
        self.cells[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: i8) {
        self.cells[i * self.cols + j] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[i8] {
        &self.cells
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i8] {
        &mut self.cells
    }

    pub fn into_vec(self) -> Vec<i8> {
        self.cells
    }

    /// Mean cell value, i.e. magnetization per spin.
    pub fn mean(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let sum: i64 = self.cells.iter().map(|&s| s as i64).sum();
        sum as f64 / self.cells.len() as f64
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[i8]> {
        self.cells.chunks(self.cols.max(1))
    }
}
