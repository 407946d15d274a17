use indicatif::{ProgressBar, ProgressStyle};
use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyTuple;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use ising_sim::mcmc::metropolis_sweep;
use ising_sim::{
    CoarseGrainConfig, FieldSweepConfig, IsingError, Lattice, ParamRange, SpinGrid,
    TemperatureSweepConfig,
};

fn to_py_err(err: IsingError) -> PyErr {
    match err {
        IsingError::Io { .. } => PyOSError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn progress_bar(len: usize, msg: &'static str) -> PyResult<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )
        .map_err(|e| PyValueError::new_err(e.to_string()))?
        .progress_chars("=> "),
    );
    pb.set_message(msg);
    Ok(pb)
}

fn grid_from_numpy(array: &PyReadonlyArray2<i8>) -> PyResult<SpinGrid> {
    let view = array.as_array();
    let (rows, cols) = view.dim();
    SpinGrid::from_vec(rows, cols, view.iter().copied().collect())
        .ok_or_else(|| PyValueError::new_err("state must be a 2D array"))
}

fn grid_to_numpy<'py>(py: Python<'py>, grid: SpinGrid) -> PyResult<Bound<'py, PyArray2<i8>>> {
    let shape = grid.shape();
    let array = Array2::from_shape_vec(shape, grid.into_vec())
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(array.into_pyarray(py))
}

fn matrix_to_numpy<'py>(py: Python<'py>, rows: Vec<Vec<f64>>) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let array = Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(array.into_pyarray(py))
}

/// Square Ising lattice with its own random stream.
#[pyclass]
struct Ising2D {
    lattice: Lattice,
    rng: Xoshiro256StarStar,
}

#[pymethods]
impl Ising2D {
    /// Create an N x N lattice.
    ///
    /// Arguments:
    ///   N: side length
    ///   T: temperature in units of J/k
    ///   init_state: optional (N, N) int8 array of +-1, copied
    ///   h: external field (default 0)
    ///   seed: random seed (default 0)
    #[new]
    #[pyo3(signature = (N, T, init_state=None, h=0.0, seed=None))]
    #[allow(non_snake_case)]
    fn new(
        N: usize,
        T: f64,
        init_state: Option<PyReadonlyArray2<i8>>,
        h: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed.unwrap_or(0));
        let init = init_state.as_ref().map(grid_from_numpy).transpose()?;
        let lattice = Lattice::new(N, T, h, init.as_ref(), &mut rng).map_err(to_py_err)?;
        Ok(Self { lattice, rng })
    }

    /// Run `n_sweeps` Metropolis sweeps; returns the number of accepted flips.
    #[pyo3(signature = (n_sweeps=1))]
    fn step(&mut self, n_sweeps: usize) -> usize {
        (0..n_sweeps)
            .map(|_| metropolis_sweep(&mut self.lattice, &mut self.rng))
            .sum()
    }

    fn spin_energy(&self, i: usize, j: usize) -> PyResult<f64> {
        let n = self.lattice.size();
        if i >= n || j >= n {
            return Err(PyValueError::new_err(format!(
                "site ({i}, {j}) outside {n}x{n} lattice"
            )));
        }
        Ok(self.lattice.local_energy(i, j))
    }

    fn total_energy(&self) -> f64 {
        self.lattice.total_energy()
    }

    fn magnetization(&self) -> f64 {
        self.lattice.magnetization()
    }

    /// Copy of the current spins as an (N, N) int8 array.
    fn state<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<i8>>> {
        grid_to_numpy(py, self.lattice.snapshot())
    }

    #[getter]
    fn temperature(&self) -> f64 {
        self.lattice.temperature
    }

    #[getter]
    fn field(&self) -> f64 {
        self.lattice.field
    }
}

/// Temperature sweep with independent repetitions.
///
/// Returns (M, E, X, C): M and E of shape (n_repeats, num_points), X and C of
/// shape (num_points,).
#[pyfunction]
#[pyo3(signature = (start, stop, num_points, n_steps, n_equil, N, init_state=None, h=0.0, n_repeats=5, seed=0, decimals=None))]
#[allow(non_snake_case, clippy::too_many_arguments)]
fn sweep_over_temperature<'py>(
    py: Python<'py>,
    start: f64,
    stop: f64,
    num_points: usize,
    n_steps: usize,
    n_equil: usize,
    N: usize,
    init_state: Option<PyReadonlyArray2<i8>>,
    h: f64,
    n_repeats: usize,
    seed: u64,
    decimals: Option<u32>,
) -> PyResult<Bound<'py, PyTuple>> {
    let init = init_state.as_ref().map(grid_from_numpy).transpose()?;
    let config = TemperatureSweepConfig {
        size: N,
        temperatures: ParamRange::new(start, stop, num_points),
        n_steps,
        n_equil,
        field: h,
        n_repeats,
        base_seed: seed,
        temperature_decimals: decimals,
        sequential: false,
    };

    let pb = progress_bar(n_repeats * num_points, "temperature")?;
    let result = py
        .allow_threads(|| ising_sim::sweep_over_temperature(&config, init.as_ref(), &|| pb.inc(1)))
        .map_err(to_py_err)?;
    pb.finish();

    let m = matrix_to_numpy(py, result.magnetization)?;
    let e = matrix_to_numpy(py, result.energy)?;
    let x = Array1::from(result.susceptibility).into_pyarray(py);
    let c = Array1::from(result.heat_capacity).into_pyarray(py);
    PyTuple::new(py, [m.into_any(), e.into_any(), x.into_any(), c.into_any()])
}

/// Single-repetition field sweep at fixed temperature; returns M of shape
/// (num_points,).
#[pyfunction]
#[pyo3(signature = (start, stop, num_points, N, T, init_state=None, n_equil=100, n_steps=1001, seed=0))]
#[allow(non_snake_case, clippy::too_many_arguments)]
fn sweep_over_field<'py>(
    py: Python<'py>,
    start: f64,
    stop: f64,
    num_points: usize,
    N: usize,
    T: f64,
    init_state: Option<PyReadonlyArray2<i8>>,
    n_equil: usize,
    n_steps: usize,
    seed: u64,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let init = init_state.as_ref().map(grid_from_numpy).transpose()?;
    let config = FieldSweepConfig {
        size: N,
        temperature: T,
        fields: ParamRange::new(start, stop, num_points),
        n_steps,
        n_equil,
        seed,
        sequential: false,
    };

    let pb = progress_bar(num_points, "field")?;
    let result = py
        .allow_threads(|| ising_sim::sweep_over_field(&config, init.as_ref(), &|| pb.inc(1)))
        .map_err(to_py_err)?;
    pb.finish();

    Ok(Array1::from(result.magnetization).into_pyarray(py))
}

/// Majority-vote reduction of every block_size x block_size tile.
#[pyfunction]
fn reduce_block<'py>(
    py: Python<'py>,
    state: PyReadonlyArray2<i8>,
    block_size: usize,
) -> PyResult<Bound<'py, PyArray2<i8>>> {
    let grid = grid_from_numpy(&state)?;
    let reduced = ising_sim::reduce_block(&grid, block_size).map_err(to_py_err)?;
    grid_to_numpy(py, reduced)
}

/// Equilibrate one lattice, then coarse-grain it n_iterations times.
///
/// Returns a list of n_iterations + 1 int8 arrays, the snapshot first.
#[pyfunction]
#[pyo3(signature = (T, N, n_steps, n_iterations, block_size, seed=0))]
#[allow(non_snake_case)]
fn iterative_coarse_graining<'py>(
    py: Python<'py>,
    T: f64,
    N: usize,
    n_steps: usize,
    n_iterations: usize,
    block_size: usize,
    seed: u64,
) -> PyResult<Vec<Bound<'py, PyArray2<i8>>>> {
    let config = CoarseGrainConfig {
        size: N,
        temperature: T,
        n_steps,
        n_iterations,
        block_size,
        seed,
    };
    let states = py
        .allow_threads(|| ising_sim::iterative_coarse_graining(&config))
        .map_err(to_py_err)?;
    states
        .into_iter()
        .map(|grid| grid_to_numpy(py, grid))
        .collect()
}

/// Onsager's exact spontaneous magnetization, zero at and above T_c.
#[pyfunction]
#[allow(non_snake_case)]
fn onsager_magnetization(T: f64) -> f64 {
    ising_sim::onsager_magnetization(T)
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Ising2D>()?;
    m.add_function(wrap_pyfunction!(sweep_over_temperature, m)?)?;
    m.add_function(wrap_pyfunction!(sweep_over_field, m)?)?;
    m.add_function(wrap_pyfunction!(reduce_block, m)?)?;
    m.add_function(wrap_pyfunction!(iterative_coarse_graining, m)?)?;
    m.add_function(wrap_pyfunction!(onsager_magnetization, m)?)?;
    m.add("T_CRIT", ising_sim::T_CRIT)?;
    Ok(())
}
