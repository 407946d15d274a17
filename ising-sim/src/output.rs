//! Plain-text persistence of sweep results.
//!
//! Values are written with six fractional digits: series one value per line,
//! matrices one whitespace-separated row per line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{IsingError, Result};
use crate::spins::SpinGrid;
use crate::statistics::{FieldSweepResult, TemperatureSweepResult};

pub const MAGNETIZATION_FILE: &str = "M0.txt";
pub const ENERGY_FILE: &str = "E0.txt";
pub const SUSCEPTIBILITY_FILE: &str = "X0.txt";
pub const HEAT_CAPACITY_FILE: &str = "C0.txt";
pub const FIELD_MAGNETIZATION_FILE: &str = "M0_1.txt";
pub const SEED_MAGNETIZATION_FILE: &str = "M0_seeds.txt";
pub const RUN_CONFIG_FILE: &str = "run_config.json";

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> IsingError + '_ {
    move |source| IsingError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> Result<()> {
    let file = File::create(path).map_err(io_err(path))?;
    let mut w = BufWriter::new(file);
    for line in lines {
        writeln!(w, "{line}").map_err(io_err(path))?;
    }
    w.flush().map_err(io_err(path))
}

/// Create `dir` (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(io_err(dir))
}

/// One value per line.
pub fn write_series(path: &Path, values: &[f64]) -> Result<()> {
    write_lines(path, values.iter().map(|v| format!("{v:.6}")))
}

/// One row per line, values separated by a single space.
pub fn write_matrix(path: &Path, rows: &[Vec<f64>]) -> Result<()> {
    write_lines(
        path,
        rows.iter().map(|row| {
            row.iter()
                .map(|v| format!("{v:.6}"))
                .collect::<Vec<_>>()
                .join(" ")
        }),
    )
}

/// Spin grid as rows of space-separated integers.
pub fn write_grid(path: &Path, grid: &SpinGrid) -> Result<()> {
    write_lines(
        path,
        grid.rows_iter().map(|row| {
            row.iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        }),
    )
}

/// Pretty-printed JSON of any serializable configuration.
pub fn write_run_config(path: &Path, config: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| IsingError::InvalidConfig(format!("cannot serialize run config: {e}")))?;
    fs::write(path, json + "\n").map_err(io_err(path))
}

/// Write `M0.txt`, `E0.txt`, `X0.txt`, `C0.txt` into `dir`.
pub fn write_temperature_sweep(dir: &Path, result: &TemperatureSweepResult) -> Result<Vec<PathBuf>> {
    let matrices = [
        (MAGNETIZATION_FILE, &result.magnetization),
        (ENERGY_FILE, &result.energy),
    ];
    let series = [
        (SUSCEPTIBILITY_FILE, &result.susceptibility),
        (HEAT_CAPACITY_FILE, &result.heat_capacity),
    ];

    let mut written = Vec::with_capacity(4);
    for (name, rows) in matrices {
        let path = dir.join(name);
        write_matrix(&path, rows)?;
        written.push(path);
    }
    for (name, values) in series {
        let path = dir.join(name);
        write_series(&path, values)?;
        written.push(path);
    }
    info!(dir = %dir.display(), "wrote temperature sweep data");
    Ok(written)
}

/// Write `M0_1.txt` into `dir`.
pub fn write_field_sweep(dir: &Path, result: &FieldSweepResult) -> Result<PathBuf> {
    let path = dir.join(FIELD_MAGNETIZATION_FILE);
    write_series(&path, &result.magnetization)?;
    info!(path = %path.display(), "wrote field sweep data");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemperatureSweepConfig;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ising-sim-{name}-{}", std::process::id()));
        ensure_dir(&dir).unwrap();
        dir
    }

    #[test]
    fn test_series_format() {
        let dir = scratch_dir("series");
        let path = dir.join("s.txt");
        write_series(&path, &[0.5, -1.0, 1.0 / 3.0]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "0.500000\n-1.000000\n0.333333\n");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_matrix_and_grid_format() {
        let dir = scratch_dir("matrix");
        let path = dir.join("m.txt");
        write_matrix(&path, &[vec![1.0, 2.5], vec![-0.25, 0.0]]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1.000000 2.500000\n-0.250000 0.000000\n"
        );

        let grid_path = dir.join("g.txt");
        let grid = SpinGrid::from_vec(2, 2, vec![1, -1, -1, 1]).unwrap();
        write_grid(&grid_path, &grid).unwrap();
        assert_eq!(fs::read_to_string(&grid_path).unwrap(), "1 -1\n-1 1\n");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_temperature_sweep_files() {
        let dir = scratch_dir("sweep");
        let result = TemperatureSweepResult::from_rows(
            TemperatureSweepConfig::default(),
            vec![1.0, 2.0],
            vec![vec![1.0, 0.5], vec![0.5, 0.5]],
            vec![vec![-2.0, -1.0], vec![-1.0, -1.0]],
        );
        let written = write_temperature_sweep(&dir, &result).unwrap();
        assert_eq!(written.len(), 4);
        assert_eq!(
            fs::read_to_string(dir.join(SUSCEPTIBILITY_FILE)).unwrap(),
            "0.062500\n0.000000\n"
        );
        assert_eq!(
            fs::read_to_string(dir.join(MAGNETIZATION_FILE)).unwrap(),
            "1.000000 0.500000\n0.500000 0.500000\n"
        );
        write_run_config(&dir.join(RUN_CONFIG_FILE), &result.config).unwrap();
        let json = fs::read_to_string(dir.join(RUN_CONFIG_FILE)).unwrap();
        let back: TemperatureSweepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result.config);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let path = std::env::temp_dir()
            .join("ising-sim-does-not-exist")
            .join("nested")
            .join("x.txt");
        assert!(matches!(
            write_series(&path, &[1.0]),
            Err(IsingError::Io { .. })
        ));
    }
}
