//! Generate the datasets behind the phase-transition figures.
//!
//! Writes `M0.txt`, `E0.txt`, `X0.txt`, `C0.txt`, `M0_1.txt`, `M0_seeds.txt`,
//! coarse-grained snapshots and `run_config.json` into the output directory.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ising_sim::output::{self, RUN_CONFIG_FILE, SEED_MAGNETIZATION_FILE};
use ising_sim::{
    iterative_coarse_graining, multi_seed_magnetization, reference_curve, sweep_over_field,
    sweep_over_temperature, CoarseGrainConfig, DataRunConfig,
};

#[derive(Parser, Debug)]
#[command(name = "ising-data")]
#[command(about = "Metropolis sweeps of the 2D Ising model", long_about = None)]
struct Args {
    /// JSON run configuration; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the configuration)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Skip the multi-seed magnetization matrix
    #[arg(long)]
    skip_seeds: bool,

    /// Skip coarse-graining snapshots
    #[arg(long)]
    skip_coarse: bool,
}

fn progress_bar(len: usize, msg: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )?
        .progress_chars("=> "),
    );
    pb.set_message(msg);
    Ok(pb)
}

fn load_config(args: &Args) -> Result<DataRunConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;
            serde_json::from_str(&text).wrap_err("Failed to parse configuration file")?
        }
        None => DataRunConfig::default(),
    };
    if let Some(dir) = &args.out_dir {
        config.out_dir = dir.clone();
    }
    config.check()?;
    Ok(config)
}

fn coarse_grain_snapshots(config: &DataRunConfig) -> Result<()> {
    for &temperature in &config.coarse_temperatures {
        let cg = CoarseGrainConfig {
            temperature,
            ..config.coarse_graining.clone()
        };
        info!(temperature, size = cg.size, "coarse-graining snapshot");
        let states = iterative_coarse_graining(&cg)?;
        for (level, state) in states.iter().enumerate() {
            let path = config
                .out_dir
                .join(format!("coarse_T{temperature:.3}_L{level}.txt"));
            output::write_grid(&path, state)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    output::ensure_dir(&config.out_dir)?;
    output::write_run_config(&config.out_dir.join(RUN_CONFIG_FILE), &config)?;

    let ts = &config.temperature_sweep;
    let pb = progress_bar(ts.n_repeats * ts.temperatures.num_points, "temperature")?;
    let result = sweep_over_temperature(ts, None, &|| pb.inc(1))?;
    pb.finish();
    output::write_temperature_sweep(&config.out_dir, &result)?;

    let reference = reference_curve(&result.temperatures);
    for (((t, m), e), exact) in result
        .temperatures
        .iter()
        .zip(result.reduced_magnetization())
        .zip(result.mean_energy())
        .zip(reference)
    {
        info!(
            temperature = t,
            reduced_magnetization = m,
            energy = e,
            onsager = exact,
            "M/M0 vs Onsager"
        );
    }

    let fs_cfg = &config.field_sweep;
    let pb = progress_bar(fs_cfg.fields.num_points, "field")?;
    let field_result = sweep_over_field(fs_cfg, None, &|| pb.inc(1))?;
    pb.finish();
    output::write_field_sweep(&config.out_dir, &field_result)?;

    if !args.skip_seeds && config.n_seeds > 0 {
        let pb = progress_bar(
            config.n_seeds * ts.n_repeats * ts.temperatures.num_points,
            "seeds",
        )?;
        let rows = multi_seed_magnetization(ts, config.n_seeds, None, &|| pb.inc(1))?;
        pb.finish();
        output::write_matrix(&config.out_dir.join(SEED_MAGNETIZATION_FILE), &rows)?;
    }

    if !args.skip_coarse {
        coarse_grain_snapshots(&config)?;
    }

    info!(dir = %config.out_dir.display(), "all data written");
    Ok(())
}
