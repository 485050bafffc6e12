//! sweep: run one simulation per value of a single configuration parameter.
//!
//! Merges the `--base` files and the `--scenario` file, then for every value
//! in the `--sweep` spec sets `param_path` to that value, runs the full
//! demand → routing → timeline → KPI pipeline, and writes the run artifacts
//! to `<run-root>/<exp-tag>/<variant>/`.  A `leaderboard.csv` with one row per
//! variant is written to `<run-root>/<exp-tag>/` at the end.
//!
//! ```text
//! cargo run -p sweep --release -- \
//!     --base configs/base.json \
//!     --scenario configs/scenarios/seoul_small.json \
//!     --sweep configs/sweeps/time_mult.json
//! ```

mod sweep;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use sweep::{SweepPlan, run_sweep};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Base configuration files, merged in order.
    #[arg(long = "base", default_value = "configs/base.json")]
    bases: Vec<PathBuf>,

    /// Scenario file merged over the bases.
    #[arg(long, default_value = "configs/scenarios/seoul_small.json")]
    scenario: PathBuf,

    /// Sweep spec: `exp_name`, `param_path`, `values`.
    #[arg(long, default_value = "configs/sweeps/time_mult.json")]
    sweep: PathBuf,

    /// Experiment directory name (default: `<exp_name>_<YYYYmmdd_HHMMSS>`).
    #[arg(long)]
    exp_tag: Option<String>,

    /// Root directory for experiments (default: `paths.run_root` or `runs`).
    #[arg(long)]
    run_root: Option<PathBuf>,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let plan = SweepPlan::load(&cli.bases, &cli.scenario, &cli.sweep)?;
    let exp_dir = plan.exp_dir(cli.run_root, cli.exp_tag);

    let t0 = Instant::now();
    let leaderboard = run_sweep(&plan, &exp_dir)?;
    info!(
        variants = plan.spec.values.len(),
        elapsed_s = t0.elapsed().as_secs_f64(),
        path = %leaderboard.display(),
        "sweep complete"
    );
    Ok(())
}
