//! CLI entry point for the rebalance benchmark.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use orderbatch_rebalancer::config::{Config, Overrides};
use orderbatch_rebalancer::runner::{self, StrategyKind};

#[derive(Parser)]
#[command(name = "rebalance-bench")]
#[command(about = "Sequential vs parallel rebalancing benchmark")]
#[command(version)]
struct Cli {
    /// Path to config.toml (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify both strategies agree, time them, and gate the speedup
    Bench {
        /// Number of positions in the generated portfolio
        #[arg(long)]
        size: Option<usize>,

        /// Timed runs per strategy
        #[arg(long)]
        runs: Option<usize>,

        /// Worker count for the parallel strategy
        #[arg(long)]
        workers: Option<usize>,

        /// Minimum speedup percentage required to pass
        #[arg(long)]
        min_speedup: Option<f64>,

        /// Portfolio generator seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the orders one strategy produces for the generated portfolio
    Plan {
        #[arg(long)]
        size: Option<usize>,

        #[arg(long, value_enum, default_value = "parallel")]
        strategy: StrategyKind,

        /// Maximum rows to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Check that both strategies produce the same orders
    Verify {
        #[arg(long)]
        size: Option<usize>,

        #[arg(long)]
        workers: Option<usize>,
    },
}

const EXIT_FAIL: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let overrides = match &cli.command {
        Command::Bench {
            size,
            runs,
            workers,
            min_speedup,
            seed,
        } => Overrides {
            size: *size,
            runs: *runs,
            workers: *workers,
            min_speedup_pct: *min_speedup,
            seed: *seed,
        },
        Command::Plan { size, .. } => Overrides {
            size: *size,
            ..Default::default()
        },
        Command::Verify { size, workers } => Overrides {
            size: *size,
            workers: *workers,
            ..Default::default()
        },
    };

    let config = match Config::load_or_default(cli.config.as_deref())
        .and_then(|c| c.with_overrides(&overrides))
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(EXIT_ERROR);
        }
    };

    let result = match cli.command {
        Command::Bench { .. } => runner::run_benchmark(&config).map(|c| c.passed()),
        Command::Plan {
            strategy, limit, ..
        } => runner::run_plan(&config, strategy, limit).map(|o| o.is_complete()),
        Command::Verify { .. } => runner::run_verify(&config).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_FAIL),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(EXIT_ERROR);
        }
    }
}
