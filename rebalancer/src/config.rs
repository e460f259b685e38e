//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use orderbatch::StrategyConfig;
use orderbatch::harness::DEFAULT_MIN_SPEEDUP_PCT;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_min_value")]
    pub min_value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
}

fn default_size() -> usize {
    1000
}
fn default_seed() -> u64 {
    42
}
fn default_min_value() -> f64 {
    1_000.0
}
fn default_max_value() -> f64 {
    10_000.0
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            seed: default_seed(),
            min_value: default_min_value(),
            max_value: default_max_value(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default = "default_runs")]
    pub runs: usize,
    #[serde(default = "default_min_speedup")]
    pub min_speedup_pct: f64,
    #[serde(default = "default_baseline_delay")]
    pub baseline_order_delay_us: u64,
    #[serde(default)]
    pub optimized_order_delay_us: u64,
}

fn default_runs() -> usize {
    10
}
fn default_min_speedup() -> f64 {
    DEFAULT_MIN_SPEEDUP_PCT
}
fn default_baseline_delay() -> u64 {
    100
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            min_speedup_pct: default_min_speedup(),
            baseline_order_delay_us: default_baseline_delay(),
            optimized_order_delay_us: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "bench_audit.jsonl".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub size: Option<usize>,
    pub runs: Option<usize>,
    pub workers: Option<usize>,
    pub min_speedup_pct: Option<f64>,
    pub seed: Option<u64>,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Apply CLI overrides and re-validate.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self> {
        if let Some(size) = overrides.size {
            self.portfolio.size = size;
        }
        if let Some(runs) = overrides.runs {
            self.benchmark.runs = runs;
        }
        if let Some(workers) = overrides.workers {
            self.strategy.workers = workers;
        }
        if let Some(min) = overrides.min_speedup_pct {
            self.benchmark.min_speedup_pct = min;
        }
        if let Some(seed) = overrides.seed {
            self.portfolio.seed = seed;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.portfolio.size == 0 {
            return Err(Error::Config("portfolio size must be > 0".into()));
        }
        if !self.portfolio.min_value.is_finite()
            || !self.portfolio.max_value.is_finite()
            || self.portfolio.min_value < 0.0
            || self.portfolio.min_value >= self.portfolio.max_value
        {
            return Err(Error::Config(
                "portfolio values must satisfy 0 <= min_value < max_value".into(),
            ));
        }
        if self.benchmark.runs == 0 {
            return Err(Error::Config("benchmark runs must be > 0".into()));
        }
        if !self.benchmark.min_speedup_pct.is_finite() {
            return Err(Error::Config("min_speedup_pct must be finite".into()));
        }
        self.strategy
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(())
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
