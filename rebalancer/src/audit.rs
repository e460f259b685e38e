//! JSONL audit trail logging.
//!
//! Each runner invocation appends events to the audit file, one JSON object
//! per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use orderbatch::{BenchmarkResult, Comparison, GeneratedPortfolio};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

pub fn log_run_started(audit: &mut AuditLog, command: &str, config: &Config) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "command": command,
            "size": config.portfolio.size,
            "seed": config.portfolio.seed,
            "runs": config.benchmark.runs,
            "workers": config.strategy.workers,
            "threshold": config.strategy.threshold,
            "unit_price": config.strategy.unit_price,
            "min_speedup_pct": config.benchmark.min_speedup_pct,
        }),
    )
}

pub fn log_portfolio(audit: &mut AuditLog, portfolio: &GeneratedPortfolio) -> Result<()> {
    audit.log(
        "portfolio_generated",
        serde_json::json!({
            "positions": portfolio.positions.len(),
            "targets": portfolio.target.len(),
            "total_value": portfolio.total_value,
            "weight_sum": portfolio.target.weight_sum(),
        }),
    )
}

pub fn log_equivalence(
    audit: &mut AuditLog,
    sequential_orders: usize,
    parallel_orders: usize,
    matched: bool,
) -> Result<()> {
    audit.log(
        "equivalence_checked",
        serde_json::json!({
            "sequential_orders": sequential_orders,
            "parallel_orders": parallel_orders,
            "matched": matched,
        }),
    )
}

pub fn log_benchmark(audit: &mut AuditLog, result: &BenchmarkResult) -> Result<()> {
    let runs_ms: Vec<f64> = result
        .runs
        .iter()
        .map(|d| d.as_secs_f64() * 1_000.0)
        .collect();

    audit.log(
        "strategy_benchmarked",
        serde_json::json!({
            "strategy": result.strategy,
            "runs_ms": runs_ms,
            "average_ms": result.average.as_secs_f64() * 1_000.0,
            "order_count": result.order_count,
            "failure_count": result.failure_count,
            "degenerate": result.degenerate,
        }),
    )
}

pub fn log_comparison(audit: &mut AuditLog, comparison: &Comparison) -> Result<()> {
    audit.log(
        "comparison",
        serde_json::json!({
            "baseline": comparison.baseline.strategy,
            "optimized": comparison.optimized.strategy,
            "speedup_pct": comparison.speedup_pct,
            "min_speedup_pct": comparison.min_speedup_pct,
            "verdict": comparison.verdict.to_string(),
        }),
    )
}

pub fn log_run_completed(audit: &mut AuditLog, passed: bool) -> Result<()> {
    audit.log("run_completed", serde_json::json!({ "passed": passed }))
}
