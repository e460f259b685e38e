//! Runner workflow: generate → verify → benchmark → gate.
//!
//! This is the main workflow that ties together all components.

use std::time::Duration;

use log::{info, warn};
use orderbatch::{
    Comparison, GeneratedPortfolio, OrderBatch, ParallelRebalancer, PortfolioGenerator,
    RebalanceOutcome, RebalanceRequest, Rebalancer, SequentialRebalancer, benchmark,
};

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::{Error, Result};

/// Which strategy to use for a single-shot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyKind {
    Sequential,
    Parallel,
}

/// Generate the synthetic portfolio described by the config.
pub fn generate(config: &Config) -> Result<GeneratedPortfolio> {
    let generator = PortfolioGenerator::with_value_range(
        config.portfolio.size,
        config.portfolio.seed,
        config.portfolio.min_value,
        config.portfolio.max_value,
    )?;
    Ok(generator.generate())
}

/// Baseline and optimized strategies with the configured simulated delays.
pub fn build_strategies(config: &Config) -> Result<(SequentialRebalancer, ParallelRebalancer)> {
    let baseline = SequentialRebalancer::new(&config.strategy)?
        .with_order_delay(Duration::from_micros(config.benchmark.baseline_order_delay_us));
    let optimized = ParallelRebalancer::new(&config.strategy)?
        .with_order_delay(Duration::from_micros(config.benchmark.optimized_order_delay_us));
    Ok((baseline, optimized))
}

/// Check that both outcomes failed on the same entries and carry the same
/// order economics.
pub fn check_equivalence(sequential: &RebalanceOutcome, parallel: &RebalanceOutcome) -> Result<()> {
    let seq_failed = failed_symbols(sequential);
    let par_failed = failed_symbols(parallel);
    if seq_failed != par_failed {
        return Err(Error::Mismatch(format!(
            "sequential failed [{}], parallel failed [{}]",
            seq_failed.join(", "),
            par_failed.join(", ")
        )));
    }
    if sequential.orders.same_economics(&parallel.orders) {
        return Ok(());
    }

    let seq = sequential.orders.economics();
    let par = parallel.orders.economics();
    let first = seq
        .iter()
        .zip(&par)
        .find(|(a, b)| a != b)
        .map(|(a, _)| a.symbol.as_str())
        .or_else(|| seq.get(par.len()).or_else(|| par.get(seq.len())).map(|k| k.symbol.as_str()))
        .unwrap_or("?");

    Err(Error::Mismatch(format!(
        "sequential produced {} orders, parallel {}; first difference at {first}",
        seq.len(),
        par.len()
    )))
}

/// Run both strategies once, without simulated delays, and compare them.
fn verify_request(config: &Config, request: &RebalanceRequest) -> Result<(usize, usize)> {
    let sequential = SequentialRebalancer::new(&config.strategy)?.rebalance(request)?;
    let parallel = ParallelRebalancer::new(&config.strategy)?.rebalance(request)?;
    check_equivalence(&sequential, &parallel)?;
    Ok((sequential.orders.len(), parallel.orders.len()))
}

/// Full benchmark: generate, verify equivalence, time both strategies,
/// and judge the speedup. The returned comparison carries the verdict.
pub fn run_benchmark(config: &Config) -> Result<Comparison> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_run_started(&mut audit, "bench", config)?;

    println!(
        "Portfolio: {} positions, {} runs, {} workers",
        config.portfolio.size, config.benchmark.runs, config.strategy.workers
    );

    let portfolio = generate(config)?;
    audit::log_portfolio(&mut audit, &portfolio)?;
    println!("Total portfolio value: ${:.2}", portfolio.total_value);
    let request = portfolio.into_request()?;

    match verify_request(config, &request) {
        Ok((seq, par)) => audit::log_equivalence(&mut audit, seq, par, true)?,
        Err(e) => {
            audit.log(
                "equivalence_checked",
                serde_json::json!({ "matched": false, "error": e.to_string() }),
            )?;
            return Err(e);
        }
    }
    info!("sequential and parallel order sets match");

    let (baseline, optimized) = build_strategies(config)?;

    info!("benchmarking {} strategy...", baseline.name());
    let base = benchmark(&baseline, &request, config.benchmark.runs)?;
    audit::log_benchmark(&mut audit, &base)?;

    info!("benchmarking {} strategy...", optimized.name());
    let opt = benchmark(&optimized, &request, config.benchmark.runs)?;
    audit::log_benchmark(&mut audit, &opt)?;

    if base.degenerate {
        warn!("no entries exceeded the threshold; timings measure filtering only");
        audit.log_simple("degenerate_benchmark")?;
    }

    let comparison = Comparison::new(base, opt, config.benchmark.min_speedup_pct);
    audit::log_comparison(&mut audit, &comparison)?;
    audit::log_run_completed(&mut audit, comparison.passed())?;

    print!("\n{comparison}");
    println!("Audit logged to {}", config.audit_path().display());

    Ok(comparison)
}

/// Run both strategies once and report whether they agree.
pub fn run_verify(config: &Config) -> Result<()> {
    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_run_started(&mut audit, "verify", config)?;

    let request = generate(config)?.into_request()?;
    let result = verify_request(config, &request);
    match &result {
        Ok((seq, par)) => {
            audit::log_equivalence(&mut audit, *seq, *par, true)?;
            println!("OK: both strategies produced the same {seq} orders");
        }
        Err(e) => {
            audit.log(
                "equivalence_checked",
                serde_json::json!({ "matched": false, "error": e.to_string() }),
            )?;
        }
    }
    result.map(|_| ())
}

/// Compute and print the order batch for the configured portfolio.
pub fn run_plan(config: &Config, kind: StrategyKind, limit: usize) -> Result<RebalanceOutcome> {
    let request = generate(config)?.into_request()?;
    let outcome = match kind {
        StrategyKind::Sequential => SequentialRebalancer::new(&config.strategy)?.rebalance(&request)?,
        StrategyKind::Parallel => ParallelRebalancer::new(&config.strategy)?.rebalance(&request)?,
    };

    if outcome.orders.is_empty() {
        println!("No rebalancing needed: every delta is within the threshold.");
    } else {
        display_plan(&outcome.orders, limit);
    }
    for failure in &outcome.failures {
        println!("  FAILED {}: {}", failure.symbol, failure.reason);
    }

    Ok(outcome)
}

// === Helpers ===

fn failed_symbols(outcome: &RebalanceOutcome) -> Vec<&str> {
    let mut symbols: Vec<&str> = outcome.failures.iter().map(|f| f.symbol.as_str()).collect();
    symbols.sort_unstable();
    symbols
}

fn display_plan(orders: &OrderBatch, limit: usize) {
    println!("\nREBALANCE ORDERS:");
    println!(
        "  {:>4}  {:10} {:4} {:>12} {:>12} {:>12} {:>10}",
        "#", "Symbol", "Side", "Quantity", "Current", "Target", "Risk"
    );

    for (i, order) in orders.iter().take(limit).enumerate() {
        println!(
            "  {:>4}  {:10} {:4} {:>12.4} ${:>11.2} ${:>11.2} {:>10.5}",
            i + 1,
            order.symbol,
            order.side,
            order.quantity,
            order.current_value,
            order.target_value,
            order.risk_score,
        );
    }
    if orders.len() > limit {
        println!("  ... {} more", orders.len() - limit);
    }

    println!(
        "\n{} orders, ${:.2} gross value moved",
        orders.len(),
        orders.gross_value()
    );
}
