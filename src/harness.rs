//! Benchmark harness: timed runs, speedup, and the pass/fail gate.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{RebalanceError, Result};
use crate::request::RebalanceRequest;
use crate::strategy::Rebalancer;

/// Default minimum speedup (percent) for a passing comparison.
pub const DEFAULT_MIN_SPEEDUP_PCT: f64 = 25.0;

/// Timing for one strategy over repeated runs on the same request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BenchmarkResult {
    pub strategy: String,
    pub runs: Vec<Duration>,
    pub average: Duration,
    /// Orders produced by the last run
    pub order_count: usize,
    /// Failed entries in the last run
    pub failure_count: usize,
    /// Every run produced an empty batch
    pub degenerate: bool,
}

impl BenchmarkResult {
    pub fn fastest(&self) -> Duration {
        self.runs.iter().copied().min().unwrap_or_default()
    }

    pub fn slowest(&self) -> Duration {
        self.runs.iter().copied().max().unwrap_or_default()
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} avg {:>9.3}ms  min {:>9.3}ms  max {:>9.3}ms  orders {}",
            self.strategy,
            as_millis(self.average),
            as_millis(self.fastest()),
            as_millis(self.slowest()),
            self.order_count,
        )?;
        if self.failure_count > 0 {
            write!(f, "  failed {}", self.failure_count)?;
        }
        if self.degenerate {
            write!(f, "  (degenerate: no orders in any run)")?;
        }
        Ok(())
    }
}

/// Run `strategy` on `request` `n_runs` times on the calling thread.
///
/// A strategy error aborts the benchmark; per-entry failures do not.
pub fn benchmark<R: Rebalancer + ?Sized>(
    strategy: &R,
    request: &RebalanceRequest,
    n_runs: usize,
) -> Result<BenchmarkResult> {
    if n_runs == 0 {
        return Err(RebalanceError::InvalidConfig("benchmark runs must be > 0".into()));
    }
    let divisor = u32::try_from(n_runs).map_err(|_| {
        RebalanceError::InvalidConfig(format!("benchmark runs must be <= {}, got {n_runs}", u32::MAX))
    })?;

    let mut runs = Vec::with_capacity(n_runs);
    let mut any_orders = false;
    let mut order_count = 0;
    let mut failure_count = 0;

    for _ in 0..n_runs {
        let start = Instant::now();
        let outcome = strategy.rebalance(request)?;
        runs.push(start.elapsed());

        any_orders |= !outcome.orders.is_empty();
        order_count = outcome.orders.len();
        failure_count = outcome.failures.len();
    }

    let total: Duration = runs.iter().sum();
    let average = total / divisor;

    let result = BenchmarkResult {
        strategy: strategy.name().to_owned(),
        runs,
        average,
        order_count,
        failure_count,
        degenerate: !any_orders,
    };

    if result.degenerate {
        log::warn!("{}: no orders produced in any of {n_runs} runs", result.strategy);
    }
    log::debug!("{result}");

    Ok(result)
}

/// Outcome of the speedup gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Relative speedup in percent: `(baseline - optimized) / baseline * 100`.
///
/// A zero baseline yields zero.
pub fn speedup_pct(baseline: Duration, optimized: Duration) -> f64 {
    let base = baseline.as_secs_f64();
    if base <= 0.0 {
        return 0.0;
    }
    (base - optimized.as_secs_f64()) / base * 100.0
}

/// Baseline vs optimized, judged against a minimum speedup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Comparison {
    pub baseline: BenchmarkResult,
    pub optimized: BenchmarkResult,
    pub speedup_pct: f64,
    pub min_speedup_pct: f64,
    pub verdict: Verdict,
}

impl Comparison {
    pub fn new(baseline: BenchmarkResult, optimized: BenchmarkResult, min_speedup_pct: f64) -> Self {
        let speedup_pct = speedup_pct(baseline.average, optimized.average);
        let verdict = if speedup_pct >= min_speedup_pct {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        Self {
            baseline,
            optimized,
            speedup_pct,
            min_speedup_pct,
            verdict,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BENCHMARK RESULTS:")?;
        writeln!(f, "  {}", self.baseline)?;
        writeln!(f, "  {}", self.optimized)?;
        writeln!(f, "  speedup    {:.1}%", self.speedup_pct)?;
        writeln!(f, "  target     {:.1}%", self.min_speedup_pct)?;
        writeln!(
            f,
            "[{}] {:.1}% speedup (target: >= {:.1}%)",
            self.verdict, self.speedup_pct, self.min_speedup_pct
        )
    }
}

fn as_millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Order, OrderBatch, RebalanceOutcome};
    use crate::side::Side;
    use crate::types::{Positions, TargetAllocation};

    /// Produces a fixed number of orders after an optional sleep.
    struct Fixed {
        orders: usize,
        sleep: Duration,
    }

    impl Rebalancer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn rebalance(&self, _request: &RebalanceRequest) -> Result<RebalanceOutcome> {
            std::thread::sleep(self.sleep);
            let orders: OrderBatch = (0..self.orders)
                .map(|i| Order {
                    symbol: format!("S{i}"),
                    side: Side::Buy,
                    quantity: 1.0,
                    current_value: 0.0,
                    target_value: 100.0,
                    risk_score: 0.0,
                })
                .collect();
            Ok(RebalanceOutcome {
                orders,
                failures: Vec::new(),
            })
        }
    }

    fn request() -> RebalanceRequest {
        let target: TargetAllocation = [("AAA", 1.0)].into_iter().collect();
        RebalanceRequest::new(Positions::new(), target, 100.0).unwrap()
    }

    fn result(avg_ms: u64) -> BenchmarkResult {
        BenchmarkResult {
            strategy: "x".into(),
            runs: vec![Duration::from_millis(avg_ms)],
            average: Duration::from_millis(avg_ms),
            order_count: 1,
            failure_count: 0,
            degenerate: false,
        }
    }

    #[test]
    fn records_every_run() {
        let strategy = Fixed {
            orders: 3,
            sleep: Duration::from_millis(1),
        };
        let r = benchmark(&strategy, &request(), 5).unwrap();
        assert_eq!(r.runs.len(), 5);
        assert_eq!(r.order_count, 3);
        assert!(!r.degenerate);
        assert!(r.average >= Duration::from_millis(1));
        assert!(r.fastest() <= r.average && r.average <= r.slowest());
    }

    #[test]
    fn zero_runs_rejected() {
        let strategy = Fixed {
            orders: 1,
            sleep: Duration::ZERO,
        };
        assert!(matches!(
            benchmark(&strategy, &request(), 0),
            Err(RebalanceError::InvalidConfig(_))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn run_count_beyond_u32_rejected() {
        let strategy = Fixed {
            orders: 1,
            sleep: Duration::ZERO,
        };
        let n_runs = u32::MAX as usize + 1;
        assert!(matches!(
            benchmark(&strategy, &request(), n_runs),
            Err(RebalanceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_batches_flagged_degenerate() {
        let strategy = Fixed {
            orders: 0,
            sleep: Duration::ZERO,
        };
        let r = benchmark(&strategy, &request(), 3).unwrap();
        assert_eq!(r.order_count, 0);
        assert!(r.degenerate);
        assert!(r.to_string().contains("degenerate"));
    }

    #[test]
    fn speedup_arithmetic() {
        let s = speedup_pct(Duration::from_millis(100), Duration::from_millis(60));
        assert!((s - 40.0).abs() < 1e-9);
        let s = speedup_pct(Duration::from_millis(100), Duration::from_millis(150));
        assert!((s + 50.0).abs() < 1e-9);
        assert_eq!(speedup_pct(Duration::ZERO, Duration::from_millis(5)), 0.0);
    }

    #[test]
    fn gate_is_inclusive() {
        let c = Comparison::new(result(1000), result(750), 25.0);
        assert_eq!(c.verdict, Verdict::Pass);
        let c = Comparison::new(result(1000), result(760), 25.0);
        assert_eq!(c.verdict, Verdict::Fail);
        assert!(!c.passed());
    }

    #[test]
    fn comparison_display() {
        let c = Comparison::new(result(1000), result(500), 25.0);
        let text = c.to_string();
        assert!(text.contains("[PASS] 50.0% speedup"));
        assert!(text.contains("target     25.0%"));
    }
}
