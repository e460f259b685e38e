//! End-to-end scenarios: request validation, quiet portfolios, and the
//! benchmark harness on an injected baseline delay.

use std::time::{Duration, Instant};

use orderbatch::filter::DiffColumns;
use orderbatch::{
    Comparison, ParallelRebalancer, PortfolioGenerator, Positions, RebalanceError,
    RebalanceRequest, Rebalancer, SequentialRebalancer, Side, StrategyConfig, TargetAllocation,
    Verdict, benchmark,
};

fn strategies(config: &StrategyConfig) -> (SequentialRebalancer, ParallelRebalancer) {
    (
        SequentialRebalancer::new(config).unwrap(),
        ParallelRebalancer::new(config).unwrap(),
    )
}

// === Scenario A: one held symbol on target, one new symbol ===

#[test]
fn on_target_symbol_skipped_new_symbol_bought() {
    let positions: Positions = [("AAA", 1000.0)].into_iter().collect();
    let target: TargetAllocation = [("AAA", 0.5), ("BBB", 0.5)].into_iter().collect();
    let req = RebalanceRequest::new(positions, target, 2000.0).unwrap();

    let (seq, par) = strategies(&StrategyConfig::default());
    for outcome in [seq.rebalance(&req).unwrap(), par.rebalance(&req).unwrap()] {
        assert_eq!(outcome.orders.len(), 1);
        assert!(outcome.orders.find("AAA").is_none());

        let bbb = outcome.orders.find("BBB").unwrap();
        assert_eq!(bbb.side, Side::Buy);
        assert_eq!(bbb.quantity, 10.0);
        assert_eq!(bbb.current_value, 0.0);
        assert_eq!(bbb.target_value, 1000.0);
    }
}

// === Scenario B: empty target ===

#[test]
fn empty_target_is_invalid_request() {
    let positions: Positions = [("AAA", 1000.0)].into_iter().collect();
    let err = RebalanceRequest::new(positions, TargetAllocation::new(), 2000.0).unwrap_err();
    assert!(matches!(err, RebalanceError::InvalidRequest(_)));
}

#[test]
fn non_positive_total_is_invalid_request() {
    let target: TargetAllocation = [("AAA", 1.0)].into_iter().collect();
    let err = RebalanceRequest::new(Positions::new(), target, 0.0).unwrap_err();
    assert!(matches!(err, RebalanceError::InvalidRequest(_)));
}

// === Scenario C: 1000 symbols, every diff below threshold ===

#[test]
fn quiet_portfolio_produces_no_orders() {
    let req = PortfolioGenerator::new(1000, 42)
        .unwrap()
        .generate_balanced()
        .into_request()
        .unwrap();
    assert_eq!(DiffColumns::compute(&req, 1.0).selected(), 0);

    let bound = Duration::from_secs(2);
    let (seq, par) = strategies(&StrategyConfig::default());

    let start = Instant::now();
    let seq_out = seq.rebalance(&req).unwrap();
    assert!(start.elapsed() < bound);
    assert!(seq_out.orders.is_empty());

    let start = Instant::now();
    let par_out = par.rebalance(&req).unwrap();
    assert!(start.elapsed() < bound);
    assert!(par_out.orders.is_empty());

    let result = benchmark(&par, &req, 3).unwrap();
    assert_eq!(result.order_count, 0);
    assert!(result.degenerate);
    assert_eq!(result.failure_count, 0);
}

// === Scenario D: baseline with injected per-order delay ===

#[test]
fn delayed_baseline_is_slower() {
    let generated = PortfolioGenerator::new(1000, 42).unwrap().generate();
    let req = generated.into_request().unwrap();

    let config = StrategyConfig::default();
    let selected = DiffColumns::compute(&req, config.threshold).selected();
    assert!(selected * 4 > req.target().len(), "only {selected} entries above threshold");

    let baseline = SequentialRebalancer::new(&config)
        .unwrap()
        .with_order_delay(Duration::from_micros(100));
    let optimized = ParallelRebalancer::new(&config).unwrap();

    let base = benchmark(&baseline, &req, 2).unwrap();
    let opt = benchmark(&optimized, &req, 2).unwrap();
    assert_eq!(base.order_count, opt.order_count);
    assert_eq!(base.order_count, selected);

    // Gate at 0%: validates the arithmetic, not a performance target
    let comparison = Comparison::new(base, opt, 0.0);
    assert!(comparison.speedup_pct > 0.0, "speedup {}", comparison.speedup_pct);
    assert_eq!(comparison.verdict, Verdict::Pass);
}

// === Equivalence on a generated portfolio ===

#[test]
fn generated_portfolio_equivalence() {
    let req = PortfolioGenerator::new(2000, 7)
        .unwrap()
        .generate()
        .into_request()
        .unwrap();

    let seq = SequentialRebalancer::new(&StrategyConfig::default())
        .unwrap()
        .rebalance(&req)
        .unwrap();
    for workers in [1, 4, 16] {
        let config = StrategyConfig {
            workers,
            ..Default::default()
        };
        let par = ParallelRebalancer::new(&config).unwrap().rebalance(&req).unwrap();
        assert!(seq.orders.same_economics(&par.orders), "workers={workers}");
    }
}
