//! Sequential baseline: one allocation entry at a time.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::StrategyConfig;
use crate::error::Result;
use crate::filter::{exceeds_threshold, value_diff};
use crate::order::{EntryFailure, OrderBatch, RebalanceOutcome};
use crate::request::RebalanceRequest;
use crate::strategy::Rebalancer;
use crate::synth::OrderSynthesizer;

/// Reference strategy. Visits the target allocation in order and
/// synthesizes each order inline. An entry that fails synthesis is
/// recorded in [`RebalanceOutcome::failures`] and the walk continues.
///
/// Risk scores come from one generator seeded with `base_seed`, the same
/// seed the parallel strategy gives its first worker.
#[derive(Clone, Debug)]
pub struct SequentialRebalancer {
    synth: OrderSynthesizer,
    threshold: f64,
    seed: u64,
    order_delay: Option<Duration>,
}

impl SequentialRebalancer {
    pub fn new(config: &StrategyConfig) -> Result<Self> {
        Ok(Self {
            synth: OrderSynthesizer::from_config(config)?,
            threshold: config.threshold,
            seed: config.base_seed,
            order_delay: None,
        })
    }

    /// Sleep for `delay` after each emitted order, simulating per-order
    /// validation work.
    pub fn with_order_delay(mut self, delay: Duration) -> Self {
        self.order_delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Rebalancer for SequentialRebalancer {
    fn name(&self) -> &str {
        "sequential"
    }

    fn rebalance(&self, request: &RebalanceRequest) -> Result<RebalanceOutcome> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let total_value = request.total_value();
        let positions = request.positions();
        let mut orders = OrderBatch::new();
        let mut failures = Vec::new();

        for (symbol, weight) in request.target().iter() {
            let current_value = positions.value_of(symbol);
            let (target_value, diff) = value_diff(total_value, weight, current_value);
            if !exceeds_threshold(diff, self.threshold) {
                continue;
            }

            match self
                .synth
                .synthesize(symbol, diff, current_value, target_value, &mut rng)
            {
                Ok(order) => {
                    orders.push(order);
                    if let Some(delay) = self.order_delay {
                        std::thread::sleep(delay);
                    }
                }
                Err(e) => {
                    log::warn!("order synthesis failed for {symbol}: {e}");
                    failures.push(EntryFailure {
                        symbol: symbol.to_owned(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::debug!(
            "sequential: {} of {} entries produced orders",
            orders.len(),
            request.target().len()
        );

        Ok(RebalanceOutcome { orders, failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::side::Side;
    use crate::types::{Positions, TargetAllocation};

    fn rebalancer() -> SequentialRebalancer {
        SequentialRebalancer::new(&StrategyConfig::default()).unwrap()
    }

    #[test]
    fn scenario_a_single_buy() {
        let positions: Positions = [("AAA", 1000.0)].into_iter().collect();
        let target: TargetAllocation = [("AAA", 0.5), ("BBB", 0.5)].into_iter().collect();
        let req = RebalanceRequest::new(positions, target, 2000.0).unwrap();

        let outcome = rebalancer().rebalance(&req).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.orders.len(), 1);

        let order = &outcome.orders.as_slice()[0];
        assert_eq!(order.symbol, "BBB");
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.quantity, 10.0);
        assert_eq!(order.current_value, 0.0);
        assert_eq!(order.target_value, 1000.0);
    }

    #[test]
    fn sell_when_overweight() {
        let positions: Positions = [("AAA", 5000.0)].into_iter().collect();
        let target: TargetAllocation = [("AAA", 0.25)].into_iter().collect();
        let req = RebalanceRequest::new(positions, target, 10_000.0).unwrap();

        let outcome = rebalancer().rebalance(&req).unwrap();
        let order = outcome.orders.find("AAA").unwrap();
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.quantity, 25.0);
    }

    #[test]
    fn delta_at_threshold_is_skipped() {
        let positions: Positions = [("AAA", 999.0), ("BBB", 998.5)].into_iter().collect();
        let target: TargetAllocation = [("AAA", 0.5), ("BBB", 0.5)].into_iter().collect();
        let req = RebalanceRequest::new(positions, target, 2000.0).unwrap();

        // AAA diff is exactly 1.0 (skipped); BBB diff is 1.5 (emitted)
        let outcome = rebalancer().rebalance(&req).unwrap();
        assert_eq!(outcome.orders.len(), 1);
        assert!(outcome.orders.find("BBB").is_some());
    }

    #[test]
    fn untargeted_positions_are_left_alone() {
        let positions: Positions = [("AAA", 1000.0), ("OLD", 5000.0)].into_iter().collect();
        let target: TargetAllocation = [("AAA", 0.5)].into_iter().collect();
        let req = RebalanceRequest::new(positions, target, 4000.0).unwrap();

        let outcome = rebalancer().rebalance(&req).unwrap();
        assert!(outcome.orders.find("OLD").is_none());
        assert_eq!(outcome.orders.len(), 1);
    }

    #[test]
    fn same_seed_same_batch() {
        let target: TargetAllocation = (0..20).map(|i| (format!("S{i:02}"), 0.05)).collect();
        let req = RebalanceRequest::new(Positions::new(), target, 100_000.0).unwrap();

        let a = rebalancer().rebalance(&req).unwrap();
        let b = rebalancer().rebalance(&req).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn synthesis_failure_is_recorded_and_walk_continues() {
        let config = StrategyConfig {
            unit_price: 1e-300,
            ..Default::default()
        };
        let target: TargetAllocation = [("AAA", 1.0), ("BBB", 1e-297)].into_iter().collect();
        let req = RebalanceRequest::new(Positions::new(), target, 1e300).unwrap();

        let outcome = SequentialRebalancer::new(&config)
            .unwrap()
            .rebalance(&req)
            .unwrap();
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].symbol, "AAA");
        assert!(outcome.failures[0].reason.contains("not finite"));
        assert_eq!(outcome.orders.len(), 1);
        assert!(outcome.orders.find("BBB").is_some());
    }

    #[test]
    fn failures_match_parallel_strategy() {
        use crate::parallel::ParallelRebalancer;

        let config = StrategyConfig {
            unit_price: 1e-300,
            workers: 2,
            ..Default::default()
        };
        let target: TargetAllocation = [("AAA", 1.0), ("BBB", 1e-297)].into_iter().collect();
        let req = RebalanceRequest::new(Positions::new(), target, 1e300).unwrap();

        let seq = SequentialRebalancer::new(&config).unwrap().rebalance(&req).unwrap();
        let par = ParallelRebalancer::new(&config).unwrap().rebalance(&req).unwrap();
        assert!(seq.orders.same_economics(&par.orders));
        assert_eq!(seq.failures, par.failures);
    }

    #[test]
    fn zero_delay_is_no_delay() {
        let seq = rebalancer().with_order_delay(Duration::ZERO);
        assert!(seq.order_delay.is_none());
    }
}
