//! Parallel batch strategy: column filter, then fan-out to a worker pool.
//!
//! The filter phase runs on the calling thread. Surviving entries are cut
//! into at most `workers` contiguous slices, and each slice is synthesized
//! on a rayon pool built for this call only. Worker `i` draws risk scores
//! from its own generator seeded with `base_seed ^ i`, so scores are
//! reproducible per worker but do not match the sequential strategy.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::config::StrategyConfig;
use crate::error::{RebalanceError, Result};
use crate::filter::{DiffColumns, FilteredEntries};
use crate::order::{EntryFailure, Order, OrderBatch, RebalanceOutcome};
use crate::request::RebalanceRequest;
use crate::strategy::Rebalancer;
use crate::synth::OrderSynthesizer;

/// Seed for worker `index`'s risk-score generator.
#[inline]
pub fn worker_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ index as u64
}

/// Batched strategy with a fixed-size worker pool.
#[derive(Clone, Debug)]
pub struct ParallelRebalancer {
    synth: OrderSynthesizer,
    threshold: f64,
    workers: usize,
    base_seed: u64,
    order_delay: Option<Duration>,
}

struct WorkerOutput {
    orders: Vec<Order>,
    failures: Vec<EntryFailure>,
}

impl ParallelRebalancer {
    pub fn new(config: &StrategyConfig) -> Result<Self> {
        Ok(Self {
            synth: OrderSynthesizer::from_config(config)?,
            threshold: config.threshold,
            workers: config.workers,
            base_seed: config.base_seed,
            order_delay: None,
        })
    }

    /// Sleep for `delay` after each synthesized order, inside the worker.
    pub fn with_order_delay(mut self, delay: Duration) -> Self {
        self.order_delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn run_worker(
        &self,
        index: usize,
        entries: &FilteredEntries<'_>,
        range: Range<usize>,
    ) -> WorkerOutput {
        let mut rng = StdRng::seed_from_u64(worker_seed(self.base_seed, index));
        let mut out = WorkerOutput {
            orders: Vec::with_capacity(range.len()),
            failures: Vec::new(),
        };

        for entry in entries.rows(range) {
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
                self.synth.synthesize(
                    entry.symbol,
                    entry.diff,
                    entry.current_value,
                    entry.target_value,
                    &mut rng,
                )
            }));

            match attempt {
                Ok(Ok(order)) => {
                    out.orders.push(order);
                    if let Some(delay) = self.order_delay {
                        std::thread::sleep(delay);
                    }
                }
                Ok(Err(e)) => out.failures.push(EntryFailure {
                    symbol: entry.symbol.to_owned(),
                    reason: e.to_string(),
                }),
                Err(payload) => out.failures.push(EntryFailure {
                    symbol: entry.symbol.to_owned(),
                    reason: format!("worker {index} panicked: {}", panic_message(&*payload)),
                }),
            }
        }
        out
    }
}

impl Rebalancer for ParallelRebalancer {
    fn name(&self) -> &str {
        "parallel"
    }

    fn rebalance(&self, request: &RebalanceRequest) -> Result<RebalanceOutcome> {
        let started = Instant::now();
        let columns = DiffColumns::compute(request, self.threshold);
        let entries = columns.project();
        log::debug!(
            "parallel: filter kept {} of {} entries in {:?}",
            entries.len(),
            columns.len(),
            started.elapsed()
        );

        if entries.is_empty() {
            return Ok(RebalanceOutcome::default());
        }

        // One thread per slice; never more threads than entries
        let ranges = entries.partition(self.workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .thread_name(|i| format!("rebalance-worker-{i}"))
            .build()
            .map_err(|e| RebalanceError::WorkerPool(e.to_string()))?;
        let outputs: Vec<WorkerOutput> = pool.install(|| {
            ranges
                .into_par_iter()
                .enumerate()
                .map(|(index, range)| self.run_worker(index, &entries, range))
                .collect()
        });

        let mut orders = OrderBatch::with_capacity(entries.len());
        let mut failures = Vec::new();
        for output in outputs {
            for order in output.orders {
                orders.push(order);
            }
            failures.extend(output.failures);
        }

        for failure in &failures {
            log::warn!("order synthesis failed for {}: {}", failure.symbol, failure.reason);
        }

        Ok(RebalanceOutcome { orders, failures })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
