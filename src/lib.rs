//! # orderbatch
//!
//! Portfolio rebalancing order generation with two interchangeable
//! strategies and a benchmark harness that compares them.
//!
//! ## Pipeline
//!
//! - **Generate** or supply [`Positions`] and a [`TargetAllocation`]
//! - **Validate** them into a [`RebalanceRequest`]
//! - **Rebalance** with [`SequentialRebalancer`] or [`ParallelRebalancer`]
//! - **Compare** the two with [`harness::benchmark`] and [`Comparison`]
//!
//! Both strategies emit one order per targeted symbol whose value delta
//! exceeds the threshold, and agree on every order's economics. Risk
//! scores and batch sequence are strategy-specific.
//!
//! ## Quick Start
//!
//! ```
//! use orderbatch::{
//!     ParallelRebalancer, Positions, RebalanceRequest, Rebalancer, SequentialRebalancer,
//!     Side, StrategyConfig, TargetAllocation,
//! };
//!
//! let positions: Positions = [("AAA", 1000.0)].into_iter().collect();
//! let target: TargetAllocation = [("AAA", 0.5), ("BBB", 0.5)].into_iter().collect();
//! let request = RebalanceRequest::new(positions, target, 2000.0).unwrap();
//!
//! let config = StrategyConfig::default();
//! let seq = SequentialRebalancer::new(&config).unwrap().rebalance(&request).unwrap();
//! let par = ParallelRebalancer::new(&config).unwrap().rebalance(&request).unwrap();
//!
//! // AAA is already on target; BBB needs $1000 = 10 units at $100
//! assert_eq!(seq.orders.len(), 1);
//! let order = seq.orders.find("BBB").unwrap();
//! assert_eq!(order.side, Side::Buy);
//! assert_eq!(order.quantity, 10.0);
//!
//! assert!(seq.orders.same_economics(&par.orders));
//! ```
//!
//! ## Thresholding
//!
//! An entry produces an order only if `|target_value - current_value|`
//! is strictly greater than [`StrategyConfig::threshold`]. Symbols held in
//! [`Positions`] but absent from the [`TargetAllocation`] are not visited.
//!
//! ## Randomness
//!
//! Risk scores are drawn from seeded [`rand::rngs::StdRng`] generators.
//! The sequential strategy uses one generator seeded with `base_seed`;
//! parallel worker `i` uses `base_seed ^ i`.

pub mod config;
pub mod error;
pub mod filter;
pub mod generator;
pub mod harness;
pub mod order;
pub mod parallel;
pub mod request;
pub mod sequential;
pub mod side;
pub mod strategy;
pub mod synth;
pub mod types;

pub use config::StrategyConfig;
pub use error::{RebalanceError, Result, SynthesisError};
pub use generator::{GeneratedPortfolio, PortfolioGenerator};
pub use harness::{BenchmarkResult, Comparison, Verdict, benchmark};
pub use order::{EntryFailure, Order, OrderBatch, OrderKey, RebalanceOutcome};
pub use parallel::ParallelRebalancer;
pub use request::RebalanceRequest;
pub use sequential::SequentialRebalancer;
pub use side::Side;
pub use strategy::Rebalancer;
pub use synth::OrderSynthesizer;
pub use types::{Positions, TargetAllocation};
