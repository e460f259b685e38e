//! orderbatch-rebalancer: benchmark runner for the orderbatch strategies.
//!
//! Generates a synthetic portfolio, checks that the sequential and parallel
//! strategies agree on the orders, times both, and gates the speedup against
//! a configured minimum. Every run appends to a JSONL audit trail.

pub mod audit;
pub mod config;
pub mod error;
pub mod runner;
