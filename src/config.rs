//! Strategy configuration shared by both rebalancers.

use crate::error::{RebalanceError, Result};

/// Default price used to convert value deltas into share-equivalents.
pub const DEFAULT_UNIT_PRICE: f64 = 100.0;
/// Default minimum absolute value delta that produces an order.
pub const DEFAULT_THRESHOLD: f64 = 1.0;
/// Default scale applied to risk scores.
pub const DEFAULT_RISK_COEFFICIENT: f64 = 0.01;
/// Default worker count for the parallel strategy.
pub const DEFAULT_WORKERS: usize = 4;
/// Default base seed for risk-score generators.
pub const DEFAULT_BASE_SEED: u64 = 42;

/// Knobs for order synthesis and the parallel fan-out.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrategyConfig {
    /// Price per share-equivalent
    pub unit_price: f64,
    /// Deltas with `|diff| <= threshold` are skipped
    pub threshold: f64,
    pub risk_coefficient: f64,
    /// Worker count (parallel strategy only)
    pub workers: usize,
    /// Worker `i` draws from a generator seeded with `base_seed ^ i`
    pub base_seed: u64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            unit_price: DEFAULT_UNIT_PRICE,
            threshold: DEFAULT_THRESHOLD,
            risk_coefficient: DEFAULT_RISK_COEFFICIENT,
            workers: DEFAULT_WORKERS,
            base_seed: DEFAULT_BASE_SEED,
        }
    }
}

impl StrategyConfig {
    /// Validate the config. Returns `InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.unit_price.is_finite() || self.unit_price <= 0.0 {
            return Err(RebalanceError::InvalidConfig(format!(
                "unit_price must be positive and finite, got {}",
                self.unit_price
            )));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(RebalanceError::InvalidConfig(format!(
                "threshold must be non-negative and finite, got {}",
                self.threshold
            )));
        }
        if !self.risk_coefficient.is_finite() || self.risk_coefficient < 0.0 {
            return Err(RebalanceError::InvalidConfig(format!(
                "risk_coefficient must be non-negative and finite, got {}",
                self.risk_coefficient
            )));
        }
        if self.workers == 0 {
            return Err(RebalanceError::InvalidConfig("workers must be > 0".into()));
        }
        Ok(())
    }
}
