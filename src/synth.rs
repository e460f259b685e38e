//! Order synthesis: one filtered entry in, one order out.
//!
//! Shared by both strategies. The caller owns the random generator so each
//! strategy decides how entropy is distributed across threads.

use rand::Rng;

use crate::config::{DEFAULT_RISK_COEFFICIENT, DEFAULT_UNIT_PRICE, StrategyConfig};
use crate::error::{Result, SynthesisError};
use crate::order::Order;
use crate::side::Side;

/// Converts value deltas into orders with a risk score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrderSynthesizer {
    unit_price: f64,
    risk_coefficient: f64,
}

impl Default for OrderSynthesizer {
    fn default() -> Self {
        Self {
            unit_price: DEFAULT_UNIT_PRICE,
            risk_coefficient: DEFAULT_RISK_COEFFICIENT,
        }
    }
}

impl OrderSynthesizer {
    /// Build from a validated strategy config.
    pub fn from_config(config: &StrategyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            unit_price: config.unit_price,
            risk_coefficient: config.risk_coefficient,
        })
    }

    #[inline]
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    #[inline]
    pub fn risk_coefficient(&self) -> f64 {
        self.risk_coefficient
    }

    /// Build the order closing `diff` for `symbol`.
    ///
    /// `diff` must be non-zero; the filter phase guarantees it. Consumes one
    /// draw from `rng` for the risk score.
    pub fn synthesize<R: Rng>(
        &self,
        symbol: &str,
        diff: f64,
        current_value: f64,
        target_value: f64,
        rng: &mut R,
    ) -> std::result::Result<Order, SynthesisError> {
        debug_assert!(diff != 0.0, "zero diff reached synthesis for {symbol}");

        let quantity = diff.abs() / self.unit_price;
        if !quantity.is_finite() {
            return Err(SynthesisError::NonFiniteQuantity { diff });
        }

        let draw: f64 = rng.random();
        Ok(Order {
            symbol: symbol.to_owned(),
            side: Side::from_diff(diff),
            quantity,
            current_value,
            target_value,
            risk_score: draw * quantity * self.risk_coefficient,
        })
    }
}
