//! Validated rebalance request.

use crate::error::{RebalanceError, Result};
use crate::types::{Positions, TargetAllocation};

/// Input to a single rebalance call. Read-only to every strategy.
///
/// `total_value` is the sizing basis for target values and is not required
/// to equal the sum of position values.
#[derive(Clone, Debug)]
pub struct RebalanceRequest {
    positions: Positions,
    target: TargetAllocation,
    total_value: f64,
}

impl RebalanceRequest {
    /// Build a request, rejecting anything the rebalancers cannot handle.
    pub fn new(positions: Positions, target: TargetAllocation, total_value: f64) -> Result<Self> {
        if !total_value.is_finite() || total_value <= 0.0 {
            return Err(RebalanceError::InvalidRequest(format!(
                "total_value must be positive and finite, got {total_value}"
            )));
        }
        if target.is_empty() {
            return Err(RebalanceError::InvalidRequest(
                "target allocation is empty".into(),
            ));
        }
        for (symbol, weight) in target.iter() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(RebalanceError::InvalidRequest(format!(
                    "weight for {symbol} must be in [0, 1], got {weight}"
                )));
            }
        }
        for (symbol, value) in positions.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(RebalanceError::InvalidRequest(format!(
                    "position value for {symbol} must be non-negative and finite, got {value}"
                )));
            }
        }

        Ok(Self {
            positions,
            target,
            total_value,
        })
    }

    #[inline]
    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    #[inline]
    pub fn target(&self) -> &TargetAllocation {
        &self.target
    }

    #[inline]
    pub fn total_value(&self) -> f64 {
        self.total_value
    }
}
