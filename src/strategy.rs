//! The rebalancing strategy interface.

use crate::error::Result;
use crate::order::RebalanceOutcome;
use crate::request::RebalanceRequest;

/// A way of turning a request into an order batch.
///
/// Implementations must produce the same order economics for the same
/// request; they may differ in sequence, risk scores, and speed.
pub trait Rebalancer {
    /// Short label used in reports and logs.
    fn name(&self) -> &str;

    /// Compute the orders that move `request` toward its target.
    fn rebalance(&self, request: &RebalanceRequest) -> Result<RebalanceOutcome>;
}

impl<T: Rebalancer + ?Sized> Rebalancer for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn rebalance(&self, request: &RebalanceRequest) -> Result<RebalanceOutcome> {
        (**self).rebalance(request)
    }
}

impl<T: Rebalancer + ?Sized> Rebalancer for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn rebalance(&self, request: &RebalanceRequest) -> Result<RebalanceOutcome> {
        (**self).rebalance(request)
    }
}
