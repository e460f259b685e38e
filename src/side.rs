//! Order side: Buy or Sell

use std::fmt;

/// Direction of a rebalance order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side for a signed value delta: positive buys, anything else sells.
    ///
    /// Zero deltas are filtered before synthesis, so `from_diff(0.0)` is
    /// never observed on an emitted order.
    #[inline]
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 { Side::Buy } else { Side::Sell }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}
