//! Error types for request validation, order synthesis, and rebalancing.

/// Failure to turn a single filtered entry into an order.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    /// `|diff| / unit_price` overflowed or was otherwise not finite.
    #[error("quantity for diff {diff} is not finite")]
    NonFiniteQuantity { diff: f64 },
}

/// All errors that can occur while rebalancing.
#[derive(Debug, thiserror::Error)]
pub enum RebalanceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, RebalanceError>;
