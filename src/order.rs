//! Rebalance orders and the batches that carry them.

use crate::side::Side;

/// A single rebalance order. Immutable once produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub symbol: String,
    pub side: Side,
    /// Share-equivalents: `|diff| / unit_price`
    pub quantity: f64,
    pub current_value: f64,
    pub target_value: f64,
    /// Synthetic risk scalar, correlated with `quantity`
    pub risk_score: f64,
}

impl Order {
    /// Signed value delta this order closes (`target - current`).
    #[inline]
    pub fn value_delta(&self) -> f64 {
        self.target_value - self.current_value
    }

    /// The order's economics without the risk score.
    pub fn key(&self) -> OrderKey {
        OrderKey {
            symbol: self.symbol.clone(),
            side: self.side,
            quantity_bits: self.quantity.to_bits(),
            current_bits: self.current_value.to_bits(),
            target_bits: self.target_value.to_bits(),
        }
    }
}

/// Hashable, totally ordered projection of an [`Order`].
///
/// Floats are held by bit pattern: two strategies agree only if they
/// computed exactly the same values.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    pub symbol: String,
    pub side: Side,
    quantity_bits: u64,
    current_bits: u64,
    target_bits: u64,
}

impl OrderKey {
    pub fn quantity(&self) -> f64 {
        f64::from_bits(self.quantity_bits)
    }

    pub fn current_value(&self) -> f64 {
        f64::from_bits(self.current_bits)
    }

    pub fn target_value(&self) -> f64 {
        f64::from_bits(self.target_bits)
    }
}

/// Orders produced by one rebalance invocation.
///
/// The sequence order is an artifact of the strategy; compare batches with
/// [`OrderBatch::economics`], never element by element.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OrderBatch {
    orders: Vec<Order>,
}

impl OrderBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn as_slice(&self) -> &[Order] {
        &self.orders
    }

    /// Find the order for `symbol`. At most one exists per batch.
    pub fn find(&self, symbol: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.symbol == symbol)
    }

    /// Sorted multiset of order economics, for comparing batches as sets.
    pub fn economics(&self) -> Vec<OrderKey> {
        let mut keys: Vec<OrderKey> = self.orders.iter().map(Order::key).collect();
        keys.sort_unstable();
        keys
    }

    /// True if both batches carry the same orders, ignoring sequence and
    /// risk scores.
    pub fn same_economics(&self, other: &OrderBatch) -> bool {
        self.len() == other.len() && self.economics() == other.economics()
    }

    /// Total absolute value moved by the batch.
    pub fn gross_value(&self) -> f64 {
        self.orders.iter().map(|o| o.value_delta().abs()).sum()
    }
}

impl From<Vec<Order>> for OrderBatch {
    fn from(orders: Vec<Order>) -> Self {
        Self { orders }
    }
}

impl FromIterator<Order> for OrderBatch {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        Self {
            orders: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OrderBatch {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.into_iter()
    }
}

impl<'a> IntoIterator for &'a OrderBatch {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

/// An entry whose order could not be synthesized.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryFailure {
    pub symbol: String,
    pub reason: String,
}

/// Result of one rebalance call: the orders produced plus any entries
/// that failed along the way.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebalanceOutcome {
    pub orders: OrderBatch,
    pub failures: Vec<EntryFailure>,
}

impl RebalanceOutcome {
    /// True if every filtered entry produced an order.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
