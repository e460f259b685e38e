//! Core input types: Positions and TargetAllocation

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

/// Current holdings: symbol → monetary value.
///
/// Insertion order is irrelevant; lookups of unknown symbols read as zero.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Positions {
    values: FxHashMap<String, f64>,
}

impl Positions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value held in `symbol`.
    pub fn insert(&mut self, symbol: impl Into<String>, value: f64) {
        self.values.insert(symbol.into(), value);
    }

    /// Value held in `symbol`, or `0.0` if not held.
    #[inline]
    pub fn value_of(&self, symbol: &str) -> f64 {
        self.values.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.values.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(s, v)| (s.as_str(), *v))
    }

    /// Sum of all held values.
    pub fn total_value(&self) -> f64 {
        self.values.values().sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Positions {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(s, v)| (s.into(), v)).collect(),
        }
    }
}

/// Target weights: symbol → fraction of the portfolio's sizing basis.
///
/// Iteration is ordered by symbol, which fixes the visiting order shared by
/// every rebalancing strategy. Symbols held but not listed here are never
/// visited.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TargetAllocation {
    weights: BTreeMap<String, f64>,
}

impl TargetAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, weight: f64) {
        self.weights.insert(symbol.into(), weight);
    }

    pub fn weight_of(&self, symbol: &str) -> Option<f64> {
        self.weights.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(s, w)| (s.as_str(), *w))
    }

    /// Sum of all weights. Not required to be 1.
    pub fn weight_sum(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TargetAllocation {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(s, w)| (s.into(), w)).collect(),
        }
    }
}
