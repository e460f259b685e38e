//! Column-oriented diff and threshold computation.
//!
//! Both strategies route their arithmetic through [`value_diff`] and
//! [`exceeds_threshold`], so a mask computed here selects exactly the
//! entries the sequential loop would emit, with bit-identical values.

use std::ops::Range;

use crate::request::RebalanceRequest;

/// Target value and signed delta for one allocation entry.
#[inline]
pub fn value_diff(total_value: f64, weight: f64, current_value: f64) -> (f64, f64) {
    let target_value = total_value * weight;
    (target_value, target_value - current_value)
}

/// True if `diff` is large enough to produce an order.
#[inline]
pub fn exceeds_threshold(diff: f64, threshold: f64) -> bool {
    diff.abs() > threshold
}

/// Parallel columns over the target allocation, in its iteration order.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffColumns<'a> {
    symbols: Vec<&'a str>,
    current: Vec<f64>,
    weights: Vec<f64>,
    target: Vec<f64>,
    diff: Vec<f64>,
    mask: Vec<bool>,
}

impl<'a> DiffColumns<'a> {
    /// Materialize the columns and the threshold mask in one pass per column.
    pub fn compute(request: &'a RebalanceRequest, threshold: f64) -> Self {
        let n = request.target().len();
        let total_value = request.total_value();

        let mut symbols = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);
        for (symbol, weight) in request.target().iter() {
            symbols.push(symbol);
            weights.push(weight);
        }

        let positions = request.positions();
        let current: Vec<f64> = symbols.iter().map(|s| positions.value_of(s)).collect();

        let (target, diff): (Vec<f64>, Vec<f64>) = weights
            .iter()
            .zip(&current)
            .map(|(&w, &c)| value_diff(total_value, w, c))
            .unzip();

        let mask: Vec<bool> = diff.iter().map(|&d| exceeds_threshold(d, threshold)).collect();

        Self {
            symbols,
            current,
            weights,
            target,
            diff,
            mask,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn diffs(&self) -> &[f64] {
        &self.diff
    }

    /// Number of entries that pass the threshold.
    pub fn selected(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Project the columns down to the masked subset.
    pub fn project(&self) -> FilteredEntries<'a> {
        let keep = self.selected();
        let mut out = FilteredEntries {
            symbols: Vec::with_capacity(keep),
            diffs: Vec::with_capacity(keep),
            current: Vec::with_capacity(keep),
            target: Vec::with_capacity(keep),
        };

        for (i, _) in self.mask.iter().enumerate().filter(|&(_, &m)| m) {
            out.symbols.push(self.symbols[i]);
            out.diffs.push(self.diff[i]);
            out.current.push(self.current[i]);
            out.target.push(self.target[i]);
        }
        out
    }
}

/// Entries that survived the threshold, still column-oriented.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredEntries<'a> {
    symbols: Vec<&'a str>,
    diffs: Vec<f64>,
    current: Vec<f64>,
    target: Vec<f64>,
}

/// One row of [`FilteredEntries`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry<'a> {
    pub symbol: &'a str,
    pub diff: f64,
    pub current_value: f64,
    pub target_value: f64,
}

impl<'a> FilteredEntries<'a> {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn entry(&self, i: usize) -> Entry<'a> {
        Entry {
            symbol: self.symbols[i],
            diff: self.diffs[i],
            current_value: self.current[i],
            target_value: self.target[i],
        }
    }

    /// Rows in `range`, in column order.
    pub fn rows(&self, range: Range<usize>) -> impl Iterator<Item = Entry<'a>> + '_ {
        range.map(move |i| self.entry(i))
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[Entry<'a>]) -> Self {
        Self {
            symbols: rows.iter().map(|r| r.symbol).collect(),
            diffs: rows.iter().map(|r| r.diff).collect(),
            current: rows.iter().map(|r| r.current_value).collect(),
            target: rows.iter().map(|r| r.target_value).collect(),
        }
    }

    /// Split `0..len` into at most `parts` contiguous, non-empty ranges
    /// whose sizes differ by at most one.
    pub fn partition(&self, parts: usize) -> Vec<Range<usize>> {
        let n = self.len();
        let parts = parts.max(1).min(n);
        if parts == 0 {
            return Vec::new();
        }

        let base = n / parts;
        let extra = n % parts;
        let mut ranges = Vec::with_capacity(parts);
        let mut start = 0;
        for i in 0..parts {
            let size = base + usize::from(i < extra);
            ranges.push(start..start + size);
            start += size;
        }
        ranges
    }
}
