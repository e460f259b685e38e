//! Synthetic portfolio generation for tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{RebalanceError, Result};
use crate::request::RebalanceRequest;
use crate::types::{Positions, TargetAllocation};

/// Deterministic generator of (positions, target, total_value) triples.
///
/// Symbols are `STOCK0000`, `STOCK0001`, ... Position values are uniform in
/// `[min_value, max_value)`; `total_value` is their sum.
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioGenerator {
    size: usize,
    seed: u64,
    min_value: f64,
    max_value: f64,
}

/// A generated portfolio, ready to become a [`RebalanceRequest`].
#[derive(Clone, Debug)]
pub struct GeneratedPortfolio {
    pub positions: Positions,
    pub target: TargetAllocation,
    pub total_value: f64,
}

impl GeneratedPortfolio {
    pub fn into_request(self) -> Result<RebalanceRequest> {
        RebalanceRequest::new(self.positions, self.target, self.total_value)
    }
}

impl PortfolioGenerator {
    pub fn new(size: usize, seed: u64) -> Result<Self> {
        Self::with_value_range(size, seed, 1_000.0, 10_000.0)
    }

    pub fn with_value_range(size: usize, seed: u64, min_value: f64, max_value: f64) -> Result<Self> {
        if size == 0 {
            return Err(RebalanceError::InvalidConfig("portfolio size must be > 0".into()));
        }
        if !min_value.is_finite() || !max_value.is_finite() || min_value < 0.0 || min_value >= max_value {
            return Err(RebalanceError::InvalidConfig(format!(
                "position value range must satisfy 0 <= min < max, got [{min_value}, {max_value})"
            )));
        }
        Ok(Self {
            size,
            seed,
            min_value,
            max_value,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn symbol(i: usize) -> String {
        format!("STOCK{i:04}")
    }

    fn positions(&self, rng: &mut StdRng) -> Positions {
        (0..self.size)
            .map(|i| (Self::symbol(i), rng.random_range(self.min_value..self.max_value)))
            .collect()
    }

    /// Random holdings with Dirichlet(1, ..., 1) target weights.
    pub fn generate(&self) -> GeneratedPortfolio {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let positions = self.positions(&mut rng);
        let total_value = positions.total_value();

        // Normalized unit exponentials are Dirichlet with all alphas = 1
        let draws: Vec<f64> = (0..self.size)
            .map(|_| -(1.0 - rng.random::<f64>()).ln())
            .collect();
        let sum: f64 = draws.iter().sum();
        let target = if sum > 0.0 {
            draws
                .iter()
                .enumerate()
                .map(|(i, d)| (Self::symbol(i), d / sum))
                .collect()
        } else {
            let w = 1.0 / self.size as f64;
            (0..self.size).map(|i| (Self::symbol(i), w)).collect()
        };

        GeneratedPortfolio {
            positions,
            target,
            total_value,
        }
    }

    /// Random holdings whose targets equal their current weights, so every
    /// diff is rounding noise far below any sensible threshold.
    pub fn generate_balanced(&self) -> GeneratedPortfolio {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let positions = self.positions(&mut rng);
        let total_value = positions.total_value();
        let target = positions
            .iter()
            .map(|(s, v)| (s.to_owned(), v / total_value))
            .collect();

        GeneratedPortfolio {
            positions,
            target,
            total_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_portfolio() {
        assert!(PortfolioGenerator::new(0, 1).is_err());
    }

    #[test]
    fn rejects_bad_value_range() {
        assert!(PortfolioGenerator::with_value_range(10, 1, 500.0, 500.0).is_err());
        assert!(PortfolioGenerator::with_value_range(10, 1, -1.0, 500.0).is_err());
    }

    #[test]
    fn generates_requested_size() {
        let p = PortfolioGenerator::new(250, 42).unwrap().generate();
        assert_eq!(p.positions.len(), 250);
        assert_eq!(p.target.len(), 250);
        assert!(p.positions.contains("STOCK0000"));
        assert!(p.positions.contains("STOCK0249"));
    }

    #[test]
    fn values_in_range_and_total_matches() {
        let p = PortfolioGenerator::new(100, 7).unwrap().generate();
        for (_, v) in p.positions.iter() {
            assert!((1_000.0..10_000.0).contains(&v));
        }
        assert!((p.total_value - p.positions.total_value()).abs() < 1e-6);
    }

    #[test]
    fn weights_form_a_simplex() {
        let p = PortfolioGenerator::new(500, 3).unwrap().generate();
        assert!((p.target.weight_sum() - 1.0).abs() < 1e-9);
        for (_, w) in p.target.iter() {
            assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn deterministic_per_seed() {
        let generator = PortfolioGenerator::new(50, 11).unwrap();
        let a = generator.generate();
        let b = generator.generate();
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.target, b.target);

        let c = PortfolioGenerator::new(50, 12).unwrap().generate();
        assert_ne!(a.target, c.target);
    }

    #[test]
    fn balanced_targets_track_holdings() {
        let p = PortfolioGenerator::new(1000, 5).unwrap().generate_balanced();
        for (symbol, value) in p.positions.iter() {
            let target_value = p.total_value * p.target.weight_of(symbol).unwrap();
            assert!((target_value - value).abs() < 1e-6);
        }
        assert!(p.into_request().is_ok());
    }
}
