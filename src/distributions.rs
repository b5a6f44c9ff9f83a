//! Probability distributions.
//!
//! Only the normal family is needed here: it backs the approximate
//! sampling-distribution curves drawn for a pair of salary groups.
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Normal`] | μ, σ | μ | σ² |

use thiserror::Error;

use crate::special;

/// Error type for invalid distribution parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// # Mathematical Definition
/// - PDF: φ(x) = (1/(σ√(2π))) exp(−(x−μ)²/(2σ²))
/// - CDF: Φ((x−μ)/σ) (via standard normal CDF)
/// - Mean: μ
/// - Variance: σ²
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates a new normal distribution N(μ, σ).
    ///
    /// # Errors
    /// Returns `Err` if `sigma ≤ 0` or parameters are not finite.
    ///
    /// # Examples
    /// ```
    /// use salary_stats::distributions::Normal;
    /// assert!(Normal::new(5000.0, 80.0).is_ok());
    /// assert!(Normal::new(5000.0, 0.0).is_err());
    /// ```
    pub fn new(mu: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Normal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// PDF: (1/(σ√(2π))) exp(−(x−μ)²/(2σ²)).
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        special::standard_normal_pdf(z) / self.sigma
    }

    /// CDF: Φ((x−μ)/σ).
    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        special::standard_normal_cdf(z)
    }

    /// Inverse CDF (quantile): μ + σ·Φ⁻¹(p).
    ///
    /// Returns `None` if `p` is outside `(0, 1)`.
    pub fn quantile(&self, p: f64) -> Option<f64> {
        if p <= 0.0 || p >= 1.0 {
            return None;
        }
        Some(self.mu + self.sigma * special::inverse_normal_cdf(p))
    }

    /// Samples the density on `points` evenly spaced abscissae spanning
    /// `μ ± width·σ`, both ends included.
    ///
    /// The last abscissa is pinned to the upper bound so the grid ends
    /// exactly there regardless of accumulated rounding.
    ///
    /// Returns `(x, density)`; both vectors are empty when `points == 0`.
    ///
    /// # Examples
    /// ```
    /// use salary_stats::distributions::Normal;
    /// let n = Normal::new(0.0, 1.0).unwrap();
    /// let (x, y) = n.density_grid(4.0, 5);
    /// assert_eq!(x, vec![-4.0, -2.0, 0.0, 2.0, 4.0]);
    /// assert!((y[2] - 0.3989422804014327).abs() < 1e-12);
    /// ```
    pub fn density_grid(&self, width: f64, points: usize) -> (Vec<f64>, Vec<f64>) {
        let x = linspace(
            self.mu - width * self.sigma,
            self.mu + width * self.sigma,
            points,
        );
        let density = x.iter().map(|&xi| self.pdf(xi)).collect();
        (x, density)
    }
}

/// `points` evenly spaced values from `start` to `stop` inclusive.
fn linspace(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (points - 1) as f64;
            let mut xs: Vec<f64> = (0..points).map(|i| start + i as f64 * step).collect();
            xs[points - 1] = stop;
            xs
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn normal_cdf_monotone(
            mu in -1e4_f64..1e4,
            sigma in 0.1_f64..1e3,
            a in -1e4_f64..1e4,
            b in -1e4_f64..1e4,
        ) {
            let n = Normal::new(mu, sigma).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(n.cdf(lo) <= n.cdf(hi) + 1e-15);
        }

        #[test]
        fn density_grid_symmetric(
            mu in 100.0_f64..1e5,
            sigma in 1.0_f64..1e3,
            points in 2_usize..200,
        ) {
            let n = Normal::new(mu, sigma).unwrap();
            let (x, y) = n.density_grid(4.0, points);
            prop_assert_eq!(x.len(), points);
            let first = y[0];
            let last = y[points - 1];
            prop_assert!((first - last).abs() <= 1e-9 * first.max(1e-300));
            prop_assert!(y.iter().all(|&d| d > 0.0));
        }
    }
}
