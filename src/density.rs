//! Normal-approximation curves for the sampling distribution of two group
//! means.
//!
//! Each curve is the N(x̄, SE) density with `SE = s/√n`, evaluated on an
//! even grid spanning `x̄ ± 4·SE`. It is a visual overlay for comparing two
//! means, not a kernel density estimate of the salaries themselves.

use serde::Serialize;
use tracing::debug;

use crate::category::Variable;
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::distributions::Normal;
use crate::error::{AnalysisError, AnalysisResult};
use crate::stats;

/// Density curve of one category's mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalCurve {
    pub label: String,
    pub mean: f64,
    pub standard_error: f64,
    /// Evenly spaced, strictly increasing abscissae.
    pub x: Vec<f64>,
    pub density: Vec<f64>,
}

impl NormalCurve {
    /// Builds the curve for one sample.
    ///
    /// # Errors
    /// `InsufficientData` below `config.min_curve_sample` observations;
    /// `Computation` when the sample has no spread.
    pub fn from_sample(
        label: &str,
        salaries: &[f64],
        config: &AnalysisConfig,
    ) -> AnalysisResult<Self> {
        if salaries.len() < config.min_curve_sample.max(2) {
            return Err(AnalysisError::InsufficientData {
                category: label.to_string(),
                found: salaries.len(),
                required: config.min_curve_sample,
            });
        }

        let mean = stats::mean(salaries).ok_or_else(|| {
            AnalysisError::Computation(format!("mean undefined for '{label}'"))
        })?;
        let sd = stats::std_dev(salaries).ok_or_else(|| {
            AnalysisError::Computation(format!("standard deviation undefined for '{label}'"))
        })?;
        let standard_error = sd / (salaries.len() as f64).sqrt();

        if standard_error <= 0.0 {
            return Err(AnalysisError::Computation(format!(
                "'{label}' has zero standard error; no density to draw"
            )));
        }
        let curve = Normal::new(mean, standard_error)?;
        let (x, density) = curve.density_grid(config.curve_span, config.curve_points);

        Ok(Self {
            label: label.to_string(),
            mean,
            standard_error,
            x,
            density,
        })
    }
}

/// Curves for the two compared categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityComparison {
    pub first: NormalCurve,
    pub second: NormalCurve,
}

/// Density curves for two categories with default settings.
pub fn estimate(
    variable: Variable,
    category_a: &str,
    category_b: &str,
    dataset: &Dataset,
) -> AnalysisResult<DensityComparison> {
    estimate_with(variable, category_a, category_b, dataset, &AnalysisConfig::default())
}

/// Density curves for two categories of `variable`.
///
/// An `Err` means "nothing to draw"; it carries the reason so the caller
/// can show a placeholder.
///
/// # Examples
/// ```
/// use salary_stats::category::Variable;
/// use salary_stats::dataset::{Dataset, Respondent};
/// use salary_stats::density::estimate;
///
/// let data: Dataset = [(3000.0, "Junior"), (3400.0, "Junior"), (9000.0, "Senior"), (9800.0, "Senior")]
///     .into_iter()
///     .map(|(s, c)| Respondent::new(s, 30.0).with(Variable::Career, c))
///     .collect();
/// let curves = estimate(Variable::Career, "Junior", "Senior", &data).unwrap();
/// assert_eq!(curves.first.x.len(), 1000);
/// assert_eq!(curves.first.x[0], 3200.0 - 4.0 * curves.first.standard_error);
/// ```
pub fn estimate_with(
    variable: Variable,
    category_a: &str,
    category_b: &str,
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> AnalysisResult<DensityComparison> {
    config.validate()?;

    let curve = |label: &str| -> AnalysisResult<NormalCurve> {
        if !dataset.has_category(variable, label) {
            return Err(AnalysisError::UnrecognizedCategory {
                category: label.to_string(),
            });
        }
        NormalCurve::from_sample(label, &dataset.salaries(variable, label), config)
    };

    let comparison = DensityComparison {
        first: curve(category_a)?,
        second: curve(category_b)?,
    };
    debug!(
        %variable,
        category_a,
        category_b,
        se_a = comparison.first.standard_error,
        se_b = comparison.second.standard_error,
        "density curves built"
    );
    Ok(comparison)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn curve_spans_exactly(salaries in proptest::collection::vec(1000.0_f64..30_000.0, 2..50)) {
            let config = AnalysisConfig::default();
            if let Ok(c) = NormalCurve::from_sample("g", &salaries, &config) {
                prop_assert_eq!(c.x[0], c.mean - 4.0 * c.standard_error);
                prop_assert_eq!(c.x[c.x.len() - 1], c.mean + 4.0 * c.standard_error);
                prop_assert!(c.x.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(c.density.iter().all(|&d| d > 0.0 && d.is_finite()));
            }
        }
    }
}
