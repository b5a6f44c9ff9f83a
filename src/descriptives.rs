//! Per-category salary descriptives.
//!
//! Produces the summary table (count, mean, standard deviation, coefficient
//! of variation, confidence interval) and the statistics behind the salary
//! boxplots, one row per category in display order.
//!
//! The confidence interval is the normal approximation `x̄ ± z·s/√n` with
//! `z = 1.96` by default, whatever the sample size.

use serde::Serialize;
use tracing::debug;

use crate::category::Variable;
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::stats::{self, WelfordAccumulator};

/// One row of the descriptive table.
///
/// `std_dev`, `coefficient_of_variation` and the interval bounds are NaN
/// when `sample_size < 2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub category: String,
    pub sample_size: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// Percent, computed as `100 × round(s / x̄, 4)`.
    pub coefficient_of_variation: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl GroupSummary {
    /// Summarises one sample.
    ///
    /// # Examples
    /// ```
    /// use salary_stats::descriptives::GroupSummary;
    ///
    /// let row = GroupSummary::from_sample("Junior", &[3000.0, 3200.0, 3100.0], 1.96);
    /// assert_eq!(row.sample_size, 3);
    /// assert!((row.mean - 3100.0).abs() < 1e-9);
    /// assert!(row.ci_lower < row.mean && row.mean < row.ci_upper);
    /// ```
    pub fn from_sample(category: impl Into<String>, salaries: &[f64], z: f64) -> Self {
        let acc = WelfordAccumulator::from_slice(salaries);
        let n = salaries.len();
        let mean = stats::mean(salaries).unwrap_or(f64::NAN);
        let std_dev = acc.sample_std_dev().unwrap_or(f64::NAN);
        let half_width = z * std_dev / (n as f64).sqrt();

        Self {
            category: category.into(),
            sample_size: n,
            mean,
            std_dev,
            coefficient_of_variation: 100.0 * round_to(std_dev / mean, 4),
            ci_lower: mean - half_width,
            ci_upper: mean + half_width,
        }
    }

    /// Copy with every numeric field rounded to 2 decimals for display.
    pub fn rounded(&self) -> Self {
        Self {
            category: self.category.clone(),
            sample_size: self.sample_size,
            mean: round_to(self.mean, 2),
            std_dev: round_to(self.std_dev, 2),
            coefficient_of_variation: round_to(self.coefficient_of_variation, 2),
            ci_lower: round_to(self.ci_lower, 2),
            ci_upper: round_to(self.ci_upper, 2),
        }
    }
}

/// Rounds half to even at `decimals` places; NaN stays NaN.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Descriptive table for `variable` with default settings.
pub fn summarize(variable: Variable, dataset: &Dataset) -> Vec<GroupSummary> {
    summarize_with(variable, dataset, &AnalysisConfig::default())
}

/// Descriptive table for `variable`, one row per category present.
///
/// # Examples
/// ```
/// use salary_stats::category::Variable;
/// use salary_stats::dataset::{Dataset, Respondent};
/// use salary_stats::descriptives::summarize;
///
/// let data: Dataset = [(3000.0, "Senior"), (2000.0, "Junior"), (2200.0, "Junior")]
///     .into_iter()
///     .map(|(s, c)| Respondent::new(s, 30.0).with(Variable::Career, c))
///     .collect();
/// let rows = summarize(Variable::Career, &data);
/// assert_eq!(rows[0].category, "Junior");
/// assert_eq!(rows[1].sample_size, 1);
/// assert!(rows[1].ci_lower.is_nan());
/// ```
pub fn summarize_with(
    variable: Variable,
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> Vec<GroupSummary> {
    let view = dataset.ordered_view(variable);
    let rows: Vec<GroupSummary> = view
        .groups
        .iter()
        .map(|g| GroupSummary::from_sample(g.label, &g.salaries, config.confidence_z))
        .collect();
    debug!(%variable, categories = rows.len(), "group descriptives computed");
    rows
}

/// Statistics for one box of a salary boxplot with mean marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotSummary {
    pub category: String,
    pub sample_size: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation not below `q1 − 1.5·IQR` (at most `q1`).
    pub lower_whisker: f64,
    /// Largest observation not above `q3 + 1.5·IQR` (at least `q3`).
    pub upper_whisker: f64,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxplotSummary {
    /// `None` for an empty sample.
    pub fn from_sample(category: impl Into<String>, salaries: &[f64]) -> Option<Self> {
        let sorted = stats::sorted_copy(salaries)?;
        let q1 = stats::quantile_sorted(&sorted, 0.25)?;
        let median = stats::quantile_sorted(&sorted, 0.5)?;
        let q3 = stats::quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        // Whiskers never retract inside the box.
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&x| x >= low_fence)
            .map_or(q1, |x| x.min(q1));
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= high_fence)
            .map_or(q3, |x| x.max(q3));
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&x| x < low_fence || x > high_fence)
            .collect();

        Some(Self {
            category: category.into(),
            sample_size: sorted.len(),
            mean: stats::mean(&sorted)?,
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Boxplot statistics for every category of `variable`, in display order.
pub fn boxplot_summary(variable: Variable, dataset: &Dataset) -> Vec<BoxplotSummary> {
    dataset
        .ordered_view(variable)
        .groups
        .iter()
        .filter_map(|g| BoxplotSummary::from_sample(g.label, &g.salaries))
        .collect()
}
