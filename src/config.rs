//! Analysis configuration.
//!
//! Thresholds and procedure choices for the comparison engine. The defaults
//! reproduce the dashboard's behaviour exactly; every public operation has a
//! `*_with` form taking an [`AnalysisConfig`] and a plain form using
//! [`AnalysisConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Test used to decide whether two groups share a variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceTest {
    /// Median-centred Levene (Brown–Forsythe); robust to non-normality.
    #[default]
    Levene,
    /// Bartlett's test; more powerful under normality, sensitive otherwise.
    Bartlett,
}

/// How non-normal small samples are transformed before testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformPolicy {
    /// Box–Cox with each sample's own maximum-likelihood lambda.
    #[default]
    BoxCox,
    /// Natural log when both samples are right-skewed (mean > median),
    /// Box–Cox otherwise.
    SkewAware,
}

/// Configuration for group descriptives, hypothesis testing and density curves
///
/// # Example
/// ```
/// use salary_stats::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.min_test_sample, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Alpha for the normality, variance and mean tests.
    ///
    /// Default: 0.05
    pub significance_level: f64,

    /// Minimum observations per group before a hypothesis test is run.
    ///
    /// Default: 10
    pub min_test_sample: usize,

    /// Both groups at or above this size skip the normality check and rely on
    /// the Central Limit Theorem.
    ///
    /// Default: 30
    pub large_sample_threshold: usize,

    /// Minimum observations per group for a density curve.
    ///
    /// Default: 2
    pub min_curve_sample: usize,

    /// Critical value of the confidence interval, `x̄ ± z·s/√n`.
    ///
    /// Default: 1.96 (normal approximation, regardless of n)
    pub confidence_z: f64,

    /// Abscissae per density curve.
    ///
    /// Default: 1000
    pub curve_points: usize,

    /// Half-width of each density curve in standard errors.
    ///
    /// Default: 4.0
    pub curve_span: f64,

    pub variance_test: VarianceTest,

    pub transform_policy: TransformPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            min_test_sample: 10,
            large_sample_threshold: 30,
            min_curve_sample: 2,
            confidence_z: 1.96,
            curve_points: 1000,
            curve_span: 4.0,
            variance_test: VarianceTest::Levene,
            transform_policy: TransformPolicy::BoxCox,
        }
    }
}

impl AnalysisConfig {
    /// Parses a configuration from TOML; absent keys keep their defaults.
    ///
    /// # Example
    /// ```
    /// use salary_stats::config::{AnalysisConfig, VarianceTest};
    ///
    /// let config = AnalysisConfig::from_toml_str(r#"
    ///     significance_level = 0.01
    ///     variance_test = "bartlett"
    /// "#).unwrap();
    /// assert_eq!(config.significance_level, 0.01);
    /// assert_eq!(config.variance_test, VarianceTest::Bartlett);
    /// assert_eq!(config.curve_points, 1000);
    /// ```
    pub fn from_toml_str(source: &str) -> AnalysisResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }

        // Shapiro–Wilk needs three points, the t-tests two per group.
        if self.min_test_sample < 3 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_test_sample must be >= 3, got {}",
                self.min_test_sample
            )));
        }

        if self.large_sample_threshold < self.min_test_sample {
            return Err(AnalysisError::InvalidConfig(format!(
                "large_sample_threshold ({}) must be >= min_test_sample ({})",
                self.large_sample_threshold, self.min_test_sample
            )));
        }

        if self.min_curve_sample < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_curve_sample must be >= 2, got {}",
                self.min_curve_sample
            )));
        }

        if !(self.confidence_z.is_finite() && self.confidence_z > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "confidence_z must be positive, got {}",
                self.confidence_z
            )));
        }

        if self.curve_points < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "curve_points must be >= 2, got {}",
                self.curve_points
            )));
        }

        if !(self.curve_span.is_finite() && self.curve_span > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "curve_span must be positive, got {}",
                self.curve_span
            )));
        }

        Ok(())
    }
}
