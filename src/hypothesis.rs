//! Adaptive two-sample salary comparison.
//!
//! [`compare`] runs a fixed, linear procedure on the salaries of two
//! categories:
//!
//! 1. **Extract** both samples; each needs `min_test_sample` observations.
//! 2. **Normality**: if either sample is below `large_sample_threshold`,
//!    Shapiro–Wilk on each. Non-normal small samples are transformed
//!    (Box–Cox, or log under [`TransformPolicy::SkewAware`]). Large samples
//!    rely on the Central Limit Theorem.
//! 3. **Variance homogeneity**: Levene (or Bartlett) on the possibly
//!    transformed samples.
//! 4. **Mean comparison**: Student's pooled t-test when variances look
//!    equal, Welch's otherwise.
//! 5. **Decision** at the configured significance level, with a narrative.
//!
//! The caller always gets a [`HypothesisVerdict`]: insufficient data,
//! unknown categories and numeric failures come back as verdicts with a
//! status and an explanation, never as errors.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::category::Variable;
use crate::config::{AnalysisConfig, TransformPolicy, VarianceTest};
use crate::dataset::Dataset;
use crate::error::{AnalysisError, AnalysisResult};
use crate::testing::{self, TestResult};
use crate::transform;

/// p-values below this are reported as "< 0.0001".
pub const P_VALUE_FLOOR: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transformation {
    None,
    Log,
    BoxCox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VarianceAssumption {
    Equal,
    Unequal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    RejectNull,
    FailToRejectNull,
}

/// Which branch of the normality stage the samples took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleRegime {
    /// At least one sample is small; both passed Shapiro–Wilk.
    SmallNormal,
    /// At least one sample is small and one failed Shapiro–Wilk.
    SmallNonNormal,
    /// Both samples are large; normality is not tested.
    LargeClt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerdictStatus {
    Completed,
    InsufficientData,
    UnrecognizedCategory,
    ComputationError,
}

/// Human-readable account of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    /// How the samples were treated, or why no test ran.
    pub context: String,
    pub null_hypothesis: String,
    pub alternative_hypothesis: String,
    /// `"< 0.0001"`, a 4-decimal p-value, or `"n/a"` when no test ran.
    pub p_value_text: String,
    pub conclusion: String,
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.context)?;
        writeln!(f)?;
        writeln!(f, "{}", self.null_hypothesis)?;
        writeln!(f, "{}", self.alternative_hypothesis)?;
        writeln!(f)?;
        write!(f, "{}", self.conclusion)
    }
}

/// Outcome of one two-sample comparison.
///
/// Created fresh per call; holds no reference to the dataset. Fields of
/// stages that were not reached are `None` (or NaN for `p_value`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypothesisVerdict {
    pub status: VerdictStatus,
    pub category_a: String,
    pub category_b: String,
    pub n_a: usize,
    pub n_b: usize,
    pub regime: Option<SampleRegime>,
    pub transformation_applied: Transformation,
    /// Box–Cox exponents `(λ_A, λ_B)` when that transform was applied.
    pub lambdas: Option<(f64, f64)>,
    pub variance_assumption: Option<VarianceAssumption>,
    pub variance_p_value: Option<f64>,
    pub t_statistic: Option<f64>,
    pub df: Option<f64>,
    pub p_value: f64,
    pub decision: Option<Decision>,
    pub narrative: Narrative,
}

impl HypothesisVerdict {
    pub fn is_completed(&self) -> bool {
        self.status == VerdictStatus::Completed
    }

    fn from_error(
        category_a: &str,
        category_b: &str,
        n_a: usize,
        n_b: usize,
        err: &AnalysisError,
    ) -> Self {
        let status = match err {
            AnalysisError::InsufficientData { .. } => VerdictStatus::InsufficientData,
            AnalysisError::UnrecognizedCategory { .. } => VerdictStatus::UnrecognizedCategory,
            _ => VerdictStatus::ComputationError,
        };
        let (null_hypothesis, alternative_hypothesis) = hypotheses(category_a, category_b);

        Self {
            status,
            category_a: category_a.to_string(),
            category_b: category_b.to_string(),
            n_a,
            n_b,
            regime: None,
            transformation_applied: Transformation::None,
            lambdas: None,
            variance_assumption: None,
            variance_p_value: None,
            t_statistic: None,
            df: None,
            p_value: f64::NAN,
            decision: None,
            narrative: Narrative {
                context: err.to_string(),
                null_hypothesis,
                alternative_hypothesis,
                p_value_text: "n/a".to_string(),
                conclusion: format!("No hypothesis test was performed. {err}."),
            },
        }
    }
}

/// Formats a p-value for display: `"< 0.0001"` below [`P_VALUE_FLOOR`],
/// otherwise 4 decimal places.
///
/// # Examples
/// ```
/// use salary_stats::hypothesis::format_p_value;
/// assert_eq!(format_p_value(3.2e-9), "< 0.0001");
/// assert_eq!(format_p_value(0.04567), "0.0457");
/// assert_eq!(format_p_value(0.0001), "0.0001");
/// ```
pub fn format_p_value(p: f64) -> String {
    if p < P_VALUE_FLOOR {
        "< 0.0001".to_string()
    } else {
        format!("{p:.4}")
    }
}

fn hypotheses(a: &str, b: &str) -> (String, String) {
    (format!("H₀: μ_{a} = μ_{b}"), format!("H₁: μ_{a} ≠ μ_{b}"))
}

/// Compares mean salary of two categories with default settings.
///
/// # Examples
/// ```
/// use salary_stats::category::Variable;
/// use salary_stats::dataset::{Dataset, Respondent};
/// use salary_stats::hypothesis::{compare, VerdictStatus};
///
/// let data: Dataset = (0..9)
///     .map(|i| Respondent::new(3000.0 + i as f64, 25.0).with(Variable::Career, "Junior"))
///     .chain((0..50).map(|i| Respondent::new(9000.0 + i as f64, 40.0).with(Variable::Career, "Senior")))
///     .collect();
/// let verdict = compare(Variable::Career, "Junior", "Senior", &data);
/// assert_eq!(verdict.status, VerdictStatus::InsufficientData);
/// assert!(verdict.p_value.is_nan());
/// ```
pub fn compare(
    variable: Variable,
    category_a: &str,
    category_b: &str,
    dataset: &Dataset,
) -> HypothesisVerdict {
    compare_with(variable, category_a, category_b, dataset, &AnalysisConfig::default())
}

/// Compares mean salary of two categories of `variable`.
pub fn compare_with(
    variable: Variable,
    category_a: &str,
    category_b: &str,
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> HypothesisVerdict {
    let a = dataset.salaries(variable, category_a);
    let b = dataset.salaries(variable, category_b);

    for label in [category_a, category_b] {
        if !dataset.has_category(variable, label) {
            let err = AnalysisError::UnrecognizedCategory {
                category: label.to_string(),
            };
            debug!(%variable, category = label, "category absent from data");
            return HypothesisVerdict::from_error(category_a, category_b, a.len(), b.len(), &err);
        }
    }

    debug!(%variable, category_a, category_b, "extracted samples");
    compare_samples_with(category_a, category_b, &a, &b, config)
}

/// Runs the procedure on two raw samples with default settings.
pub fn compare_samples(label_a: &str, label_b: &str, a: &[f64], b: &[f64]) -> HypothesisVerdict {
    compare_samples_with(label_a, label_b, a, b, &AnalysisConfig::default())
}

/// Runs the procedure on two raw samples; non-finite values are dropped.
pub fn compare_samples_with(
    label_a: &str,
    label_b: &str,
    a: &[f64],
    b: &[f64],
    config: &AnalysisConfig,
) -> HypothesisVerdict {
    let a: Vec<f64> = a.iter().copied().filter(|x| x.is_finite()).collect();
    let b: Vec<f64> = b.iter().copied().filter(|x| x.is_finite()).collect();

    match run(label_a, label_b, &a, &b, config) {
        Ok(verdict) => verdict,
        Err(err) => {
            debug!(error = %err, label_a, label_b, "comparison ended early");
            HypothesisVerdict::from_error(label_a, label_b, a.len(), b.len(), &err)
        }
    }
}

/// Samples after the normality stage.
struct Prepared {
    regime: SampleRegime,
    transformation: Transformation,
    lambdas: Option<(f64, f64)>,
    a: Vec<f64>,
    b: Vec<f64>,
}

fn run(
    label_a: &str,
    label_b: &str,
    a: &[f64],
    b: &[f64],
    config: &AnalysisConfig,
) -> AnalysisResult<HypothesisVerdict> {
    config.validate()?;
    let alpha = config.significance_level;

    for (label, sample) in [(label_a, a), (label_b, b)] {
        if sample.len() < config.min_test_sample {
            return Err(AnalysisError::InsufficientData {
                category: label.to_string(),
                found: sample.len(),
                required: config.min_test_sample,
            });
        }
    }

    let prepared = normality_stage(label_a, label_b, a, b, config)?;
    debug!(
        regime = ?prepared.regime,
        transformation = ?prepared.transformation,
        "normality stage done"
    );

    let variance = match config.variance_test {
        VarianceTest::Levene => testing::levene_test(&prepared.a, &prepared.b),
        VarianceTest::Bartlett => testing::bartlett_test(&prepared.a, &prepared.b),
    }
    .ok_or_else(|| {
        AnalysisError::Computation(format!(
            "{:?} test undefined for these samples (zero spread)",
            config.variance_test
        ))
    })?;
    let assumption = if variance.p_value > alpha {
        VarianceAssumption::Equal
    } else {
        VarianceAssumption::Unequal
    };
    debug!(p = variance.p_value, assumption = ?assumption, "variance stage done");

    let t: TestResult = match assumption {
        VarianceAssumption::Equal => testing::student_t_test(&prepared.a, &prepared.b),
        VarianceAssumption::Unequal => testing::welch_t_test(&prepared.a, &prepared.b),
    }
    .ok_or_else(|| {
        AnalysisError::Computation("t-test undefined: both samples are constant".into())
    })?;

    let decision = if t.p_value < alpha {
        Decision::RejectNull
    } else {
        Decision::FailToRejectNull
    };
    debug!(t = t.statistic, df = t.df, p = t.p_value, decision = ?decision, "t-test done");

    let narrative = narrate(
        label_a,
        label_b,
        &prepared,
        config,
        variance.p_value,
        assumption,
        t.p_value,
        decision,
    );

    Ok(HypothesisVerdict {
        status: VerdictStatus::Completed,
        category_a: label_a.to_string(),
        category_b: label_b.to_string(),
        n_a: a.len(),
        n_b: b.len(),
        regime: Some(prepared.regime),
        transformation_applied: prepared.transformation,
        lambdas: prepared.lambdas,
        variance_assumption: Some(assumption),
        variance_p_value: Some(variance.p_value),
        t_statistic: Some(t.statistic),
        df: Some(t.df),
        p_value: t.p_value,
        decision: Some(decision),
        narrative,
    })
}

fn normality_stage(
    label_a: &str,
    label_b: &str,
    a: &[f64],
    b: &[f64],
    config: &AnalysisConfig,
) -> AnalysisResult<Prepared> {
    let small = a.len() < config.large_sample_threshold || b.len() < config.large_sample_threshold;
    if !small {
        return Ok(Prepared {
            regime: SampleRegime::LargeClt,
            transformation: Transformation::None,
            lambdas: None,
            a: a.to_vec(),
            b: b.to_vec(),
        });
    }

    let shapiro = |label: &str, sample: &[f64]| {
        testing::shapiro_wilk_test(sample).ok_or_else(|| {
            let constant = sample.iter().all(|&x| x == sample[0]);
            let cause = if constant {
                "all values identical".to_string()
            } else {
                format!("degenerate sample of {} observations", sample.len())
            };
            AnalysisError::Computation(format!(
                "Shapiro-Wilk test undefined for '{label}' ({cause})"
            ))
        })
    };
    let sw_a = shapiro(label_a, a)?;
    let sw_b = shapiro(label_b, b)?;
    debug!(p_a = sw_a.p_value, p_b = sw_b.p_value, "Shapiro-Wilk done");

    let alpha = config.significance_level;
    if sw_a.p_value >= alpha && sw_b.p_value >= alpha {
        return Ok(Prepared {
            regime: SampleRegime::SmallNormal,
            transformation: Transformation::None,
            lambdas: None,
            a: a.to_vec(),
            b: b.to_vec(),
        });
    }

    let use_log = config.transform_policy == TransformPolicy::SkewAware
        && transform::is_right_skewed(a)
        && transform::is_right_skewed(b);

    if use_log {
        Ok(Prepared {
            regime: SampleRegime::SmallNonNormal,
            transformation: Transformation::Log,
            lambdas: None,
            a: transform::log_transform(a)?,
            b: transform::log_transform(b)?,
        })
    } else {
        let (ta, lambda_a) = transform::box_cox(a)?;
        let (tb, lambda_b) = transform::box_cox(b)?;
        Ok(Prepared {
            regime: SampleRegime::SmallNonNormal,
            transformation: Transformation::BoxCox,
            lambdas: Some((lambda_a, lambda_b)),
            a: ta,
            b: tb,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn narrate(
    label_a: &str,
    label_b: &str,
    prepared: &Prepared,
    config: &AnalysisConfig,
    variance_p: f64,
    assumption: VarianceAssumption,
    p_value: f64,
    decision: Decision,
) -> Narrative {
    let alpha = config.significance_level;
    let treatment = match (prepared.regime, prepared.transformation) {
        (SampleRegime::LargeClt, _) => format!(
            "Large samples detected (at least {} observations per group). The t-test is robust \
             due to the Central Limit Theorem, so no normality test or transformation is needed.",
            config.large_sample_threshold
        ),
        (SampleRegime::SmallNormal, _) => {
            "Small samples with normally distributed data (Shapiro-Wilk); no transformation applied."
                .to_string()
        }
        (SampleRegime::SmallNonNormal, Transformation::Log) => {
            "Small samples and non-normal data. Both groups are right-skewed, so the log \
             transformation is applied before testing."
                .to_string()
        }
        (SampleRegime::SmallNonNormal, _) => match prepared.lambdas {
            Some((la, lb)) => format!(
                "Small samples and non-normal data. Applying the Box-Cox transformation to each \
                 group (λ = {la:.3} for {label_a}, λ = {lb:.3} for {label_b}) before testing."
            ),
            None => "Small samples and non-normal data. Applying the Box-Cox transformation \
                     before testing."
                .to_string(),
        },
    };
    let test_name = match config.variance_test {
        VarianceTest::Levene => "Levene",
        VarianceTest::Bartlett => "Bartlett",
    };
    let variances = match assumption {
        VarianceAssumption::Equal => format!(
            "{test_name}'s test (p = {}) finds no evidence of unequal variances; Student's t-test is used.",
            format_p_value(variance_p)
        ),
        VarianceAssumption::Unequal => format!(
            "{test_name}'s test (p = {}) indicates unequal variances; Welch's t-test is used.",
            format_p_value(variance_p)
        ),
    };

    let p_value_text = format_p_value(p_value);
    let conclusion = match decision {
        Decision::RejectNull if p_value < P_VALUE_FLOOR => format!(
            "The p-value is < 0.0001, very small. At a significance level of {alpha} there is \
             sufficient statistical evidence to reject H₀: the mean salaries of {label_a} and \
             {label_b} differ."
        ),
        Decision::RejectNull => format!(
            "The p-value is {p_value_text}, below the significance level of {alpha}. There is \
             sufficient statistical evidence to reject H₀: the mean salaries of {label_a} and \
             {label_b} differ."
        ),
        Decision::FailToRejectNull => format!(
            "The p-value is {p_value_text}, not below the significance level of {alpha}. There is \
             not enough statistical evidence to reject H₀: the mean salaries of {label_a} and \
             {label_b} cannot be said to differ."
        ),
    };

    let (null_hypothesis, alternative_hypothesis) = hypotheses(label_a, label_b);
    Narrative {
        context: format!("{treatment} {variances}"),
        null_hypothesis,
        alternative_hypothesis,
        p_value_text,
        conclusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Respondent;
    use crate::special::inverse_normal_cdf;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Box–Muller draws from N(mean, sd).
    fn normal_sample(rng: &mut StdRng, mean: f64, sd: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| {
                let u1: f64 = 1.0 - rng.random::<f64>();
                let u2: f64 = rng.random();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                mean + sd * z
            })
            .collect()
    }

    fn normal_scores(n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| inverse_normal_cdf((i as f64 - 0.5) / n as f64))
            .collect()
    }

    fn dataset(groups: Vec<(&str, Vec<f64>)>) -> Dataset {
        let mut rows = Vec::new();
        for (label, salaries) in groups {
            for s in salaries {
                rows.push(Respondent::new(s, 30.0).with(Variable::Career, label));
            }
        }
        Dataset::new(rows)
    }

    fn skewed(scale: f64) -> Vec<f64> {
        [1.0, 1.0, 1.1, 1.1, 1.2, 1.2, 1.3, 1.5, 2.0, 3.0, 8.0, 40.0]
            .iter()
            .map(|x| x * scale)
            .collect()
    }

    #[test]
    fn test_large_samples_clearly_different() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = normal_sample(&mut rng, 5000.0, 500.0, 40);
        let b = normal_sample(&mut rng, 8000.0, 500.0, 40);
        let v = compare_samples("A", "B", &a, &b);

        assert_eq!(v.status, VerdictStatus::Completed);
        assert_eq!(v.regime, Some(SampleRegime::LargeClt));
        assert_eq!(v.transformation_applied, Transformation::None);
        assert_eq!(v.decision, Some(Decision::RejectNull));
        assert!(v.p_value < 1e-4, "p = {}", v.p_value);
        assert_eq!(v.narrative.p_value_text, "< 0.0001");
        assert!(v.narrative.context.contains("Central Limit Theorem"));
    }

    #[test]
    fn test_junior_vs_senior_scenario() {
        let junior: Vec<f64> = normal_scores(12).iter().map(|z| 3100.0 + 150.0 * z).collect();
        let senior: Vec<f64> = normal_scores(12).iter().map(|z| 9100.0 + 150.0 * z).collect();
        let data = dataset(vec![("Junior", junior), ("Senior", senior)]);

        let v = compare(Variable::Career, "Junior", "Senior", &data);
        assert_eq!(v.status, VerdictStatus::Completed);
        assert_eq!((v.n_a, v.n_b), (12, 12));
        assert_eq!(v.regime, Some(SampleRegime::SmallNormal));
        assert_eq!(v.transformation_applied, Transformation::None);
        assert_eq!(v.variance_assumption, Some(VarianceAssumption::Equal));
        assert_eq!(v.decision, Some(Decision::RejectNull));
        assert_eq!(v.narrative.p_value_text, "< 0.0001");
        assert!(v.narrative.null_hypothesis.contains("Junior"));
        assert!(v.narrative.alternative_hypothesis.contains("Senior"));
    }

    #[test]
    fn test_identical_samples() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = normal_sample(&mut rng, 6000.0, 800.0, 35);
        let v = compare_samples("A", "B", &a, &a);
        assert!((v.p_value - 1.0).abs() < 1e-9, "p = {}", v.p_value);
        assert_eq!(v.decision, Some(Decision::FailToRejectNull));
        assert!(v.narrative.conclusion.contains("not enough statistical evidence"));
    }

    #[test]
    fn test_swapping_categories_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(3);
        for (n_a, n_b) in [(12, 15), (40, 45), (10, 60)] {
            let a = normal_sample(&mut rng, 4000.0, 600.0, n_a);
            let b = normal_sample(&mut rng, 4400.0, 900.0, n_b);
            let ab = compare_samples("A", "B", &a, &b);
            let ba = compare_samples("B", "A", &b, &a);
            assert!((ab.p_value - ba.p_value).abs() < 1e-12);
            assert_eq!(ab.decision, ba.decision);
            assert_eq!(ab.t_statistic.map(|t| -t), ba.t_statistic);
        }
    }

    #[test]
    fn test_nine_vs_fifty_is_insufficient() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = normal_sample(&mut rng, 4000.0, 500.0, 9);
        let b = normal_sample(&mut rng, 4000.0, 500.0, 50);
        for v in [compare_samples("A", "B", &a, &b), compare_samples("B", "A", &b, &a)] {
            assert_eq!(v.status, VerdictStatus::InsufficientData);
            assert!(v.p_value.is_nan());
            assert_eq!(v.decision, None);
            assert!(v.narrative.context.contains("9 observations"));
            assert_eq!(v.narrative.p_value_text, "n/a");
        }
    }

    #[test]
    fn test_missing_salaries_do_not_count() {
        let mut a = vec![3000.0; 9];
        a[0] = 3100.0;
        a.push(f64::NAN);
        let b: Vec<f64> = (0..20).map(|i| 5000.0 + 10.0 * i as f64).collect();
        let v = compare_samples("A", "B", &a, &b);
        assert_eq!(v.status, VerdictStatus::InsufficientData);
        assert_eq!(v.n_a, 9);
    }

    #[test]
    fn test_unrecognized_category() {
        let salaries: Vec<f64> = (0..12).map(|i| 3000.0 + 50.0 * i as f64).collect();
        let data = dataset(vec![("Junior", salaries)]);
        let v = compare(Variable::Career, "Junior", "Staff", &data);
        assert_eq!(v.status, VerdictStatus::UnrecognizedCategory);
        assert!(v.narrative.context.contains("Staff"));
        assert!(!v.is_completed());
    }

    #[test]
    fn test_non_positive_salaries_fail_box_cox() {
        let mut a = vec![0.0; 10];
        a.extend([100.0, 5000.0]);
        let b: Vec<f64> = normal_scores(12).iter().map(|z| 4000.0 + 200.0 * z).collect();
        let v = compare_samples("A", "B", &a, &b);
        assert_eq!(v.status, VerdictStatus::ComputationError);
        assert!(v.narrative.context.contains("strictly positive"), "{}", v.narrative.context);
        assert!(v.p_value.is_nan());
    }

    #[test]
    fn test_constant_small_sample_is_computation_error() {
        let a = vec![3000.0; 12];
        let b: Vec<f64> = normal_scores(12).iter().map(|z| 4000.0 + 200.0 * z).collect();
        let v = compare_samples("A", "B", &a, &b);
        assert_eq!(v.status, VerdictStatus::ComputationError);
        assert!(v.narrative.context.contains("all values identical"), "{}", v.narrative.context);
    }

    #[test]
    fn test_small_group_against_very_large_group() {
        let a: Vec<f64> = normal_scores(20).iter().map(|z| 4000.0 + 500.0 * z).collect();
        let b: Vec<f64> = normal_scores(6000).iter().map(|z| 5000.0 + 500.0 * z).collect();
        let v = compare_samples("A", "B", &a, &b);
        assert_eq!(v.status, VerdictStatus::Completed, "{}", v.narrative.context);
        assert_eq!(v.regime, Some(SampleRegime::SmallNormal));
        assert_eq!(v.transformation_applied, Transformation::None);
        assert_eq!(v.decision, Some(Decision::RejectNull));
    }

    #[test]
    fn test_box_cox_uses_unbounded_lambda() {
        // left-skewed groups: MLE exponent lies well above 5
        let a = [
            5000.0, 7600.0, 8200.0, 8500.0, 8700.0, 8800.0, 8850.0, 8900.0, 8950.0, 8980.0,
            9000.0, 9000.5,
        ];
        let b: Vec<f64> = a.iter().map(|x| x * 0.92).collect();
        let v = compare_samples("A", "B", &a, &b);
        assert_eq!(v.status, VerdictStatus::Completed, "{}", v.narrative.context);
        assert_eq!(v.transformation_applied, Transformation::BoxCox);
        let (la, lb) = v.lambdas.unwrap();
        assert!(la > 9.0 && lb > 9.0, "λ = ({la}, {lb})");
        assert!((la - lb).abs() < 1e-4);
    }

    #[test]
    fn test_skewed_small_samples_use_box_cox_by_default() {
        let v = compare_samples("A", "B", &skewed(1000.0), &skewed(3000.0));
        assert_eq!(v.status, VerdictStatus::Completed);
        assert_eq!(v.regime, Some(SampleRegime::SmallNonNormal));
        assert_eq!(v.transformation_applied, Transformation::BoxCox);
        assert!(v.lambdas.is_some());
        assert!(v.narrative.context.contains("Box-Cox"));
    }

    #[test]
    fn test_skew_aware_policy_uses_log() {
        let config = AnalysisConfig {
            transform_policy: TransformPolicy::SkewAware,
            ..AnalysisConfig::default()
        };
        let v = compare_samples_with("A", "B", &skewed(1000.0), &skewed(3000.0), &config);
        assert_eq!(v.status, VerdictStatus::Completed);
        assert_eq!(v.transformation_applied, Transformation::Log);
        assert_eq!(v.lambdas, None);
        // log(3x) = log 3 + log x: same spread, shifted mean
        assert_eq!(v.variance_assumption, Some(VarianceAssumption::Equal));
        assert_eq!(v.decision, Some(Decision::RejectNull));
    }

    #[test]
    fn test_bartlett_policy() {
        let mut rng = StdRng::seed_from_u64(21);
        let a = normal_sample(&mut rng, 5000.0, 300.0, 40);
        let b = normal_sample(&mut rng, 5100.0, 900.0, 40);
        let config = AnalysisConfig {
            variance_test: VarianceTest::Bartlett,
            ..AnalysisConfig::default()
        };
        let v = compare_samples_with("A", "B", &a, &b, &config);
        let expected = testing::bartlett_test(&a, &b).unwrap();
        assert_eq!(v.variance_p_value, Some(expected.p_value));
        assert_eq!(v.variance_assumption, Some(VarianceAssumption::Unequal));
        assert!(v.narrative.context.contains("Welch"));
        assert!(v.narrative.context.contains("Bartlett"));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = AnalysisConfig {
            significance_level: 2.0,
            ..AnalysisConfig::default()
        };
        let v = compare_samples_with("A", "B", &[1.0; 20], &[2.0; 20], &config);
        assert_eq!(v.status, VerdictStatus::ComputationError);
        assert!(v.narrative.context.contains("significance_level"));
    }

    #[test]
    fn test_narrative_display() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = normal_sample(&mut rng, 5000.0, 500.0, 30);
        let b = normal_sample(&mut rng, 5050.0, 500.0, 30);
        let v = compare_samples("Male", "Female", &a, &b);
        let text = v.narrative.to_string();
        assert!(text.contains("H₀: μ_Male = μ_Female"));
        assert!(text.contains("H₁: μ_Male ≠ μ_Female"));
        assert!(text.ends_with(&v.narrative.conclusion));
    }

    #[test]
    fn test_verdict_serializes() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = normal_sample(&mut rng, 5000.0, 500.0, 40);
        let b = normal_sample(&mut rng, 8000.0, 500.0, 40);
        let json = serde_json::to_value(compare_samples("A", "B", &a, &b)).unwrap();
        assert_eq!(json["status"], "Completed");
        assert_eq!(json["transformation_applied"], "None");
        assert_eq!(json["decision"], "RejectNull");
        assert_eq!(json["narrative"]["p_value_text"], "< 0.0001");

        let failed = serde_json::to_value(compare_samples("A", "B", &[1.0], &[2.0])).unwrap();
        assert!(failed["p_value"].is_null());
        assert_eq!(failed["status"], "InsufficientData");
    }

    #[test]
    fn test_format_p_value() {
        assert_eq!(format_p_value(0.0), "< 0.0001");
        assert_eq!(format_p_value(0.00009999), "< 0.0001");
        assert_eq!(format_p_value(0.05), "0.0500");
        assert_eq!(format_p_value(1.0), "1.0000");
    }
}
