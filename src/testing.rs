//! Hypothesis test primitives.
//!
//! The building blocks of the adaptive comparison: a normality test, two
//! variance-homogeneity tests and the two independent-sample t-tests.
//! Every function returns `None` on degenerate input (too few observations,
//! non-finite values, zero variance) instead of a meaningless statistic.
//!
//! # Examples
//!
//! ```
//! use salary_stats::testing::{levene_test, student_t_test};
//!
//! let a = [5.1, 4.9, 5.2, 5.0, 4.8];
//! let b = [7.1, 6.9, 7.2, 7.0, 6.8];
//! assert!(levene_test(&a, &b).unwrap().p_value > 0.05);
//! assert!(student_t_test(&a, &b).unwrap().p_value < 0.01);
//! ```

use serde::Serialize;

use crate::special;
use crate::stats;

/// Result of a hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    /// Test statistic (t, F or χ² depending on test).
    pub statistic: f64,
    /// Degrees of freedom (fractional for Welch; numerator df for F tests).
    pub df: f64,
    /// p-value.
    pub p_value: f64,
}

fn all_finite(data: &[f64]) -> bool {
    data.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// t-tests
// ---------------------------------------------------------------------------

/// Student's two-sample t-test with pooled variance: H₀: μ₁ = μ₂.
///
/// # Algorithm
///
/// s²ₚ = ((n₁−1)s₁² + (n₂−1)s₂²) / (n₁+n₂−2),
/// t = (x̄₁ − x̄₂) / √(s²ₚ(1/n₁ + 1/n₂)), df = n₁+n₂−2.
///
/// # Returns
///
/// `None` if either sample has fewer than 2 observations, values are not
/// finite, or both samples are constant.
///
/// # Examples
///
/// ```
/// use salary_stats::testing::student_t_test;
///
/// let a = [3000.0, 3200.0, 3100.0, 2900.0];
/// let b = [3000.0, 3200.0, 3100.0, 2900.0];
/// let r = student_t_test(&a, &b).unwrap();
/// assert_eq!(r.statistic, 0.0);
/// assert_eq!(r.p_value, 1.0);
/// ```
pub fn student_t_test(a: &[f64], b: &[f64]) -> Option<TestResult> {
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 || !all_finite(a) || !all_finite(b) {
        return None;
    }

    let mean1 = stats::mean(a)?;
    let mean2 = stats::mean(b)?;
    let var1 = stats::variance(a)?;
    let var2 = stats::variance(b)?;

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let df = n1f + n2f - 2.0;

    let pooled = ((n1f - 1.0) * var1 + (n2f - 1.0) * var2) / df;
    let se_sq = pooled * (1.0 / n1f + 1.0 / n2f);
    if se_sq < 1e-300 {
        return None;
    }

    let t = (mean1 - mean2) / se_sq.sqrt();

    Some(TestResult {
        statistic: t,
        df,
        p_value: special::t_two_sided_p(t, df),
    })
}

/// Welch's two-sample t-test: H₀: μ₁ = μ₂ (unequal variances).
///
/// # Algorithm
///
/// t = (x̄₁ − x̄₂) / √(s₁²/n₁ + s₂²/n₂),
/// df by the Welch–Satterthwaite approximation.
///
/// # Returns
///
/// `None` if either sample has fewer than 2 observations, values are not
/// finite, or both samples are constant.
///
/// # References
///
/// Welch (1947). "The generalization of Student's problem when several
/// different population variances are involved". Biometrika, 34, 28–35.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<TestResult> {
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 || !all_finite(a) || !all_finite(b) {
        return None;
    }

    let mean1 = stats::mean(a)?;
    let mean2 = stats::mean(b)?;
    let v1 = stats::variance(a)? / n1 as f64;
    let v2 = stats::variance(b)? / n2 as f64;

    let se_sq = v1 + v2;
    if se_sq < 1e-300 {
        return None;
    }

    let t = (mean1 - mean2) / se_sq.sqrt();
    let df = se_sq * se_sq / (v1 * v1 / (n1 as f64 - 1.0) + v2 * v2 / (n2 as f64 - 1.0));

    Some(TestResult {
        statistic: t,
        df,
        p_value: special::t_two_sided_p(t, df),
    })
}

// ---------------------------------------------------------------------------
// Variance homogeneity
// ---------------------------------------------------------------------------

/// Result of one-way ANOVA.
#[derive(Debug, Clone)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub p_value: f64,
}

/// One-way ANOVA: H₀: all group means are equal.
///
/// Only used here as the engine of [`levene_test`].
///
/// # Returns
///
/// `None` if fewer than 2 groups, any group has fewer than 2 observations,
/// values are not finite, or the within-group variance is zero.
pub fn one_way_anova(groups: &[&[f64]]) -> Option<AnovaResult> {
    let k = groups.len();
    if k < 2 {
        return None;
    }
    if groups.iter().any(|g| g.len() < 2 || !all_finite(g)) {
        return None;
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let group_means: Vec<f64> = groups
        .iter()
        .map(|g| stats::mean(g))
        .collect::<Option<_>>()?;
    let grand_mean = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &m)| g.len() as f64 * m)
        .sum::<f64>()
        / total_n as f64;

    let ss_between: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &m)| g.len() as f64 * (m - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &m)| g.iter().map(|&x| (x - m).powi(2)).sum::<f64>())
        .sum();

    let df_between = k - 1;
    let df_within = total_n - k;

    let ms_within = ss_within / df_within as f64;
    if ms_within < 1e-300 {
        return None;
    }
    let f_statistic = (ss_between / df_between as f64) / ms_within;

    Some(AnovaResult {
        f_statistic,
        df_between,
        df_within,
        p_value: special::f_distribution_sf(f_statistic, df_between as f64, df_within as f64),
    })
}

/// Levene's test for equal variances of two samples, median-centred
/// (Brown–Forsythe variant).
///
/// # Algorithm
///
/// zᵢⱼ = |xᵢⱼ − median(xᵢ)|, then one-way ANOVA on the z-values.
///
/// # References
///
/// - Levene (1960). "Robust tests for equality of variances". In
///   Olkin (Ed.), Contributions to Probability and Statistics.
/// - Brown & Forsythe (1974). "Robust tests for the equality of variances".
///   JASA, 69(346), 364–367.
///
/// # Examples
///
/// ```
/// use salary_stats::testing::levene_test;
///
/// let tight = [4.9, 5.0, 5.0, 5.1, 5.0, 4.95];
/// let wide = [0.0, 3.0, 5.0, 7.0, 10.0, 12.0];
/// assert!(levene_test(&tight, &wide).unwrap().p_value < 0.05);
/// ```
pub fn levene_test(a: &[f64], b: &[f64]) -> Option<TestResult> {
    let deviations = |g: &[f64]| -> Option<Vec<f64>> {
        let median = stats::median(g)?;
        Some(g.iter().map(|&x| (x - median).abs()).collect())
    };
    let za = deviations(a)?;
    let zb = deviations(b)?;

    let anova = one_way_anova(&[&za, &zb])?;

    Some(TestResult {
        statistic: anova.f_statistic,
        df: anova.df_between as f64,
        p_value: anova.p_value,
    })
}

/// Bartlett's test for equal variances of two samples.
///
/// # Algorithm
///
/// T = ((N−k) ln s²ₚ − Σ(nᵢ−1) ln s²ᵢ) / C, compared with χ²(k−1).
///
/// # Returns
///
/// `None` for fewer than 2 observations in a group, non-finite values or a
/// zero-variance group.
///
/// # References
///
/// Bartlett (1937). "Properties of sufficiency and statistical tests".
/// Proceedings of the Royal Society A, 160(901), 268–282.
pub fn bartlett_test(a: &[f64], b: &[f64]) -> Option<TestResult> {
    let groups = [a, b];
    let k = groups.len();

    let mut sizes = Vec::with_capacity(k);
    let mut vars = Vec::with_capacity(k);
    for g in groups {
        if g.len() < 2 || !all_finite(g) {
            return None;
        }
        let v = stats::variance(g)?;
        if v <= 0.0 {
            return None;
        }
        sizes.push(g.len() as f64);
        vars.push(v);
    }

    let nk: f64 = sizes.iter().sum::<f64>() - k as f64;
    let pooled = sizes
        .iter()
        .zip(&vars)
        .map(|(&n, &v)| (n - 1.0) * v)
        .sum::<f64>()
        / nk;

    let num = nk * pooled.ln()
        - sizes
            .iter()
            .zip(&vars)
            .map(|(&n, &v)| (n - 1.0) * v.ln())
            .sum::<f64>();
    let sum_recip: f64 = sizes.iter().map(|&n| 1.0 / (n - 1.0)).sum();
    let c = 1.0 + (sum_recip - 1.0 / nk) / (3.0 * (k as f64 - 1.0));

    let statistic = num / c;
    let df = (k - 1) as f64;

    Some(TestResult {
        statistic,
        df,
        p_value: special::chi_squared_sf(statistic, df),
    })
}

// ---------------------------------------------------------------------------
// Normality
// ---------------------------------------------------------------------------

/// Result of the Shapiro-Wilk normality test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapiroWilkResult {
    /// The W statistic (0 < W ≤ 1). Values close to 1 suggest normality.
    pub w: f64,
    /// Small values reject the null hypothesis of normality.
    pub p_value: f64,
}

/// Shapiro-Wilk normality test: H₀: data is normally distributed.
///
/// # Algorithm
///
/// Royston's approximation (AS R94):
/// 1. Coefficients from Blom scores of the normal order statistics, with
///    polynomial corrections for the extreme ones
/// 2. W = (Σ aᵢ (x₍ₙ₊₁₋ᵢ₎ − x₍ᵢ₎))² / Σ (xᵢ − x̄)²
/// 3. ln(1 − W) normalised by n-dependent polynomials; p from Φ
///
/// # Returns
///
/// `None` if n < 3, all values identical, or non-finite values.
///
/// Royston's p-value approximation is calibrated for n ≤ 5000; larger
/// samples still get a result, with a less exact p-value.
///
/// # References
///
/// - Shapiro & Wilk (1965). "An analysis of variance test for normality".
///   Biometrika, 52(3–4), 591–611.
/// - Royston (1995). "Remark AS R94: A remark on Algorithm AS 181".
///   Applied Statistics, 44(4), 547–551.
///
/// # Examples
///
/// ```
/// use salary_stats::testing::shapiro_wilk_test;
///
/// let data = [-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5];
/// let r = shapiro_wilk_test(&data).unwrap();
/// assert!(r.w > 0.9);
/// assert!(r.p_value > 0.05);
/// ```
pub fn shapiro_wilk_test(data: &[f64]) -> Option<ShapiroWilkResult> {
    let n = data.len();
    if n < 3 || !all_finite(data) {
        return None;
    }

    let x = stats::sorted_copy(data)?;
    if x[n - 1] - x[0] < 1e-300 {
        return None;
    }

    let mean = stats::mean(&x)?;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    if ss < 1e-300 {
        return None;
    }

    if n == 3 {
        let numerator = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
        let w = (numerator * numerator / ss).clamp(0.75, 1.0);
        // Exact: p = 1 − (6/π) arccos(√W)
        let p = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
        return Some(ShapiroWilkResult {
            w,
            p_value: p.clamp(0.0, 1.0),
        });
    }

    let a = sw_coefficients(n)?;
    let sa: f64 = a
        .iter()
        .enumerate()
        .map(|(i, &ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();
    let w = sa * sa / ss;
    if !(0.0..=1.0 + 1e-10).contains(&w) {
        return None;
    }
    let w = w.min(1.0);

    Some(ShapiroWilkResult {
        w,
        p_value: sw_p_value(w, n).clamp(0.0, 1.0),
    })
}

// Royston polynomial coefficients (AS R94)
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

// c[0] + c[1]·x + c[2]·x² + … (Horner)
fn sw_poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Upper-half coefficients a₁..a₍ₙ/₂₎ for n ≥ 4.
fn sw_coefficients(n: usize) -> Option<Vec<f64>> {
    let half = n / 2;
    let nf = n as f64;

    // Blom scores, lower half (negative)
    let m: Vec<f64> = (0..half)
        .map(|i| special::inverse_normal_cdf((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let a1 = sw_poly(&SW_C1, rsn) - m[0] / ssumm2;

    // n ≤ 5 corrects one extreme coefficient, larger n corrects two
    let corrected = if n <= 5 { 1 } else { 2 };
    let mut a = vec![0.0; half];
    a[0] = a1;
    let (fac_sq, one_minus) = if corrected == 1 {
        (summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1)
    } else {
        let a2 = -m[1] / ssumm2 + sw_poly(&SW_C2, rsn);
        a[1] = a2;
        (
            summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
            1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
        )
    };
    if fac_sq <= 0.0 || one_minus <= 0.0 {
        return None;
    }

    let fac = (fac_sq / one_minus).sqrt();
    for (ai, mi) in a.iter_mut().zip(&m).skip(corrected) {
        *ai = -mi / fac;
    }
    Some(a)
}

fn sw_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    let z = if n <= 11 {
        let gamma = sw_poly(&SW_G, nf);
        if y >= gamma {
            return 0.0;
        }
        let y2 = -(gamma - y).ln();
        (y2 - sw_poly(&SW_C3, nf)) / sw_poly(&SW_C4, nf).exp()
    } else {
        let ln_n = nf.ln();
        (y - sw_poly(&SW_C5, ln_n)) / sw_poly(&SW_C6, ln_n).exp()
    };
    1.0 - special::standard_normal_cdf(z)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn salaries(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(1000.0_f64..30_000.0, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn t_tests_symmetric(a in salaries(2, 40), b in salaries(2, 40)) {
            if let (Some(ab), Some(ba)) = (welch_t_test(&a, &b), welch_t_test(&b, &a)) {
                prop_assert!((ab.p_value - ba.p_value).abs() < 1e-12);
            }
            if let (Some(ab), Some(ba)) = (student_t_test(&a, &b), student_t_test(&b, &a)) {
                prop_assert!((ab.p_value - ba.p_value).abs() < 1e-12);
            }
        }

        #[test]
        fn variance_tests_p_in_unit_interval(a in salaries(3, 40), b in salaries(3, 40)) {
            if let Some(r) = levene_test(&a, &b) {
                prop_assert!((0.0..=1.0).contains(&r.p_value));
                prop_assert!(r.statistic >= 0.0);
            }
            if let Some(r) = bartlett_test(&a, &b) {
                prop_assert!((0.0..=1.0).contains(&r.p_value));
            }
        }

        #[test]
        fn shapiro_w_in_unit_interval(data in salaries(3, 60)) {
            if let Some(r) = shapiro_wilk_test(&data) {
                prop_assert!(r.w > 0.0 && r.w <= 1.0, "W = {}", r.w);
                prop_assert!((0.0..=1.0).contains(&r.p_value));
            }
        }
    }
}
