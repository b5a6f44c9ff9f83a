//! Normalising transforms for small non-normal salary samples.
//!
//! Salary distributions are right-skewed; before a t-test on small groups
//! they are pulled towards normality either with a Box–Cox power transform
//! (each sample with its own maximum-likelihood λ) or with a plain log.
//! Both are only defined for strictly positive data and fail loudly
//! otherwise.

use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::{self, WelfordAccumulator};

/// Starting bracket for the Box–Cox exponent search. The search expands
/// beyond it until the likelihood peak is enclosed.
pub const LAMBDA_START: (f64, f64) = (-2.0, 2.0);

const GOLDEN_GROWTH: f64 = 1.618_033_988_749_895;
const BRACKET_MAX_ITER: usize = 100;
const GOLDEN_TOL: f64 = 1e-10;
const GOLDEN_MAX_ITER: usize = 300;

fn check_positive(data: &[f64]) -> AnalysisResult<()> {
    if data.len() < 2 {
        return Err(AnalysisError::Computation(format!(
            "transform needs at least 2 observations, got {}",
            data.len()
        )));
    }
    if let Some(bad) = data.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
        return Err(AnalysisError::Computation(format!(
            "transform requires strictly positive finite data, found {bad}"
        )));
    }
    let first = data[0];
    if data.iter().all(|&x| x == first) {
        return Err(AnalysisError::Computation(format!(
            "transform undefined for constant data (all values {first})"
        )));
    }
    Ok(())
}

/// Box–Cox profile log-likelihood at `lambda`:
/// `(λ − 1) Σ ln xᵢ − n/2 · ln σ̂²(y)` with σ̂² the population variance of
/// the transformed data.
///
/// The variance is computed on `expm1(λ(ln x − c))` with `c` the mean log, so
/// extreme exponents neither overflow nor cancel. Returns `-∞` where the
/// likelihood is not representable.
pub fn box_cox_llf(data: &[f64], lambda: f64) -> f64 {
    let logs: Vec<f64> = data.iter().map(|x| x.ln()).collect();
    let n = logs.len() as f64;
    let sum_log = stats::kahan_sum(&logs);
    let center = sum_log / n;

    let ln_var = if lambda == 0.0 {
        WelfordAccumulator::from_slice(&logs)
            .population_variance()
            .map(f64::ln)
    } else {
        let mut acc = WelfordAccumulator::new();
        for &l in &logs {
            acc.update((lambda * (l - center)).exp_m1());
        }
        // var(x^λ/λ) = var(e^{λ(ln x − c)}) · e^{2λc} / λ²
        acc.population_variance()
            .map(|v| v.ln() + 2.0 * lambda * center - 2.0 * lambda.abs().ln())
    };

    match ln_var {
        Some(lv) if lv.is_finite() => (lambda - 1.0) * sum_log - n / 2.0 * lv,
        _ => f64::NEG_INFINITY,
    }
}

/// Walks downhill from `start` with golden-ratio steps until `cost` rises
/// again, returning an interval that encloses a local minimum.
fn bracket_minimum<F>(cost: &F, start: (f64, f64)) -> AnalysisResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = start;
    let mut fa = cost(a);
    let mut fb = cost(b);
    if fb > fa {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = b + GOLDEN_GROWTH * (b - a);
    let mut fc = cost(c);
    for _ in 0..BRACKET_MAX_ITER {
        if fc >= fb {
            return Ok((a.min(c), a.max(c)));
        }
        a = b;
        b = c;
        fb = fc;
        c = b + GOLDEN_GROWTH * (b - a);
        fc = cost(c);
    }

    Err(AnalysisError::Computation(format!(
        "Box-Cox likelihood still increasing at lambda = {c}"
    )))
}

/// Maximum-likelihood Box–Cox exponent.
///
/// The peak of the profile log-likelihood is first bracketed by expanding
/// outwards from [`LAMBDA_START`], so λ is not confined to any fixed range,
/// then located by golden section search.
///
/// # Errors
/// `Computation` for fewer than 2 observations, non-positive, non-finite or
/// constant data, or if no peak is found.
pub fn box_cox_lambda(data: &[f64]) -> AnalysisResult<f64> {
    check_positive(data)?;

    let cost = |lambda: f64| {
        let llf = box_cox_llf(data, lambda);
        if llf.is_nan() {
            f64::INFINITY
        } else {
            -llf
        }
    };

    let (mut a, mut b) = bracket_minimum(&cost, LAMBDA_START)?;

    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let inv_phi2 = 1.0 - inv_phi;

    let mut x1 = a + inv_phi2 * (b - a);
    let mut x2 = a + inv_phi * (b - a);
    let mut f1 = cost(x1);
    let mut f2 = cost(x2);

    for _ in 0..GOLDEN_MAX_ITER {
        let tol = GOLDEN_TOL * a.abs().max(b.abs()).max(1.0);
        if b - a < tol {
            return Ok(0.5 * (a + b));
        }
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + inv_phi2 * (b - a);
            f1 = cost(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + inv_phi * (b - a);
            f2 = cost(x2);
        }
    }

    Err(AnalysisError::Computation(format!(
        "Box-Cox lambda search did not converge after {GOLDEN_MAX_ITER} iterations"
    )))
}

/// Applies the Box–Cox transform with a fixed exponent:
/// `(x^λ − 1)/λ`, or `ln x` when `λ = 0`.
///
/// # Errors
/// `Computation` on non-positive or non-finite data.
pub fn box_cox_with_lambda(data: &[f64], lambda: f64) -> AnalysisResult<Vec<f64>> {
    if let Some(bad) = data.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
        return Err(AnalysisError::Computation(format!(
            "Box-Cox requires strictly positive finite data, found {bad}"
        )));
    }
    Ok(data
        .iter()
        .map(|&x| {
            if lambda == 0.0 {
                x.ln()
            } else {
                (lambda * x.ln()).exp_m1() / lambda
            }
        })
        .collect())
}

/// Box–Cox transform with the sample's own maximum-likelihood λ.
///
/// Returns the transformed data and the λ used.
///
/// # Examples
/// ```
/// use salary_stats::transform::box_cox;
///
/// let data = [1200.0, 1500.0, 1800.0, 2500.0, 3900.0, 8000.0, 15000.0];
/// let (y, lambda) = box_cox(&data).unwrap();
/// assert_eq!(y.len(), data.len());
/// assert!(lambda.is_finite());
/// assert!(box_cox(&[0.0, 1.0, 2.0]).is_err());
/// ```
pub fn box_cox(data: &[f64]) -> AnalysisResult<(Vec<f64>, f64)> {
    let lambda = box_cox_lambda(data)?;
    let transformed = box_cox_with_lambda(data, lambda)?;
    Ok((transformed, lambda))
}

/// Natural log of every observation.
///
/// # Errors
/// `Computation` for fewer than 2 observations, non-positive, non-finite or
/// constant data.
pub fn log_transform(data: &[f64]) -> AnalysisResult<Vec<f64>> {
    check_positive(data)?;
    Ok(data.iter().map(|x| x.ln()).collect())
}

/// `true` when the sample mean exceeds the median (right skew).
pub fn is_right_skewed(data: &[f64]) -> bool {
    match (stats::mean(data), stats::median(data)) {
        (Some(mean), Some(median)) => mean > median,
        _ => false,
    }
}
