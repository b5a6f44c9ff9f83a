//! # salary-stats
//!
//! Statistical comparison engine for salary survey dashboards.
//!
//! Given survey respondents and a categorical variable (role, career level,
//! experience, gender, race, region), this crate computes per-category
//! descriptives and confidence intervals, decides how to compare the mean
//! salary of two categories, and builds normal-approximation curves of the
//! two means. It renders nothing and loads no files: the presentation layer
//! hands in a [`dataset::Dataset`] and receives plain, serialisable values.
//!
//! ## Modules
//!
//! - [`category`] — Grouping variables and canonical category orders
//! - [`dataset`] — Respondents, age/region filters, ordered group views
//! - [`descriptives`] — Summary table and boxplot statistics per category
//! - [`hypothesis`] — Adaptive two-sample comparison with narrative verdict
//! - [`density`] — Normal curves of two group means
//! - [`testing`] — Shapiro–Wilk, Levene, Bartlett, Student and Welch tests
//! - [`transform`] — Box–Cox and log transforms
//! - [`stats`] — Descriptive statistics with numerical stability guarantees
//! - [`special`] — Normal, gamma, beta and the t/F/χ² tails
//! - [`distributions`] — Normal distribution
//! - [`config`] — Thresholds and procedure choices
//! - [`error`] — Error type
//!
//! ## Design Philosophy
//!
//! - **Pure request/response**: no state between calls, the caller's data
//!   is only ever borrowed
//! - **Always a verdict**: comparisons report insufficient data and numeric
//!   failures as values, never panics
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Kahan summation for accumulation, tail probabilities straight from the
//!   incomplete beta function
//! - **Property-based testing**: Statistical invariants verified via proptest

pub mod category;
pub mod config;
pub mod dataset;
pub mod density;
pub mod descriptives;
pub mod distributions;
pub mod error;
pub mod hypothesis;
pub mod special;
pub mod stats;
pub mod testing;
pub mod transform;

pub use category::Variable;
pub use config::AnalysisConfig;
pub use dataset::{Dataset, Respondent, SurveyFilter};
pub use error::{AnalysisError, AnalysisResult};
pub use hypothesis::{compare, HypothesisVerdict};
