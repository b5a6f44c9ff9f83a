//! Grouping variables and their canonical category orderings.
//!
//! Every survey variable with a natural display order maps to a fixed label
//! sequence; the order drives table rows, plot positions and colour
//! assignment. Variables without one fall back to the order in which labels
//! first appear in the data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Categorical survey variable a salary comparison can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    Role,
    Career,
    Gender,
    Race,
    Experience,
    /// Brazilian state of residence; has no canonical ordering.
    Region,
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::Role,
        Variable::Career,
        Variable::Gender,
        Variable::Race,
        Variable::Experience,
        Variable::Region,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variable::Role => "role",
            Variable::Career => "career",
            Variable::Gender => "gender",
            Variable::Race => "race",
            Variable::Experience => "experience",
            Variable::Region => "region",
        }
    }

    /// Canonical label order, or an empty slice when the variable has none.
    ///
    /// # Examples
    /// ```
    /// use salary_stats::category::Variable;
    /// assert_eq!(Variable::Career.canonical_order(), ["Junior", "Mid", "Senior"]);
    /// assert!(Variable::Region.canonical_order().is_empty());
    /// ```
    pub fn canonical_order(self) -> &'static [&'static str] {
        match self {
            Variable::Role => &[
                "Data Engineer",
                "Data Analyst",
                "Data Scientist",
                "BI Analyst",
                "Other",
            ],
            Variable::Experience => &["Up to 2y", "3–4y", "4–6y", "7–10y", ">10y"],
            Variable::Gender => &["Male", "Female", "Other"],
            Variable::Race => &[
                "Mixed",
                "White",
                "Black",
                "Asian",
                "Indigenous",
                "Other",
                "Not informed",
            ],
            Variable::Career => &["Junior", "Mid", "Senior"],
            Variable::Region => &[],
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = AnalysisError;

    /// Accepts the English names (any case) and the survey's own column
    /// headers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let variable = match trimmed.to_lowercase().as_str() {
            "role" | "cargo" => Variable::Role,
            "career" | "carreira" => Variable::Career,
            "gender" | "genero" | "gênero" => Variable::Gender,
            "race" | "raça" | "raca" => Variable::Race,
            "experience" | "experiencia" | "experiência" => Variable::Experience,
            "region" | "estados" | "estado" => Variable::Region,
            _ => return Err(AnalysisError::UnrecognizedVariable(trimmed.to_string())),
        };
        Ok(variable)
    }
}

/// Canonical order for a variable given by name; empty for names that are
/// not recognised, signalling the caller to use data-discovered order.
///
/// # Examples
/// ```
/// use salary_stats::category::order_for_name;
/// assert_eq!(order_for_name("Genero"), ["Male", "Female", "Other"]);
/// assert!(order_for_name("favourite_editor").is_empty());
/// ```
pub fn order_for_name(name: &str) -> &'static [&'static str] {
    name.parse::<Variable>()
        .map(Variable::canonical_order)
        .unwrap_or(&[])
}

/// Orders observed labels for display.
///
/// With a canonical order, returns the canonical labels that were observed
/// (absent ones omitted, labels outside the canonical list dropped).
/// Without one, returns the observed labels as given.
pub fn arrange<'a>(variable: Variable, observed: &[&'a str]) -> Vec<&'a str> {
    let canonical = variable.canonical_order();
    if canonical.is_empty() {
        return observed.to_vec();
    }
    canonical
        .iter()
        .filter_map(|label| observed.iter().find(|o| **o == *label).copied())
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn arrange_is_subsequence_of_canonical(
            picks in proptest::collection::vec(0_usize..7, 0..12),
        ) {
            let canonical = Variable::Race.canonical_order();
            let observed: Vec<&str> = picks.iter().map(|&i| canonical[i]).collect();
            let arranged = arrange(Variable::Race, &observed);

            let positions: Vec<usize> = arranged
                .iter()
                .map(|l| canonical.iter().position(|c| c == l).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            for label in &observed {
                prop_assert!(arranged.contains(label));
            }
        }
    }
}
