//! Survey respondents, filtering and ordered group views.
//!
//! A [`Dataset`] belongs to the caller. Every analysis borrows it and builds
//! whatever ordering it needs as a fresh [`OrderedView`], so nothing about
//! one call leaks into the next.

use serde::{Deserialize, Serialize};

use crate::category::{self, Variable};

/// One survey answer, already cleaned (salary and age parsed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Respondent {
    pub salary: f64,
    pub age: f64,
    pub region: Option<String>,
    pub role: Option<String>,
    pub career: Option<String>,
    pub gender: Option<String>,
    pub race: Option<String>,
    pub experience: Option<String>,
}

impl Respondent {
    /// A respondent with no categorical answers.
    pub fn new(salary: f64, age: f64) -> Self {
        Self {
            salary,
            age,
            region: None,
            role: None,
            career: None,
            gender: None,
            race: None,
            experience: None,
        }
    }

    /// Sets the label for `variable`.
    ///
    /// # Examples
    /// ```
    /// use salary_stats::category::Variable;
    /// use salary_stats::dataset::Respondent;
    ///
    /// let r = Respondent::new(4500.0, 29.0).with(Variable::Career, "Mid");
    /// assert_eq!(r.label(Variable::Career), Some("Mid"));
    /// assert_eq!(r.label(Variable::Role), None);
    /// ```
    pub fn with(mut self, variable: Variable, label: impl Into<String>) -> Self {
        *self.slot_mut(variable) = Some(label.into());
        self
    }

    pub fn label(&self, variable: Variable) -> Option<&str> {
        let slot = match variable {
            Variable::Role => &self.role,
            Variable::Career => &self.career,
            Variable::Gender => &self.gender,
            Variable::Race => &self.race,
            Variable::Experience => &self.experience,
            Variable::Region => &self.region,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, variable: Variable) -> &mut Option<String> {
        match variable {
            Variable::Role => &mut self.role,
            Variable::Career => &mut self.career,
            Variable::Gender => &mut self.gender,
            Variable::Race => &mut self.race,
            Variable::Experience => &mut self.experience,
            Variable::Region => &mut self.region,
        }
    }
}

/// Age and region restriction applied before any analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyFilter {
    /// Inclusive `(min, max)` age; `None` keeps every age.
    pub age_range: Option<(f64, f64)>,
    /// Regions to keep; empty keeps every region.
    pub regions: Vec<String>,
}

impl SurveyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_age_range(mut self, min: f64, max: f64) -> Self {
        self.age_range = Some((min, max));
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, respondent: &Respondent) -> bool {
        let age_ok = self
            .age_range
            .is_none_or(|(min, max)| respondent.age >= min && respondent.age <= max);
        let region_ok = self.regions.is_empty()
            || respondent
                .region
                .as_deref()
                .is_some_and(|r| self.regions.iter().any(|allowed| allowed == r));
        age_ok && region_ok
    }
}

/// Respondents of one category inside an [`OrderedView`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub label: &'a str,
    /// Finite salaries of the category, in data order.
    pub salaries: Vec<f64>,
}

/// Groups of a dataset under one variable, in display order.
///
/// Categories without rows are omitted; for variables with a canonical
/// order, labels outside it are excluded here but stay in the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedView<'a> {
    pub variable: Variable,
    pub groups: Vec<CategoryGroup<'a>>,
}

impl<'a> OrderedView<'a> {
    pub fn labels(&self) -> Vec<&'a str> {
        self.groups.iter().map(|g| g.label).collect()
    }

    pub fn get(&self, label: &str) -> Option<&CategoryGroup<'a>> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// Collection of survey respondents owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    respondents: Vec<Respondent>,
}

impl Dataset {
    pub fn new(respondents: Vec<Respondent>) -> Self {
        Self { respondents }
    }

    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Respondent> {
        self.respondents.iter()
    }

    /// New dataset with the respondents `filter` keeps; `self` is untouched.
    pub fn filtered(&self, filter: &SurveyFilter) -> Dataset {
        self.iter().filter(|r| filter.matches(r)).cloned().collect()
    }

    /// Smallest and largest finite age, used to seed an age filter.
    pub fn age_bounds(&self) -> Option<(f64, f64)> {
        self.iter()
            .map(|r| r.age)
            .filter(|a| a.is_finite())
            .fold(None, |acc, age| match acc {
                None => Some((age, age)),
                Some((lo, hi)) => Some((lo.min(age), hi.max(age))),
            })
    }

    /// Distinct labels of `variable` in first-appearance order.
    pub fn categories(&self, variable: Variable) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for label in self.iter().filter_map(|r| r.label(variable)) {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        seen
    }

    /// `true` if at least one respondent carries `label` for `variable`.
    pub fn has_category(&self, variable: Variable, label: &str) -> bool {
        self.iter().any(|r| r.label(variable) == Some(label))
    }

    /// Finite salaries of the respondents in one category.
    ///
    /// # Examples
    /// ```
    /// use salary_stats::category::Variable;
    /// use salary_stats::dataset::{Dataset, Respondent};
    ///
    /// let data: Dataset = [
    ///     Respondent::new(3000.0, 24.0).with(Variable::Career, "Junior"),
    ///     Respondent::new(f64::NAN, 25.0).with(Variable::Career, "Junior"),
    ///     Respondent::new(9000.0, 41.0).with(Variable::Career, "Senior"),
    /// ]
    /// .into_iter()
    /// .collect();
    /// assert_eq!(data.salaries(Variable::Career, "Junior"), vec![3000.0]);
    /// ```
    pub fn salaries(&self, variable: Variable, label: &str) -> Vec<f64> {
        self.iter()
            .filter(|r| r.label(variable) == Some(label))
            .map(|r| r.salary)
            .filter(|s| s.is_finite())
            .collect()
    }

    /// Groups the dataset by `variable` in canonical order, or in
    /// first-appearance order when the variable has none.
    pub fn ordered_view(&self, variable: Variable) -> OrderedView<'_> {
        let mut observed: Vec<CategoryGroup<'_>> = Vec::new();
        for respondent in self.iter() {
            let Some(label) = respondent.label(variable) else {
                continue;
            };
            let idx = match observed.iter().position(|g| g.label == label) {
                Some(idx) => idx,
                None => {
                    observed.push(CategoryGroup {
                        label,
                        salaries: Vec::new(),
                    });
                    observed.len() - 1
                }
            };
            if respondent.salary.is_finite() {
                observed[idx].salaries.push(respondent.salary);
            }
        }
        observed.retain(|g| !g.salaries.is_empty());

        let labels: Vec<&str> = observed.iter().map(|g| g.label).collect();
        let order = category::arrange(variable, &labels);
        let mut groups = Vec::with_capacity(order.len());
        for label in order {
            if let Some(pos) = observed.iter().position(|g| g.label == label) {
                groups.push(observed.swap_remove(pos));
            }
        }

        OrderedView { variable, groups }
    }
}

impl FromIterator<Respondent> for Dataset {
    fn from_iter<I: IntoIterator<Item = Respondent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Respondent;
    type IntoIter = std::slice::Iter<'a, Respondent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
