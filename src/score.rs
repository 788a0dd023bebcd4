//! Weighted scoring of a document against a validated rubric.
//!
//! Checks are supplied by the caller and looked up by each criterion's
//! `checkFunction` name. The loader never resolves these names; a criterion
//! whose check is not registered (including the `checkUnknown` sentinel) is
//! reported as unresolved and left out of its category's score.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::rubric::{Rubric, RubricCriterion, UNKNOWN_CHECK};

/// A named predicate or scorer for one criterion.
///
/// Returns a score in `[0, 1]`; values outside are clamped and a
/// non-finite result counts as 0.
pub trait Check: Send + Sync {
    fn score(&self, criterion: &RubricCriterion, document: &str) -> f64;
}

impl<F> Check for F
where
    F: Fn(&RubricCriterion, &str) -> f64 + Send + Sync,
{
    fn score(&self, criterion: &RubricCriterion, document: &str) -> f64 {
        self(criterion, document)
    }
}

/// Checks keyed by `checkFunction` name
#[derive(Default)]
pub struct CheckRegistry {
    checks: HashMap<String, Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check under a name, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, check: impl Check + 'static) -> &mut Self {
        self.checks.insert(name.into(), Box::new(check));
        self
    }

    /// Find the check for a name. The sentinel never resolves.
    pub fn resolve(&self, name: &str) -> Option<&dyn Check> {
        if name == UNKNOWN_CHECK {
            return None;
        }
        self.checks.get(name).map(|check| check.as_ref())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CheckRegistry").field("checks", &names).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub category_id: String,
    pub criterion_id: String,
    pub check_function: String,
    pub required: bool,
    /// `None` when no check was registered for `check_function`
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub id: String,
    pub weight: f64,
    /// Mean of resolved criterion scores, 0 when none resolved
    pub score: f64,
    pub resolved: usize,
    pub total: usize,
}

/// Auditable result of scoring one document
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub rubric_name: String,
    pub rubric_version: String,
    pub rubric_fingerprint: String,
    pub evaluated_at: DateTime<Utc>,
    /// Weighted score in `[0, 1]`, normalised by total category weight
    pub score: f64,
    pub categories: Vec<CategoryScore>,
    pub criteria: Vec<CriterionScore>,
    /// `category/criterion` pairs whose check could not be resolved
    pub unresolved: Vec<String>,
    /// `category/criterion` pairs that are required and scored below 1.0
    pub failed_required: Vec<String>,
}

impl Evaluation {
    /// True when every required criterion was resolved and fully satisfied
    pub fn required_satisfied(&self) -> bool {
        self.failed_required.is_empty()
            && self
                .criteria
                .iter()
                .filter(|c| c.required)
                .all(|c| c.score.is_some())
    }
}

/// Score `document` against every criterion of `rubric`.
pub fn evaluate(rubric: &Rubric, document: &str, registry: &CheckRegistry) -> Evaluation {
    let mut categories = Vec::with_capacity(rubric.categories.len());
    let mut criteria = Vec::with_capacity(rubric.criterion_count());
    let mut unresolved = Vec::new();
    let mut failed_required = Vec::new();

    for category in &rubric.categories {
        let mut sum = 0.0;
        let mut resolved = 0;

        for criterion in &category.criteria {
            let key = format!("{}/{}", category.id, criterion.id);
            let score = registry
                .resolve(&criterion.check_function)
                .map(|check| bounded(check.score(criterion, document), &key));

            match score {
                Some(value) => {
                    sum += value;
                    resolved += 1;
                    if criterion.required && value < 1.0 {
                        failed_required.push(key);
                    }
                }
                None => {
                    tracing::debug!(
                        criterion = %key,
                        check = %criterion.check_function,
                        "no check registered"
                    );
                    unresolved.push(key);
                }
            }

            criteria.push(CriterionScore {
                category_id: category.id.clone(),
                criterion_id: criterion.id.clone(),
                check_function: criterion.check_function.clone(),
                required: criterion.required,
                score,
            });
        }

        categories.push(CategoryScore {
            id: category.id.clone(),
            weight: category.weight,
            score: if resolved == 0 {
                0.0
            } else {
                sum / resolved as f64
            },
            resolved,
            total: category.criteria.len(),
        });
    }

    let total_weight: f64 = categories.iter().map(|c| c.weight).sum();
    let score = if total_weight > 0.0 {
        categories.iter().map(|c| c.weight * c.score).sum::<f64>() / total_weight
    } else {
        0.0
    };

    tracing::debug!(
        rubric = %rubric.name,
        score,
        unresolved = unresolved.len(),
        "evaluated document"
    );

    Evaluation {
        rubric_name: rubric.name.clone(),
        rubric_version: rubric.version.clone(),
        rubric_fingerprint: rubric.fingerprint(),
        evaluated_at: Utc::now(),
        score,
        categories,
        criteria,
        unresolved,
        failed_required,
    }
}

fn bounded(raw: f64, key: &str) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        tracing::debug!(criterion = %key, score = raw, "non-finite check score, counting as 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::load_rubric_str;

    const RUBRIC: &str = r#"
name: Scoring
categories:
  - id: structure
    weight: 0.75
    criteria:
      - id: overview
        required: true
        checkFunction: checkOverview
      - id: glossary
        checkFunction: checkGlossary
  - id: clarity
    weight: 0.25
    criteria:
      - id: wording
        checkFunction: checkWording
      - id: todo
"#;

    fn contains(needle: &'static str) -> impl Fn(&RubricCriterion, &str) -> f64 {
        move |_: &RubricCriterion, document: &str| {
            if document.contains(needle) {
                1.0
            } else {
                0.0
            }
        }
    }

    fn registry() -> CheckRegistry {
        let mut registry = CheckRegistry::new();
        registry
            .register("checkOverview", contains("# Overview"))
            .register("checkGlossary", contains("# Glossary"))
            .register("checkWording", |_: &RubricCriterion, _: &str| 0.5);
        registry
    }

    #[test]
    fn test_weighted_score() {
        let rubric = load_rubric_str(RUBRIC).unwrap();
        let evaluation = evaluate(&rubric, "# Overview\ntext", &registry());

        assert_eq!(evaluation.categories[0].score, 0.5);
        assert_eq!(evaluation.categories[1].score, 0.5);
        assert_eq!(evaluation.categories[1].resolved, 1);
        assert_eq!(evaluation.categories[1].total, 2);
        assert!((evaluation.score - 0.5).abs() < 1e-9);
        assert!(evaluation.failed_required.is_empty());
        assert_eq!(evaluation.unresolved.len(), 1);
        assert!(evaluation.required_satisfied());
    }

    #[test]
    fn test_sentinel_and_unregistered_checks_are_unresolved() {
        let rubric = load_rubric_str(RUBRIC).unwrap();
        let mut registry = registry();
        registry.register(UNKNOWN_CHECK, |_: &RubricCriterion, _: &str| 1.0);

        let evaluation = evaluate(&rubric, "", &registry);
        assert_eq!(evaluation.unresolved, vec!["clarity/todo".to_string()]);
        let todo = &evaluation.criteria[3];
        assert_eq!(todo.check_function, UNKNOWN_CHECK);
        assert!(todo.score.is_none());
    }

    #[test]
    fn test_failed_required_criteria_are_listed() {
        let rubric = load_rubric_str(RUBRIC).unwrap();
        let evaluation = evaluate(&rubric, "no headings", &registry());
        assert_eq!(
            evaluation.failed_required,
            vec!["structure/overview".to_string()]
        );
        assert!(!evaluation.required_satisfied());
    }

    #[test]
    fn test_scores_are_clamped() {
        let rubric = load_rubric_str(RUBRIC).unwrap();
        let mut registry = CheckRegistry::new();
        registry
            .register("checkOverview", |_: &RubricCriterion, _: &str| 7.0)
            .register("checkGlossary", |_: &RubricCriterion, _: &str| -3.0);

        let evaluation = evaluate(&rubric, "", &registry);
        assert_eq!(evaluation.criteria[0].score, Some(1.0));
        assert_eq!(evaluation.criteria[1].score, Some(0.0));
    }

    #[test]
    fn test_non_finite_scores_count_as_zero() {
        let rubric = load_rubric_str(RUBRIC).unwrap();
        let mut registry = registry();
        registry
            .register("checkOverview", |_: &RubricCriterion, _: &str| f64::NAN)
            .register("checkGlossary", |_: &RubricCriterion, _: &str| f64::INFINITY);

        let evaluation = evaluate(&rubric, "# Overview\n# Glossary", &registry);
        assert_eq!(evaluation.criteria[0].score, Some(0.0));
        assert_eq!(evaluation.criteria[1].score, Some(0.0));
        assert_eq!(
            evaluation.failed_required,
            vec!["structure/overview".to_string()]
        );
        assert!(!evaluation.required_satisfied());
        assert!(evaluation.score.is_finite());
        assert!((evaluation.score - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_normalised_by_total_weight() {
        let rubric = load_rubric_str(
            r#"
categories:
  - id: only
    weight: 0.5
    criteria:
      - id: c1
        checkFunction: checkAlways
"#,
        )
        .unwrap();
        let mut registry = CheckRegistry::new();
        registry.register("checkAlways", |_: &RubricCriterion, _: &str| 1.0);

        let evaluation = evaluate(&rubric, "", &registry);
        assert_eq!(evaluation.score, 1.0);
    }

    #[test]
    fn test_evaluation_records_rubric_identity() {
        let rubric = load_rubric_str(RUBRIC).unwrap();
        let evaluation = evaluate(&rubric, "", &registry());
        assert_eq!(evaluation.rubric_name, "Scoring");
        assert_eq!(evaluation.rubric_version, "1.0.0");
        assert_eq!(evaluation.rubric_fingerprint, rubric.fingerprint());
        assert_eq!(evaluation.rubric_fingerprint.len(), 64);

        let json = serde_json::to_value(&evaluation).unwrap();
        assert!(json["evaluated_at"].is_string());
    }

    #[test]
    fn test_registry_debug_lists_names() {
        let debug = format!("{:?}", registry());
        assert!(debug.contains("checkGlossary"));
        assert!(debug.contains("checkOverview"));
    }
}
