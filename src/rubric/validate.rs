//! Strict structural validation of a transformed rubric.
//!
//! Every check runs; nothing short-circuits. Violations are collected in
//! discovery order: root checks first, then each category's own checks
//! followed by its criteria. Weight drift goes to a separate warnings list
//! and never fails validation.

use std::collections::HashSet;
use std::fmt;

use crate::error::{Result, RubricError};
use crate::rubric::types::Rubric;

/// Allowed absolute distance between the total category weight and 1.0
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// A single structural problem found in a rubric
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    MissingVersion,
    MissingName,
    NoCategories,
    DuplicateCategory { id: String },
    WeightOutOfRange { category: String, weight: f64 },
    EmptyCategory { category: String },
    DuplicateCriterion { category: String, id: String },
    MissingCheckFunction { category: String, criterion: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingVersion => write!(f, "Rubric version is required"),
            Violation::MissingName => write!(f, "Rubric name is required"),
            Violation::NoCategories => write!(f, "Rubric must have at least one category"),
            Violation::DuplicateCategory { id } => write!(f, "Duplicate category ID: {}", id),
            Violation::WeightOutOfRange { category, weight } => write!(
                f,
                "Category {} weight must be between 0 and 1, got {}",
                category, weight
            ),
            Violation::EmptyCategory { category } => {
                write!(f, "Category {} must have at least one criterion", category)
            }
            Violation::DuplicateCriterion { category, id } => write!(
                f,
                "Duplicate criterion ID in category {}: {}",
                category, id
            ),
            Violation::MissingCheckFunction {
                category,
                criterion,
            } => write!(
                f,
                "Criterion {} in category {} must have a checkFunction",
                criterion, category
            ),
        }
    }
}

/// Non-fatal diagnostics about a rubric
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    WeightSum { total: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::WeightSum { total } => write!(
                f,
                "Category weights sum to {:.3}, expected 1.0 (tolerance {})",
                total, WEIGHT_TOLERANCE
            ),
        }
    }
}

/// Outcome of walking a rubric: fatal violations and soft warnings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub warnings: Vec<Warning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Walk the whole rubric and report every violation and warning.
pub fn check(rubric: &Rubric) -> ValidationReport {
    let mut report = ValidationReport::default();

    if rubric.version.is_empty() {
        report.violations.push(Violation::MissingVersion);
    }
    if rubric.name.is_empty() {
        report.violations.push(Violation::MissingName);
    }
    if rubric.categories.is_empty() {
        report.violations.push(Violation::NoCategories);
    }

    let mut category_ids = HashSet::new();
    for category in &rubric.categories {
        if !category_ids.insert(category.id.as_str()) {
            report.violations.push(Violation::DuplicateCategory {
                id: category.id.clone(),
            });
        }
        // Written so NaN fails too.
        if !(0.0..=1.0).contains(&category.weight) {
            report.violations.push(Violation::WeightOutOfRange {
                category: category.id.clone(),
                weight: category.weight,
            });
        }
        if category.criteria.is_empty() {
            report.violations.push(Violation::EmptyCategory {
                category: category.id.clone(),
            });
        }

        // Criterion ids only need to be unique within their category.
        let mut criterion_ids = HashSet::new();
        for criterion in &category.criteria {
            if !criterion_ids.insert(criterion.id.as_str()) {
                report.violations.push(Violation::DuplicateCriterion {
                    category: category.id.clone(),
                    id: criterion.id.clone(),
                });
            }
            if criterion.check_function.is_empty() {
                report.violations.push(Violation::MissingCheckFunction {
                    category: category.id.clone(),
                    criterion: criterion.id.clone(),
                });
            }
        }
    }

    let total = rubric.total_weight();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        report.warnings.push(Warning::WeightSum { total });
    }

    report
}

/// Validate a rubric, logging warnings and failing on any violation.
///
/// # Errors
///
/// Returns [`RubricError::Validation`] carrying every violation found.
pub fn validate(rubric: &Rubric) -> Result<()> {
    let report = check(rubric);

    for warning in &report.warnings {
        tracing::warn!(rubric = %rubric.name, "{}", warning);
    }

    if report.is_valid() {
        Ok(())
    } else {
        tracing::debug!(
            rubric = %rubric.name,
            violations = report.violations.len(),
            "rubric rejected"
        );
        Err(RubricError::Validation {
            violations: report.violations,
        })
    }
}
