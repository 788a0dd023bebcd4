use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Sentinel check name used when a criterion does not configure one.
///
/// Never registered by a scorer; a criterion carrying it has no check.
pub const UNKNOWN_CHECK: &str = "checkUnknown";

/// A named, versioned collection of weighted categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rubric {
    pub version: String,
    pub name: String,
    pub description: String,
    pub categories: Vec<RubricCategory>,
}

/// A weighted grouping of criteria
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Share of the overall score, expected in `[0, 1]`
    pub weight: f64,
    pub criteria: Vec<RubricCriterion>,
}

/// A single checkable requirement bound to a named check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricCriterion {
    pub id: String,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub evaluation_type: EvaluationType,
    pub check_function: String,
    pub guidance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

impl RubricCategory {
    /// Number of criteria marked required
    pub fn required_count(&self) -> usize {
        self.criteria.iter().filter(|c| c.required).count()
    }

    /// Number of criteria not marked required
    pub fn optional_count(&self) -> usize {
        self.criteria.len() - self.required_count()
    }
}

impl RubricCriterion {
    /// True when the criterion names a check other than the sentinel
    pub fn has_check(&self) -> bool {
        !self.check_function.is_empty() && self.check_function != UNKNOWN_CHECK
    }
}

impl Rubric {
    /// Sum of all category weights
    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }

    /// Look up a category by id
    pub fn category(&self, id: &str) -> Option<&RubricCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Total number of criteria across all categories
    pub fn criterion_count(&self) -> usize {
        self.categories.iter().map(|c| c.criteria.len()).sum()
    }

    /// SHA-256 over every field, in declaration order.
    ///
    /// Identifies exactly which rubric produced an evaluation.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        let mut field = |bytes: &[u8]| {
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        };

        field(self.version.as_bytes());
        field(self.name.as_bytes());
        field(self.description.as_bytes());
        field(&(self.categories.len() as u64).to_le_bytes());
        for category in &self.categories {
            field(category.id.as_bytes());
            field(category.name.as_bytes());
            field(category.description.as_bytes());
            field(&category.weight.to_bits().to_le_bytes());
            field(&(category.criteria.len() as u64).to_le_bytes());
            for criterion in &category.criteria {
                field(criterion.id.as_bytes());
                field(criterion.name.as_bytes());
                field(criterion.description.as_bytes());
                field(&[u8::from(criterion.required)]);
                field(criterion.evaluation_type.as_str().as_bytes());
                field(criterion.check_function.as_bytes());
                field(criterion.guidance.as_bytes());
                match &criterion.examples {
                    Some(examples) => {
                        field(&(examples.len() as u64).to_le_bytes());
                        for example in examples {
                            field(example.as_bytes());
                        }
                    }
                    None => field(&[]),
                }
            }
        }

        format!("{:x}", hasher.finalize())
    }
}

/// How a criterion is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvaluationType {
    /// The thing exists at all (default)
    #[default]
    Presence,
    Quality,
    Count,
    Completeness,
}

impl EvaluationType {
    /// All variants, in canonical order
    pub const ALL: [EvaluationType; 4] = [
        EvaluationType::Presence,
        EvaluationType::Quality,
        EvaluationType::Count,
        EvaluationType::Completeness,
    ];

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationType::Presence => "PRESENCE",
            EvaluationType::Quality => "QUALITY",
            EvaluationType::Count => "COUNT",
            EvaluationType::Completeness => "COMPLETENESS",
        }
    }

    /// Case-insensitive match against the canonical names.
    ///
    /// Unrecognized input falls back to [`EvaluationType::Presence`].
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }
}

impl fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
