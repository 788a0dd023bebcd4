//! Error types for specgrade
//!
//! Every fatal outcome of loading a rubric maps onto one variant:
//! - source errors: the rubric file cannot be read or parsed
//! - shape errors: the parsed root is not a mapping
//! - validation errors: one or more structural violations, aggregated
//!
//! Category weights that drift from 1.0 are never errors; they are reported
//! as warnings by the validator.

mod macros;

use std::path::PathBuf;
use thiserror::Error;

use crate::rubric::Violation;

/// Errors that can occur while loading, validating or configuring rubrics
#[derive(Error, Debug)]
pub enum RubricError {
    #[error("failed to read rubric {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rubric {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("rubric root must be a mapping, got {found}")]
    Shape { found: String },

    #[error("rubric validation failed:\n{}", join_lines(.violations))]
    Validation { violations: Vec<Violation> },

    #[error("invalid rubric {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<RubricError>,
    },

    #[error("invalid config {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

fn join_lines(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl RubricError {
    /// Create a parse error for a rubric source
    pub fn parse(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        RubricError::Parse {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    /// Create a config error for a configuration file
    pub fn config(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        RubricError::Config {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    /// Attach the source path to a shape or validation failure.
    ///
    /// Errors that already carry a path are returned unchanged.
    pub fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            RubricError::Shape { .. } | RubricError::Validation { .. } => RubricError::Invalid {
                path: path.into(),
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// Violations carried by this error, looking through a path wrapper
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            RubricError::Validation { violations } => Some(violations),
            RubricError::Invalid { source, .. } => source.violations(),
            _ => None,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            RubricError::Read { .. } => "read_error",
            RubricError::Parse { .. } => "parse_error",
            RubricError::Shape { .. } => "shape_error",
            RubricError::Validation { .. } => "validation_error",
            RubricError::Invalid { source, .. } => source.error_type(),
            RubricError::Config { .. } => "config_error",
        }
    }

    /// Convert error to JSON representation for structured error output.
    /// Validation errors list each violation separately.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let Some(violations) = self.violations() {
            error_obj["violations"] = serde_json::json!(violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>());
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for specgrade operations
pub type Result<T> = std::result::Result<T, RubricError>;
