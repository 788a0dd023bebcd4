//! Rubric model, loading and validation.
//!
//! A rubric is loaded in two phases: [`transform`] turns any parsed document
//! into the model without failing on missing fields, then [`validate`]
//! rejects structural problems, reporting all of them at once.
//!
//! # Example
//!
//! ```rust,no_run
//! use specgrade::rubric;
//! use std::path::Path;
//!
//! let rubric = rubric::load_rubric(Path::new("rubrics/default.yaml")).unwrap();
//! println!("{}", rubric::summary(&rubric));
//! ```

pub mod loader;
pub mod summary;
pub mod transform;
pub mod types;
pub mod validate;

pub use loader::*;
pub use summary::summary;
pub use transform::transform;
pub use types::*;
pub use validate::{check, validate, ValidationReport, Violation, Warning, WEIGHT_TOLERANCE};
