//! Specgrade
//!
//! Rubric-driven quality scoring for specification documents. A rubric is
//! loaded leniently, validated strictly, and then walked by [`score::evaluate`]
//! with caller-supplied checks to produce a weighted, auditable score.

pub mod config;
pub mod error;
pub mod logging;
pub mod rubric;
pub mod score;

pub use error::{Result, RubricError};
pub use rubric::{
    load_configured_rubric, load_default_rubric, load_rubric, load_rubric_str, summary, Rubric,
};
pub use score::{evaluate, Check, CheckRegistry, Evaluation};
