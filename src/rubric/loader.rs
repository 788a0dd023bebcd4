//! Rubric loading.
//!
//! Reads a rubric source once, parses it into an untyped tree, transforms it
//! leniently and validates the result strictly. Nothing is cached; every
//! call re-reads the source.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_yaml::Value;

use crate::config::Config;
use crate::error::{Result, RubricError};
use crate::map_parse_err;
use crate::rubric::transform::transform;
use crate::rubric::types::Rubric;
use crate::rubric::validate::validate;
use crate::trace_time;

/// Location of the bundled default rubric, relative to the crate root
pub const DEFAULT_RUBRIC_FILE: &str = "rubrics/default.yaml";

/// Load a rubric from a YAML or JSON file and validate it.
///
/// Files ending in `.json` are parsed as JSON; anything else as YAML.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The document is malformed
/// - The document root is not a mapping
/// - The rubric violates any structural invariant
pub fn load_rubric(path: &Path) -> Result<Rubric> {
    let start = Instant::now();

    let content = std::fs::read_to_string(path).map_err(|source| RubricError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: Value = if is_json(path) {
        serde_json::from_str(&content).map_err(|e| map_parse_err!(path, e))?
    } else {
        serde_yaml::from_str(&content).map_err(|e| map_parse_err!(path, e))?
    };

    let rubric = build(&raw).map_err(|e| e.at_path(path))?;

    tracing::debug!(
        path = %path.display(),
        name = %rubric.name,
        version = %rubric.version,
        "loaded rubric"
    );
    trace_time!(start, "load_rubric", criteria = rubric.criterion_count());

    Ok(rubric)
}

/// Load a rubric from in-memory YAML text.
///
/// # Errors
///
/// Same as [`load_rubric`], without the read step; parse errors name the
/// source as `<inline>`.
pub fn load_rubric_str(content: &str) -> Result<Rubric> {
    let raw: Value = serde_yaml::from_str(content).map_err(|e| map_parse_err!("<inline>", e))?;
    build(&raw)
}

/// Path of the rubric bundled with this crate
pub fn default_rubric_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_RUBRIC_FILE)
}

/// Load the bundled default rubric.
///
/// # Errors
///
/// Same as [`load_rubric`].
pub fn load_default_rubric() -> Result<Rubric> {
    load_rubric(&default_rubric_path())
}

/// Load the rubric selected by configuration, or the bundled default.
///
/// # Errors
///
/// Same as [`load_rubric`].
pub fn load_configured_rubric(config: &Config) -> Result<Rubric> {
    match config.rubric_path() {
        Some(path) => load_rubric(&path),
        None => load_default_rubric(),
    }
}

fn build(raw: &Value) -> Result<Rubric> {
    let rubric = transform(raw)?;
    validate(&rubric)?;
    Ok(rubric)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
