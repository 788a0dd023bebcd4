//! Tracing setup for specgrade.
//!
//! Library code only emits events; a host application calls
//! [`init_tracing`] (or [`crate::config::Config::init_logging`]) once to
//! install a subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that overrides the log filter
pub const LOG_ENV_VAR: &str = "SPECGRADE_LOG";

/// Log how long a rubric operation took, at trace level.
///
/// `$name` must be a literal; it becomes the event message. Extra
/// `field = value` pairs are recorded next to `elapsed`:
/// ```rust,ignore
/// let start = Instant::now();
/// let rubric = build(&raw)?;
/// trace_time!(start, "load_rubric", criteria = rubric.criterion_count());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:literal) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:literal $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Install the global subscriber for specgrade events.
///
/// With no `log_level`, only the `specgrade` target is enabled, at `debug`
/// when `verbose` and `warn` otherwise, so validation warnings still show.
/// A bare level such as `info` is scoped to `specgrade`; a full directive
/// like `specgrade=trace,other=info` is used as is. `RUST_LOG` or
/// `SPECGRADE_LOG` replace all of this when set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = match (verbose, log_level) {
        (_, Some(level)) => level,
        (true, None) => "specgrade=debug",
        (false, None) => "specgrade=warn",
    };

    let registry = tracing_subscriber::registry().with(filter_for(level));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_ansi(false);

    if log_json {
        registry.with(stderr.json()).try_init()?;
    } else {
        registry.with(stderr.compact().with_target(false)).try_init()?;
    }

    Ok(())
}

/// Filter used by [`init_tracing`] for `level`, unless `RUST_LOG` or
/// `SPECGRADE_LOG` is set.
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV_VAR))
        .unwrap_or_else(|_| {
            EnvFilter::new(if level.contains('=') {
                level.to_string()
            } else {
                format!("specgrade={}", level)
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_bare_level_is_scoped_to_crate() {
        if std::env::var("RUST_LOG").is_ok() || std::env::var(LOG_ENV_VAR).is_ok() {
            return;
        }
        assert_eq!(filter_for("debug").to_string(), "specgrade=debug");
        assert_eq!(filter_for("other=info").to_string(), "other=info");
    }

    #[test]
    fn test_init_tracing_only_once() {
        // The global subscriber may already be set by another test.
        let first = init_tracing(false, Some("trace"), false);
        let second = init_tracing(true, None, true);
        assert!(first.is_err() || second.is_err());
    }
}
