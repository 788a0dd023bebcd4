//! Error macros for specgrade

/// Macro for returning a shape error describing what was found
#[macro_export]
macro_rules! bail_shape {
    ($found:expr) => {
        return Err($crate::error::RubricError::Shape {
            found: $found.to_string(),
        })
    };
}

/// Macro for mapping parse errors onto a source path
#[macro_export]
macro_rules! map_parse_err {
    ($path:expr, $error:expr) => {
        $crate::error::RubricError::parse($path, $error)
    };
}
