//! Error types for the Duty Roster Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while building a roster.
//!
//! Note that an unsolvable month is *not* an error: infeasibility, timeouts
//! and cancellation are ordinary outcomes reported through
//! [`SolveOutcome`](crate::models::SolveOutcome).

use thiserror::Error;

/// The main error type for the Duty Roster Engine.
///
/// # Example
///
/// ```
/// use duty_roster::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/roster.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/roster.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but describes an unusable roster.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the problem.
        message: String,
    },

    /// Caller-supplied input (year, month) could not be used.
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput {
        /// The offending input field.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// The constraint solver backend failed for a reason other than infeasibility.
    #[error("Solver error: {message}")]
    Solver {
        /// A description of the backend failure.
        message: String,
    },

    /// The solver reported a solution that does not satisfy the model.
    #[error("Solver returned an invalid assignment: {message}")]
    InvalidWitness {
        /// A description of the broken invariant.
        message: String,
    },

    /// Writing an export file failed.
    #[error("Failed to write export file '{path}': {source}")]
    ExportIo {
        /// The destination path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Rendering an export document failed.
    #[error("Export error: {message}")]
    Export {
        /// A description of the export failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/roster.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/roster.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("month", "expected an integer, got 'feb'");
        assert_eq!(
            error.to_string(),
            "Invalid input for 'month': expected an integer, got 'feb'"
        );
    }

    #[test]
    fn test_invalid_config_displays_message() {
        let error = EngineError::invalid_config("duplicate member 'Abe'");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: duplicate member 'Abe'"
        );
    }

    #[test]
    fn test_export_io_keeps_source() {
        let error = EngineError::ExportIo {
            path: "/readonly/roster.ics".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(error.to_string().contains("/readonly/roster.ics"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_input() -> EngineResult<()> {
            Err(EngineError::invalid_input("year", "not a number"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_input()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
