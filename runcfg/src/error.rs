//! Error types for the runcfg library.
//!
//! This module provides the error hierarchy for configuration assembly,
//! using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a runcfg error.
///
/// # Examples
///
/// ```
/// use runcfg::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the runcfg library.
///
/// This enum encompasses all failure conditions of the configuration
/// assembly process. Errors are raised synchronously at the point of
/// detection and are never retried internally; a misconfiguration is a
/// programmer or user error, not a transient fault.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more declared parameters lack a default value.
    ///
    /// The message enumerates every offending parameter, not just the
    /// first one.
    #[error("the following parameters have no default value; define a default for the parser to work:{}", bullet_list(.0))]
    MissingDefaults(Vec<String>),

    /// A module name is not present in the collaborator registry.
    #[error("unknown collaborator module `{name}`")]
    UnknownCollaborator {
        /// The module name that was looked up.
        name: String,
    },

    /// A collaborator exists but has no export under the requested name.
    #[error("collaborator `{module}` has no export named `{export}`")]
    UnknownExport {
        /// The collaborator module that was consulted.
        module: String,
        /// The export name that was requested.
        export: String,
    },

    /// A CLI-supplied string for a boolean flag matched no recognized token.
    #[error("boolean value expected, got `{input}`")]
    BooleanParse {
        /// The string that failed to parse.
        input: String,
    },

    /// A CLI-supplied value could not be coerced to the option's kind.
    #[error("invalid value `{input}` for `--{flag}`: expected {expected}")]
    Coercion {
        /// The flag whose value failed to coerce.
        flag: String,
        /// The raw value supplied on the command line.
        input: String,
        /// Description of the expected shape.
        expected: &'static str,
    },

    /// A CLI-passed flag is not among the parser's known keys.
    #[error("unknown CLI argument passed: `{name}`")]
    UnknownCliArgument {
        /// The offending flag name.
        name: String,
    },

    /// Keys declared by the parser are absent from the merged configuration.
    #[error("missing keys in config:{}", bullet_list(.0))]
    MissingKeys(Vec<String>),

    /// The merged configuration carries keys the parser never declared.
    #[error("unknown keys in arguments not required by program:{}", bullet_list(.0))]
    UnexpectedKeys(Vec<String>),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configuration (de)serialization error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying argument parser rejected the command line.
    #[error("{0}")]
    Cli(#[from] clap::Error),
}

/// Render a list of names as indented bullet lines for error messages.
fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\n    * `{item}`"))
        .collect()
}

impl Error {
    /// Check if the error reports missing configuration keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use runcfg::Error;
    ///
    /// let err = Error::MissingKeys(vec!["seed".to_string()]);
    /// assert!(err.is_schema_mismatch());
    /// ```
    #[must_use]
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::MissingKeys(_) | Self::UnexpectedKeys(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_defaults_lists_every_parameter() {
        let err = Error::MissingDefaults(vec!["arg1".to_string(), "arg3".to_string()]);
        let display = format!("{err}");
        assert!(display.contains("no default value"));
        assert!(display.contains("`arg1`"));
        assert!(display.contains("`arg3`"));
    }

    #[test]
    fn test_unknown_collaborator_error() {
        let err = Error::UnknownCollaborator {
            name: "nonexistent_lib".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("unknown collaborator"));
        assert!(display.contains("nonexistent_lib"));
    }

    #[test]
    fn test_unknown_export_error() {
        let err = Error::UnknownExport {
            module: "demo_lib".to_string(),
            export: "default_args".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("demo_lib"));
        assert!(display.contains("default_args"));
    }

    #[test]
    fn test_boolean_parse_error() {
        let err = Error::BooleanParse {
            input: "maybe".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("boolean value expected"));
        assert!(display.contains("maybe"));
    }

    #[test]
    fn test_coercion_error_names_flag() {
        let err = Error::Coercion {
            flag: "test_fn.arg1".to_string(),
            input: "abc".to_string(),
            expected: "an integer",
        };
        let display = format!("{err}");
        assert!(display.contains("--test_fn.arg1"));
        assert!(display.contains("abc"));
        assert!(display.contains("an integer"));
    }

    #[test]
    fn test_missing_keys_error_lists_each_key() {
        let err = Error::MissingKeys(vec!["seed".to_string(), "workdir".to_string()]);
        let display = format!("{err}");
        assert!(display.contains("missing keys in config"));
        assert!(display.contains("`seed`"));
        assert!(display.contains("`workdir`"));
    }

    #[test]
    fn test_unexpected_keys_error() {
        let err = Error::UnexpectedKeys(vec!["extra".to_string()]);
        let display = format!("{err}");
        assert!(display.contains("unknown keys"));
        assert!(display.contains("`extra`"));
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "workdir".to_string(),
            message: "must be set".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("workdir"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        let display = format!("{err}");
        assert!(display.contains("I/O error"));
    }

    #[test]
    fn test_schema_mismatch_predicate() {
        assert!(Error::MissingKeys(vec![]).is_schema_mismatch());
        assert!(Error::UnexpectedKeys(vec![]).is_schema_mismatch());
        assert!(!Error::BooleanParse {
            input: String::new()
        }
        .is_schema_mismatch());
    }
}
