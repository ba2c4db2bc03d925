// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur when addressing, reading,
//! converting, or writing configuration values. All errors use `thiserror` for
//! proper error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The main error type for configuration operations.
///
/// Every variant describes a programming or data error rather than a transient
/// condition, so none of them is retried internally. It is marked as
/// `#[non_exhaustive]` to allow for future additions without breaking backwards
/// compatibility.
///
/// # Examples
///
/// ```
/// use pathcfg::domain::errors::ConfigError;
///
/// fn require_port() -> Result<u16, ConfigError> {
///     Err(ConfigError::MissingRequiredValue {
///         key: "server.port".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A key string could not be parsed into a non-empty sequence of segments.
    #[error("Invalid key path: '{key}'")]
    InvalidKeyPath {
        /// The offending key string
        key: String,
    },

    /// A required value handle resolved against an absent entry.
    #[error("Missing required configuration value: {key}")]
    MissingRequiredValue {
        /// The key that was not present
        key: String,
    },

    /// The stored value has a shape that cannot satisfy the requested cast.
    #[error("Type mismatch for key '{key}': expected {expected} but found {found}")]
    TypeMismatch {
        /// The key being read
        key: String,
        /// The shape or type that was requested
        expected: String,
        /// The shape that was actually stored
        found: String,
    },

    /// A string could not be parsed into the requested scalar type.
    #[error("Failed to convert configuration value for key '{key}' to type {target_type}: {source}")]
    FormatError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No coercion rule exists for the requested target type.
    #[error("Unsupported target type {target_type} for key '{key}'")]
    UnsupportedType {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
    },

    /// An operation received a value it structurally cannot accept.
    #[error("Invalid argument for key '{key}': {message}")]
    InvalidArgument {
        /// The key being written
        key: String,
        /// What was wrong with the argument
        message: String,
    },

    /// Failed to parse a whole configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// A plain message used as the source of a `FormatError` when the standard
/// library has no dedicated error type for the failure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FormatMessage(pub String);

impl ConfigError {
    /// Creates a FormatError from a ParseIntError.
    pub fn from_parse_int_error(key: &str, target_type: &str, err: ParseIntError) -> Self {
        ConfigError::FormatError {
            key: key.to_string(),
            target_type: target_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a FormatError from a ParseFloatError.
    pub fn from_parse_float_error(key: &str, target_type: &str, err: ParseFloatError) -> Self {
        ConfigError::FormatError {
            key: key.to_string(),
            target_type: target_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a FormatError for a numeric value that does not fit the target type.
    pub fn from_conversion_error<E>(key: &str, target_type: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::FormatError {
            key: key.to_string(),
            target_type: target_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a FormatError carrying a plain message.
    pub fn format(key: &str, target_type: &str, message: impl Into<String>) -> Self {
        ConfigError::FormatError {
            key: key.to_string(),
            target_type: target_type.to_string(),
            source: Box::new(FormatMessage(message.into())),
        }
    }

    /// Creates a TypeMismatch naming the expected and found shapes.
    pub fn mismatch(key: &str, expected: &str, found: &str) -> Self {
        ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_path_error() {
        let error = ConfigError::InvalidKeyPath {
            key: "a..b".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid key path: 'a..b'");
    }

    #[test]
    fn test_missing_required_value_error() {
        let error = ConfigError::MissingRequiredValue {
            key: "server.port".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Missing required configuration value: server.port"
        );
    }

    #[test]
    fn test_type_mismatch_error() {
        let error = ConfigError::mismatch("app.users", "list", "string");
        assert_eq!(
            error.to_string(),
            "Type mismatch for key 'app.users': expected list but found string"
        );
    }

    #[test]
    fn test_format_error() {
        let source_error = "invalid value".parse::<i32>().unwrap_err();
        let error = ConfigError::from_parse_int_error("test.key", "i32", source_error);
        assert!(matches!(error, ConfigError::FormatError { .. }));
        assert!(error.to_string().contains("test.key"));
        assert!(error.to_string().contains("i32"));
    }

    #[test]
    fn test_from_parse_float_error() {
        let parse_err = "not_a_float".parse::<f64>().unwrap_err();
        let error = ConfigError::from_parse_float_error("test.key", "f64", parse_err);
        assert!(matches!(error, ConfigError::FormatError { .. }));
        assert!(error.to_string().contains("f64"));
    }

    #[test]
    fn test_from_conversion_error() {
        let err = i8::try_from(300_i64).unwrap_err();
        let error = ConfigError::from_conversion_error("byte.key", "i8", err);
        assert!(error.to_string().contains("byte.key"));
    }

    #[test]
    fn test_format_message() {
        let error = ConfigError::format("flag", "bool", "not a boolean literal: maybe");
        assert!(error.to_string().ends_with("not a boolean literal: maybe"));
    }

    #[test]
    fn test_unsupported_type_error() {
        let error = ConfigError::UnsupportedType {
            key: "k".to_string(),
            target_type: "Vec<i32>".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported target type Vec<i32> for key 'k'"
        );
    }

    #[test]
    fn test_invalid_argument_error() {
        let error = ConfigError::InvalidArgument {
            key: "foo".to_string(),
            message: "null is not supported, use remove instead".to_string(),
        };
        assert!(error.to_string().contains("use remove instead"));
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::ParseError {
            message: "Invalid YAML".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Invalid YAML"
        );
    }
}
