use std::path::Path;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::args::ArgError;
use crate::expr::{Field, FlagError};

#[derive(Debug, Error, Diagnostic)]
pub enum HedError {
    #[error("Failed to read file '{path}': {source}")]
    #[diagnostic(code(hed::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported input '{path}': expected a .json, .yaml, .yml or .toml document")]
    #[diagnostic(code(hed::input::unsupported))]
    UnsupportedInput { path: String },

    #[error("Failed to parse input document '{path}': {message}")]
    #[diagnostic(code(hed::input::invalid))]
    InvalidDocument { path: String, message: String },

    #[error("Failed to parse configuration '{path}': {source}")]
    #[diagnostic(code(hed::config))]
    InvalidConfig {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid flags '{flags}': {source}")]
    #[diagnostic(code(hed::parse::flags))]
    InvalidFlags {
        flags: String,
        #[source]
        source: FlagError,
    },

    #[error("Unterminated '{delimiter}' delimiter in expression '{expression}'")]
    #[diagnostic(code(hed::parse::delimiter))]
    UnterminatedDelimiter { delimiter: char, expression: String },

    #[error("Missing closing '}}' in expression '{expression}'")]
    #[diagnostic(code(hed::parse::brace))]
    UnmatchedBrace { expression: String },

    #[error("Invalid regex '{pattern}': {source}")]
    #[diagnostic(code(hed::parse::regex))]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("No function \"{name}\" with args \"{args}\"")]
    #[diagnostic(code(hed::parse::function))]
    UnknownFunction { name: String, args: String },

    #[error("Function \"{name}\" with args \"{args}\": {source}")]
    #[diagnostic(code(hed::parse::arguments))]
    FunctionArguments {
        name: String,
        args: String,
        #[source]
        source: ArgError,
    },

    #[error("Out of range version index {index} for field '{field}' with {len} version(s)")]
    #[diagnostic(code(hed::eval::index))]
    FieldIndexOutOfRange { field: Field, index: i32, len: usize },

    #[error("Invalid request: {message}")]
    #[diagnostic(code(hed::request))]
    InvalidRequest { message: String },

    #[error("Failed to serialize response JSON: {source}")]
    #[diagnostic(code(hed::serialize))]
    ResponseSerialization {
        #[source]
        source: serde_json::Error,
    },
}

impl HedError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFlags { .. }
                | Self::UnterminatedDelimiter { .. }
                | Self::UnmatchedBrace { .. }
                | Self::InvalidRegex { .. }
                | Self::UnknownFunction { .. }
                | Self::FunctionArguments { .. }
        )
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        let (r#type, suggestion) = match self {
            Self::Io { .. } => ("io_error", None),
            Self::UnsupportedInput { .. } => (
                "unsupported_input",
                Some("Provide input documents with a .json, .yaml, .yml or .toml extension"),
            ),
            Self::InvalidDocument { .. } => ("invalid_input", None),
            Self::InvalidConfig { .. } => (
                "invalid_config",
                Some("Supported keys: exprs, canvas_exprs, sort, colors"),
            ),
            Self::InvalidFlags { .. } => (
                "parse_error",
                Some("Flags are s, i, m, p, field letters g n t x y z l d f, integers and '+'"),
            ),
            Self::UnterminatedDelimiter { .. } | Self::UnmatchedBrace { .. } => {
                ("parse_error", None)
            }
            Self::InvalidRegex { .. } => ("invalid_regex", None),
            Self::UnknownFunction { .. } => (
                "unknown_function",
                Some("Run 'hed functions' to list available functions"),
            ),
            Self::FunctionArguments { .. } => (
                "invalid_arguments",
                Some("Run 'hed functions' to see argument signatures"),
            ),
            Self::FieldIndexOutOfRange { .. } => ("evaluation_error", None),
            Self::InvalidRequest { .. } => ("invalid_request", None),
            Self::ResponseSerialization { .. } => ("serialization_error", None),
        };

        ErrorResponse {
            error: ErrorBody {
                r#type: r#type.to_string(),
                message: self.to_string(),
                suggestion: suggestion.map(ToString::to_string),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub r#type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::HedError;
    use crate::args::ArgError;
    use crate::expr::{Field, FlagError};

    fn assert_error_type(
        error: HedError,
        expected_type: &str,
        expected_suggestion_substring: Option<&str>,
    ) {
        let response = error.to_error_response();
        assert_eq!(response.error.r#type, expected_type);

        match (
            response.error.suggestion.as_deref(),
            expected_suggestion_substring,
        ) {
            (Some(actual), Some(expected_substring)) => {
                assert!(
                    actual.contains(expected_substring),
                    "suggestion should contain '{expected_substring}', got '{actual}'"
                );
            }
            (None, None) => {}
            (actual, expected) => {
                panic!("suggestion mismatch; actual={actual:?}, expected_contains={expected:?}")
            }
        }
    }

    #[test]
    fn parse_errors_share_parse_error_type() {
        assert_error_type(
            HedError::InvalidFlags {
                flags: "sq".to_string(),
                source: FlagError::Unrecognized('q'),
            },
            "parse_error",
            Some("field letters"),
        );
        assert_error_type(
            HedError::UnterminatedDelimiter {
                delimiter: '/',
                expression: "/abc".to_string(),
            },
            "parse_error",
            None,
        );
        assert_error_type(
            HedError::UnmatchedBrace {
                expression: "{ norm".to_string(),
            },
            "parse_error",
            None,
        );
    }

    #[test]
    fn function_errors_point_to_functions_listing() {
        assert_error_type(
            HedError::UnknownFunction {
                name: "doesNotExist".to_string(),
                args: String::new(),
            },
            "unknown_function",
            Some("hed functions"),
        );
        assert_error_type(
            HedError::FunctionArguments {
                name: "margin".to_string(),
                args: "a".to_string(),
                source: ArgError::TooFew {
                    expected: 1,
                    got: 0,
                },
            },
            "invalid_arguments",
            Some("signatures"),
        );
    }

    #[test]
    fn nested_argument_error_is_rendered_with_function_context() {
        let error = HedError::FunctionArguments {
            name: "line_color".to_string(),
            args: "red".to_string(),
            source: ArgError::Convert {
                value: "red".to_string(),
                type_name: "i16".to_string(),
            },
        };
        let message = error.to_string();
        assert!(message.contains("line_color"));
        assert!(message.contains("\"red\" cannot be interpreted as i16"));
        assert!(error.is_parse_error());
    }

    #[test]
    fn out_of_range_index_is_an_evaluation_error_not_a_parse_error() {
        let error = HedError::FieldIndexOutOfRange {
            field: Field::XLabel,
            index: 5,
            len: 1,
        };
        assert!(!error.is_parse_error());
        assert_error_type(error, "evaluation_error", None);
    }

    #[test]
    fn io_errors_map_to_io_error_without_suggestion() {
        assert_error_type(
            HedError::Io {
                path: "input.json".to_string(),
                source: std::io::Error::other("boom"),
            },
            "io_error",
            None,
        );
    }
}
