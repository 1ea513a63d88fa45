//! Error types module
//!
//! Two layers: `ParseError` describes why a processing URL was rejected, and
//! `RequestError` wraps it (or a signature failure) into one of the two classes
//! visible to clients. The detailed text stays on the server side; clients only
//! ever see the fixed messages returned by `ErrorMetadata::client_message`.

use std::fmt;

/// Client-facing message for signature failures.
pub const MSG_FORBIDDEN: &str = "Forbidden";
/// Client-facing message for every parsing failure.
pub const MSG_INVALID_URL: &str = "Invalid URL";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like malformed URLs
    Debug,
    /// Warning level - for suspicious requests such as bad signatures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_URL")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (never contains request-specific details)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// What went wrong while interpreting a processing URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    UnknownOption,
    UnknownPreset,
    EmptyUrl,
    MultipleFormats,
    UnsupportedFormat,
    InvalidPath,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::UnknownOption => "unknown_option",
            ErrorKind::UnknownPreset => "unknown_preset",
            ErrorKind::EmptyUrl => "empty_url",
            ErrorKind::MultipleFormats => "multiple_formats",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::InvalidPath => "invalid_path",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected processing URL: the kind drives classification, the detail is for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ParseError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, detail)
    }

    /// Shorthand for the common "Invalid <option> arguments: [..]" failure.
    pub fn invalid_arguments(option: &str, args: &[String]) -> Self {
        Self::invalid_argument(format!("Invalid {} arguments: {:?}", option, args))
    }

    pub fn empty_url() -> Self {
        Self::new(ErrorKind::EmptyUrl, "Image URL is empty")
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Request-level failure, classified into the two externally visible classes.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),
}

impl RequestError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            RequestError::Forbidden(_) => "Forbidden",
            RequestError::InvalidUrl(err) => err.kind.as_str(),
        }
    }

    /// Internal description, safe to log but not to return to clients.
    pub fn detailed_message(&self) -> String {
        match self {
            RequestError::Forbidden(detail) => detail.clone(),
            RequestError::InvalidUrl(err) => err.detail.clone(),
        }
    }

    /// Errors whose cause must never reach the client, whatever the environment.
    pub fn is_sensitive(&self) -> bool {
        matches!(self, RequestError::Forbidden(_))
    }
}

impl ErrorMetadata for RequestError {
    fn http_status_code(&self) -> u16 {
        match self {
            RequestError::Forbidden(_) => 403,
            RequestError::InvalidUrl(_) => 404,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RequestError::Forbidden(_) => "FORBIDDEN",
            RequestError::InvalidUrl(_) => "INVALID_URL",
        }
    }

    fn client_message(&self) -> String {
        match self {
            RequestError::Forbidden(_) => MSG_FORBIDDEN.to_string(),
            RequestError::InvalidUrl(_) => MSG_INVALID_URL.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            RequestError::Forbidden(_) => LogLevel::Warn,
            RequestError::InvalidUrl(_) => LogLevel::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_forbidden() {
        let err = RequestError::Forbidden("Invalid signature".to_string());
        assert_eq!(err.http_status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert_eq!(err.client_message(), "Forbidden");
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert_eq!(err.detailed_message(), "Invalid signature");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_error_metadata_invalid_url() {
        let err = RequestError::from(ParseError::new(
            ErrorKind::UnknownPreset,
            "Unknown preset: thumb",
        ));
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "INVALID_URL");
        assert_eq!(err.client_message(), "Invalid URL");
        assert_eq!(err.error_type(), "unknown_preset");
        assert!(!err.client_message().contains("thumb"));
        assert!(err.detailed_message().contains("thumb"));
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_invalid_arguments_names_option_and_args() {
        let err = ParseError::invalid_arguments("quality", &["1".to_string(), "2".to_string()]);
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), r#"Invalid quality arguments: ["1", "2"]"#);
    }
}
