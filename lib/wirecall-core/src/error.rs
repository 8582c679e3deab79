//! Error types for wirecall.

use derive_more::{Display, Error, From};

use crate::{ErrorResponse, Method, Part};

/// Boxed error returned by user-supplied capabilities (validation, capture, custom decoding).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for wirecall operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The request record rejected itself before any network call.
    #[display("client validation err: {_0}")]
    #[from(skip)]
    Validation(#[error(not(source))] String),

    /// Base URL and path template did not join into a valid URL.
    #[display("client generation failed, {message}, attempted url: {url}")]
    #[from(skip)]
    InvalidUrl {
        /// The joined URL string that failed to parse.
        url: String,
        /// Parser error message.
        message: String,
    },

    /// A value of an unsupported type was handed to the field assigner.
    #[display("request object '{_0}' must be a struct type")]
    #[from(skip)]
    UnsupportedType(#[error(not(source))] String),

    /// A field carries a placement tag that is not recognized.
    #[display("unknown 'request' placement: {_0}")]
    #[from(skip)]
    UnknownPlacement(#[error(not(source))] String),

    /// A required field was absent or empty.
    #[display("required {} not found or not set: {name}", part.noun())]
    #[from(skip)]
    RequiredNotSet {
        /// The HTTP part the field targets.
        part: Part,
        /// The field wire name.
        name: String,
    },

    /// A path field has no matching `{name}` placeholder in the URL path.
    #[display("could not find path variable: {name}, in path [{path}], wanted syntax [{wanted}]")]
    #[from(skip)]
    PathVariableNotFound {
        /// The field wire name.
        name: String,
        /// The URL path searched.
        path: String,
        /// The placeholder that was looked for.
        wanted: String,
    },

    /// Field assignment failed for a named request record.
    #[display("client field assignment failed, for client {name}: {source}")]
    #[from(skip)]
    Assignment {
        /// Diagnostic name of the request record.
        name: String,
        /// The underlying failure.
        source: Box<Error>,
    },

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Transport-level timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The response body could not be read.
    #[display("unable to read response body for {method} {url} due to {message}")]
    #[from(skip)]
    BodyRead {
        /// Request method.
        method: Method,
        /// Request URL.
        url: String,
        /// Read error message.
        message: String,
    },

    /// A raw-body capture target rejected the body stream.
    #[display("unable to capture response body for {method} {url} due to {message}")]
    #[from(skip)]
    Capture {
        /// Request method.
        method: Method,
        /// Request URL.
        url: String,
        /// Capture error message.
        message: String,
    },

    /// The response body could not be decoded into the result target.
    #[display("unable to decode response body for {method} {url} due to {message}")]
    #[from(skip)]
    Decode {
        /// Request method.
        method: Method,
        /// Request URL.
        url: String,
        /// Decode error message.
        message: String,
    },

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Non-success response synthesized into an error carrier.
    #[display("{_0}")]
    #[from]
    Status(ErrorResponse),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl std::fmt::Display) -> Self {
        Self::Validation(message.to_string())
    }

    /// Create a URL construction error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Create an unsupported-type error naming the offending type.
    #[must_use]
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType(type_name.into())
    }

    /// Create an unknown placement error.
    #[must_use]
    pub fn unknown_placement(tag: impl Into<String>) -> Self {
        Self::UnknownPlacement(tag.into())
    }

    /// Create a required-field-missing error.
    #[must_use]
    pub fn required_not_set(part: Part, name: impl Into<String>) -> Self {
        Self::RequiredNotSet {
            part,
            name: name.into(),
        }
    }

    /// Wrap a field assignment failure with the record's diagnostic name.
    #[must_use]
    pub fn assignment(name: impl Into<String>, source: Self) -> Self {
        Self::Assignment {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a body read error.
    #[must_use]
    pub fn body_read(method: Method, url: &url::Url, err: impl std::fmt::Display) -> Self {
        Self::BodyRead {
            method,
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Create a body capture error.
    #[must_use]
    pub fn capture(method: Method, url: &url::Url, err: impl std::fmt::Display) -> Self {
        Self::Capture {
            method,
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(method: Method, url: &url::Url, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            method,
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the error was raised before any network call.
    #[must_use]
    pub const fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidUrl { .. }
                | Self::UnsupportedType(_)
                | Self::UnknownPlacement(_)
                | Self::RequiredNotSet { .. }
                | Self::PathVariableNotFound { .. }
                | Self::Assignment { .. }
                | Self::InvalidRequest(_)
                | Self::JsonSerialization(_)
        )
    }

    /// The innermost error, unwrapping record-name context.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Assignment { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the error carrier if this is a status error.
    #[must_use]
    pub const fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(response) => Some(response.status_code()),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::required_not_set(Part::Header, "X-Token");
        assert_eq!(
            err.to_string(),
            "required header not found or not set: X-Token"
        );

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn assignment_wraps_record_name() {
        let err = Error::assignment("GetItem", Error::unknown_placement("body"));
        assert_eq!(
            err.to_string(),
            "client field assignment failed, for client GetItem: unknown 'request' placement: body"
        );
        assert!(matches!(err.root(), Error::UnknownPlacement(tag) if tag == "body"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_status() {
        let err = Error::Status(ErrorResponse::new(404, "Not Found"));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(err.is_not_found());
        assert!(!err.is_server_error());
        assert_eq!(err.to_string(), "Not Found");

        let err = Error::Status(ErrorResponse::new(503, "Service Unavailable"));
        assert!(err.is_server_error());
        assert!(!err.is_client_error());

        let err = Error::Timeout;
        assert_eq!(err.status(), None);
        assert!(err.error_response().is_none());
    }

    #[test]
    fn client_side_errors() {
        assert!(Error::validation("name is empty").is_client_side());
        assert!(Error::required_not_set(Part::Path, "id").is_client_side());
        assert!(!Error::Timeout.is_client_side());
        assert!(!Error::connection("refused").is_client_side());
    }

    #[test]
    fn error_is_timeout() {
        assert!(Error::Timeout.is_timeout());
        assert!(!Error::connection("failed").is_timeout());
        assert!(Error::connection("failed").is_connection());
    }
}
