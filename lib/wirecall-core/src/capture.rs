//! Response capture targets and the error carrier.
//!
//! A [`ResponseTarget`] is the caller's result container. Besides JSON
//! decoding it may expose, independently:
//!
//! - a [`StatusReceiver`], given the status code before anything else,
//! - a [`CaptureBody`], handed the live body stream (no decoding happens),
//! - an [`ErrorReceiver`], filled when the status is not 200,
//! - an [`UnmarshalBody`], used instead of JSON decoding.
//!
//! [`ErrorResponse`] and [`BasicResponse`] are ready-made fields for the
//! first and third capabilities.

use std::fmt;

use crate::{BoxError, Result, StreamingBody, from_json};

// ============================================================================
// Error Carrier
// ============================================================================

/// Holds the status code of a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BasicResponse {
    code: u16,
}

impl BasicResponse {
    /// Record a status code.
    pub const fn new_code(&mut self, code: u16) {
        self.code = code;
    }

    /// Recorded status code, 0 when none was received.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code
    }
}

/// Status code plus error message.
///
/// Usable both as a result field (an [`ErrorReceiver`]) and as a returned
/// error:
///
/// ```
/// use wirecall_core::ErrorResponse;
///
/// let mut error = ErrorResponse::default();
/// assert!(error.failed().is_none());
///
/// error.new_error(404, format_args!("from response: {}", "missing"));
/// assert_eq!(error.status_code(), 404);
/// assert_eq!(error.to_string(), "from response: missing");
/// assert!(error.failed().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ErrorResponse {
    message: String,
    basic: BasicResponse,
}

impl ErrorResponse {
    /// Creates an error carrier.
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            basic: BasicResponse { code },
        }
    }

    /// Build the carrier for a non-success response without a result target:
    /// the canonical status text, followed by the body when there is one.
    #[must_use]
    pub fn from_status(code: u16, body: &[u8]) -> Self {
        let reason = http::StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown Status");
        let message = if body.is_empty() {
            reason.to_string()
        } else {
            format!("{reason}: {}", String::from_utf8_lossy(body))
        };
        Self::new(code, message)
    }

    /// Record a status code and message.
    pub fn new_error(&mut self, code: u16, message: impl fmt::Display) {
        self.basic.new_code(code);
        self.message = message.to_string();
    }

    /// Record a status code, keeping the message.
    pub const fn new_code(&mut self, code: u16) {
        self.basic.new_code(code);
    }

    /// Recorded status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.basic.status_code()
    }

    /// Recorded message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `Some(self)` when an error was recorded.
    #[must_use]
    pub fn failed(&self) -> Option<&Self> {
        (!self.message.is_empty()).then_some(self)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorResponse {}

// ============================================================================
// Capabilities
// ============================================================================

/// Receives the response status code.
pub trait StatusReceiver {
    /// Called once with the response status, before the body is read.
    fn receive_status(&mut self, code: u16);
}

impl StatusReceiver for BasicResponse {
    fn receive_status(&mut self, code: u16) {
        self.new_code(code);
    }
}

impl StatusReceiver for ErrorResponse {
    fn receive_status(&mut self, code: u16) {
        self.new_code(code);
    }
}

impl StatusReceiver for u16 {
    fn receive_status(&mut self, code: u16) {
        *self = code;
    }
}

impl StatusReceiver for Option<u16> {
    fn receive_status(&mut self, code: u16) {
        *self = Some(code);
    }
}

/// Receives the error of a non-200 response.
pub trait ErrorReceiver {
    /// Called with the status code and `from response: <body>`.
    fn receive_error(&mut self, code: u16, message: String);
}

impl ErrorReceiver for ErrorResponse {
    fn receive_error(&mut self, code: u16, message: String) {
        self.basic.new_code(code);
        self.message = message;
    }
}

impl ErrorReceiver for Option<ErrorResponse> {
    fn receive_error(&mut self, code: u16, message: String) {
        *self = Some(ErrorResponse::new(code, message));
    }
}

/// Takes ownership of the raw response body stream.
///
/// The stream is moved into the target: dropping it closes the response.
pub trait CaptureBody {
    /// Keep the body stream.
    ///
    /// # Errors
    ///
    /// Any error is reported with the request method and URL.
    fn capture(&mut self, body: StreamingBody) -> std::result::Result<(), BoxError>;
}

impl CaptureBody for Option<StreamingBody> {
    fn capture(&mut self, body: StreamingBody) -> std::result::Result<(), BoxError> {
        *self = Some(body);
        Ok(())
    }
}

/// Custom decoding of the buffered response body.
pub trait UnmarshalBody {
    /// Decode the body into `self`.
    ///
    /// # Errors
    ///
    /// Any error is reported with the request method and URL.
    fn unmarshal_body(&mut self, body: &[u8]) -> std::result::Result<(), BoxError>;
}

/// A result container with optional capabilities.
///
/// Usually derived with `#[derive(ResponseTarget)]`; every capability
/// accessor defaults to `None`.
pub trait ResponseTarget {
    /// Status code receiver.
    fn status_receiver(&mut self) -> Option<&mut dyn StatusReceiver> {
        None
    }

    /// Raw body capture; when present the body is neither buffered nor decoded.
    fn body_capture(&mut self) -> Option<&mut dyn CaptureBody> {
        None
    }

    /// Error receiver for non-200 responses.
    fn error_receiver(&mut self) -> Option<&mut dyn ErrorReceiver> {
        None
    }

    /// Custom decoder, used instead of [`ResponseTarget::decode_json`].
    fn custom_unmarshal(&mut self) -> Option<&mut dyn UnmarshalBody> {
        None
    }

    /// Decode a JSON body into `self`, keeping capability-owned state.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for this type.
    fn decode_json(&mut self, body: &[u8]) -> Result<()>;
}

impl ResponseTarget for () {
    fn decode_json(&mut self, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}

impl ResponseTarget for serde_json::Value {
    fn decode_json(&mut self, body: &[u8]) -> Result<()> {
        *self = from_json(body)?;
        Ok(())
    }
}

impl<T: serde::de::DeserializeOwned> ResponseTarget for Vec<T> {
    fn decode_json(&mut self, body: &[u8]) -> Result<()> {
        *self = from_json(body)?;
        Ok(())
    }
}

impl ResponseTarget for ErrorResponse {
    fn status_receiver(&mut self) -> Option<&mut dyn StatusReceiver> {
        Some(self)
    }

    fn error_receiver(&mut self) -> Option<&mut dyn ErrorReceiver> {
        Some(self)
    }

    fn decode_json(&mut self, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}

impl ResponseTarget for Option<StreamingBody> {
    fn body_capture(&mut self) -> Option<&mut dyn CaptureBody> {
        Some(self)
    }

    fn decode_json(&mut self, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}
