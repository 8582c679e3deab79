//! Responses handed back by the transport.
//!
//! The transport always yields a [`StreamingResponse`]. Raw-body capture
//! targets take its stream as is; every other path buffers it with
//! [`StreamingResponse::collect`] into a [`Response`].

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::StreamExt;

/// Body chunks as they arrive from the connection.
pub type StreamingBody = Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send>>;

/// Status line and headers, shared by both response shapes.
///
/// Header names are stored lowercase; a repeated header keeps one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Head {
    status: u16,
    headers: HashMap<String, String>,
}

impl Head {
    fn new(status: u16, headers: HashMap<String, String>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self { status, headers }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

// ============================================================================
// Streaming Response
// ============================================================================

/// A response whose body has not been read yet.
pub struct StreamingResponse {
    head: Head,
    body: StreamingBody,
}

impl fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.head.status)
            .field("headers", &self.head.headers)
            .finish_non_exhaustive()
    }
}

impl StreamingResponse {
    /// Creates a response around a body stream.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: StreamingBody) -> Self {
        Self {
            head: Head::new(status, headers),
            body,
        }
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.head.status
    }

    /// Headers, keyed by lowercase name.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.head.headers
    }

    /// Header value, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.header(name)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.head.is_success()
    }

    /// Give up the headers and keep the live stream.
    #[must_use]
    pub fn into_body(self) -> StreamingBody {
        self.body
    }

    /// Read the whole stream into memory.
    ///
    /// # Errors
    ///
    /// The first chunk error.
    pub async fn collect(self) -> crate::Result<Response<Bytes>> {
        let Self { head, mut body } = self;
        let mut buffer = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(Response {
            head,
            body: buffer.freeze(),
        })
    }
}

// ============================================================================
// Buffered Response
// ============================================================================

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<B = Bytes> {
    head: Head,
    body: B,
}

impl<B> Response<B> {
    /// Creates a buffered response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            head: Head::new(status, headers),
            body,
        }
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.head.status
    }

    /// Headers, keyed by lowercase name.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.head.headers
    }

    /// Header value, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.header(name)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.head.is_success()
    }

    /// Body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into the body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }
}
