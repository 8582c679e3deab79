//! HTTP client traits.
//!
//! - [`HttpClient`] - buffered request execution
//! - [`HttpClientStreaming`] - execution with a streaming response body
//!
//! The executor only needs [`HttpClientStreaming`]: raw-body capture targets
//! receive the live body stream, everything else buffers it.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result, StreamingResponse};

/// Core HTTP client trait.
///
/// This trait defines the interface for executing HTTP requests.
/// Implementations should be async-first and support connection pooling.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error on network, TLS or timeout failures.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// Streaming HTTP client trait.
///
/// A single attempt per call: implementations must not retry.
pub trait HttpClientStreaming: HttpClient {
    /// Execute an HTTP request and return a streaming response.
    ///
    /// Unlike [`HttpClient::execute`], this method returns a response with
    /// a streaming body that yields chunks as they arrive from the server.
    ///
    /// # Errors
    ///
    /// Returns an error on network, TLS or timeout failures.
    fn execute_streaming(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<StreamingResponse>> + Send;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}

impl<C: HttpClientStreaming + ?Sized> HttpClientStreaming for &C {
    fn execute_streaming(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<StreamingResponse>> + Send {
        (**self).execute_streaming(request)
    }
}
