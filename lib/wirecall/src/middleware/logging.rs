//! Call logging middleware.
//!
//! Every call runs inside an `http_request` span carrying the method, the
//! URL and, for generated requests, the route name and path template. Once
//! the transport answers, the request-scoped [`RequestLog`] is emitted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::{Error, Method, Request, RequestLog, Result, RouteInfo, StreamingResponse};

/// Layer that adds call logging.
///
/// # Example
///
/// ```ignore
/// use wirecall::HyperClient;
/// use wirecall::middleware::LoggingLayer;
///
/// let client = HyperClient::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Verbosity of the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Outgoing headers too, at debug level.
    Debug,
    /// One line out, one line back.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Info-level logging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Debug-level logging, including request headers.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Configured verbosity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

// ============================================================================
// Exchange
// ============================================================================

/// What the middleware keeps about one call while it is in flight.
struct Exchange {
    method: Method,
    url: String,
    route: Option<RouteInfo>,
    request_log: Option<Arc<RequestLog>>,
}

impl Exchange {
    fn of(request: &Request<Bytes>) -> Self {
        let extensions = request.extensions();
        Self {
            method: request.method(),
            url: request.url().to_string(),
            route: extensions.get::<RouteInfo>().copied(),
            request_log: extensions.get::<Arc<RequestLog>>().cloned(),
        }
    }

    fn span(&self) -> Span {
        let (name, path) = self
            .route
            .map_or(("", ""), |route| (route.name, route.path));
        info_span!(
            "http_request",
            method = %self.method,
            url = %self.url,
            name = name,
            path = path,
        )
    }

    fn sending(&self, level: LogLevel, request: &Request<Bytes>) {
        match level {
            LogLevel::Debug => debug!(
                headers = ?request.headers(),
                has_body = request.body().is_some(),
                "sending request"
            ),
            LogLevel::Info => info!("sending request"),
        }
    }

    fn finished(self, result: &Result<StreamingResponse>, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(response) if response.is_success() => {
                info!(status = response.status(), elapsed_ms, "response received");
            }
            Ok(response) => {
                warn!(status = response.status(), elapsed_ms, "response with HTTP error status");
            }
            Err(err) => warn!(error = %err, elapsed_ms, "request failed"),
        }

        if let Some(request_log) = self.request_log {
            request_log.emit();
        }
    }
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = StreamingResponse, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = StreamingResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let exchange = Exchange::of(&request);
        let span = exchange.span();
        let level = self.level;

        // Take the service that was polled ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                exchange.sending(level, &request);
                let start = Instant::now();
                let result = inner.call(request).await;
                exchange.finished(&result, start.elapsed());
                result
            }
            .instrument(span),
        )
    }
}
