//! Tower middleware layers for the wirecall transport.
//!
//! Layers wrap the boxed transport service of [`HyperClient`](crate::HyperClient),
//! which takes a [`Request`](crate::Request) and yields a
//! [`StreamingResponse`](crate::StreamingResponse). Each call is a single
//! attempt: wirecall ships no retry layer.
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`, tagged with the
//!   route name and path template, then emits the request-scoped log
//!
//! # Example
//!
//! ```ignore
//! use wirecall::HyperClient;
//! use wirecall::middleware::LoggingLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
