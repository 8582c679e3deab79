//! Tag-driven HTTP request/response marshaling for Rust.
//!
//! Describe a request as a struct whose fields carry placement tags, then
//! generate and send it; the response is decoded into a result target.
//!
//! # Example
//!
//! ```ignore
//! use wirecall::prelude::*;
//!
//! #[derive(HttpRequest)]
//! #[request(method = "GET", path = "/users/{id}")]
//! pub struct GetUser {
//!     #[request(path, required)]
//!     id: u64,
//!     #[request(header, alias = "X-Trace")]
//!     trace: Option<String>,
//! }
//!
//! #[derive(Debug, Default, Deserialize, ResponseTarget)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let mut user = User::default();
//! wirecall::do_request("https://api.example.com", &GetUser { id: 42, trace: None }, Some(&mut user), None)
//!     .await?;
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

pub mod _tutorial;
mod api_client;
mod client;
mod config;
mod connector;
mod execute;
pub mod middleware;
pub mod prelude;

// Re-export client types
pub use api_client::ApiClient;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, TransportConfig};
pub use execute::{do_request, execute, execute_with};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types (derive macros refer to them as `::wirecall::...`)
pub use wirecall_core::{
    BasicResponse, BoxError, BuildRequest, CaptureBody, Complex, Error,
    ErrorReceiver, ErrorResponse, ExtendedLog, FieldDescriptor, FieldTags, FieldValue,
    GenerateError, HttpClient, HttpClientStreaming, HttpRequest, JsonBody, Method, NestedRecord,
    Part, Placement, Record, RecordDescriptor, Request, RequestBuilder, RequestLog, Response,
    ResponseTarget, Result, RouteInfo, SchemaTag, StatusReceiver, StreamingBody,
    StreamingResponse, Target, ToWireValue, UnmarshalBody, Validate, WireValue, assign, convert,
    from_json, generate, join_url, query_escape, read_tags, resolve, to_json,
};

// Re-export http types for status codes and headers
pub use wirecall_core::{StatusCode, header};

// Re-export macros
pub use wirecall_macro::{HttpRequest, Record, ResponseTarget};
