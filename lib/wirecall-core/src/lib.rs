//! Core types and traits for the wirecall tag-driven HTTP client.
//!
//! This crate holds the field-to-HTTP-part mapping engine; it performs no I/O:
//! - [`convert`] - typed values to wire strings ([`WireValue`], [`ToWireValue`])
//! - [`read_tags`] / [`resolve`] - field tags to a [`Placement`]
//! - [`Record`] / [`assign`] - writing a record's fields into a [`Request`]
//! - [`HttpRequest`] / [`generate`] - from a record to an outbound request
//! - [`ResponseTarget`] - result containers and their optional capabilities
//! - [`ErrorResponse`] / [`BasicResponse`] - the error carrier
//! - [`RequestLog`] - request-scoped key/value log
//! - [`HttpClient`] / [`HttpClientStreaming`] - transport traits
//! - [`Error`] and [`Result`] - error handling

mod assign;
mod body;
mod capture;
mod client;
mod convert;
mod error;
mod generate;
mod log;
mod method;
pub mod prelude;
mod record;
mod request;
mod response;
mod route;
mod tag;

pub use assign::{assign, assign_nested, write_part};
pub use body::{JsonBody, from_json, to_json};
pub use capture::{
    BasicResponse, CaptureBody, ErrorReceiver, ErrorResponse, ResponseTarget, StatusReceiver,
    UnmarshalBody,
};
pub use client::{HttpClient, HttpClientStreaming};
pub use convert::{
    Complex, JSON_ERROR_SENTINEL, ToWireValue, UNSUPPORTED_SENTINEL, WireValue, convert,
    query_escape,
};
pub use error::{BoxError, Error, Result};
pub use generate::{BuildRequest, GenerateError, HttpRequest, Validate, generate, join_url};
pub use log::{ExtendedLog, RequestLog};
pub use method::Method;
pub use record::{
    FieldDescriptor, FieldValue, NestedRecord, Record, RecordDescriptor, ResolvedField,
};
pub use request::{Request, RequestBuilder};
pub use response::{Response, StreamingBody, StreamingResponse};
pub use route::RouteInfo;
pub use tag::{
    FieldTags, Part, Placement, RawPlacement, SchemaTag, Target, parse_bool, read_tags, resolve,
};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
