//! Derive macros for wirecall tag-driven HTTP records.
//!
//! This crate provides:
//! - `#[derive(Record)]` - field placement table for the field assigner
//! - `#[derive(HttpRequest)]` - a `Record` plus its route and record-level capabilities
//! - `#[derive(ResponseTarget)]` - a decoding target with optional capabilities
//!
//! # Example
//!
//! ```ignore
//! use wirecall::prelude::*;
//!
//! #[derive(HttpRequest)]
//! #[request(method = "GET", path = "/v1/users/{id}")]
//! struct GetUser {
//!     #[request(path, required)]
//!     id: u64,
//!     #[request(header, alias = "X-Trace")]
//!     trace: Option<String>,
//! }
//!
//! #[derive(serde::Deserialize, ResponseTarget)]
//! struct User {
//!     name: String,
//! }
//! ```

mod attrs;
mod record_derive;
mod rename;
mod response_derive;

use proc_macro::TokenStream;

/// Derive `Record` (and `NestedRecord`) for a struct with named fields.
///
/// # Field Attributes
///
/// - `#[request(cookie | header | query | path | form)]` - placement,
///   add `required` to reject absent or empty values
/// - `#[request(part = "header!")]` - placement as a raw tag
/// - `#[request(alias = "X-Name")]` - wire name
/// - `#[request(url_encode)]` or `#[request(url_encode = "true")]` - query-escape the value
/// - `#[request(json)]` - render the value as JSON
/// - `#[request(nested)]` or `#[serde(flatten)]` - walk an embedded record
/// - `#[schema(query = "name", required)]` - structured tag, takes precedence
///
/// `#[serde(rename)]`, `#[serde(skip)]` and the struct-level
/// `#[serde(rename_all)]` provide the serialization alias, used as the wire
/// name when no `alias` is given. Fields without a placement are ignored.
///
/// # Example
///
/// ```ignore
/// #[derive(Record)]
/// struct Paging {
///     #[request(query)]
///     page: u32,
///     #[schema(query = "per_page")]
///     size: Option<u32>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(request, schema))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record_derive::expand_record(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `HttpRequest`, together with `Record` and `NestedRecord`.
///
/// # Struct Attributes
///
/// - `#[request(method = "GET", path = "/v1/items/{id}")]` - route (required)
/// - `#[request(name = "GetItem")]` - diagnostic name, defaults to the type name
/// - `#[request(json_body)]` - send the whole record as the JSON body
/// - `#[request(validate)]` - the record implements `Validate`
/// - `#[request(skip_client_validation)]` - never run the validator
/// - `#[request(build_request)]` - the record implements `BuildRequest`
///
/// Field attributes are those of `#[derive(Record)]`.
///
/// # Example
///
/// ```ignore
/// #[derive(serde::Serialize, HttpRequest)]
/// #[request(method = "POST", path = "/v1/items", json_body)]
/// struct CreateItem {
///     #[serde(rename = "Name")]
///     name: String,
///     #[serde(skip)]
///     #[request(header, alias = "X-Request-Id")]
///     request_id: Option<String>,
/// }
/// ```
#[proc_macro_derive(HttpRequest, attributes(request, schema))]
pub fn derive_http_request(input: TokenStream) -> TokenStream {
    record_derive::expand_http_request(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `ResponseTarget`.
///
/// The target is JSON-decoded with `serde` unless it captures or unmarshals
/// the body itself. Capability fields keep the value set by the executor.
///
/// # Attributes
///
/// - `#[response(status)]` on a field - receives the status code
/// - `#[response(error)]` on a field - receives non-200 error details
/// - `#[response(capture)]` on the struct - the type implements `CaptureBody`
/// - `#[response(unmarshal)]` on the struct - the type implements `UnmarshalBody`
///
/// # Example
///
/// ```ignore
/// #[derive(Default, serde::Deserialize, ResponseTarget)]
/// struct Listing {
///     items: Vec<String>,
///     #[serde(skip)]
///     #[response(status, error)]
///     failure: ErrorResponse,
/// }
/// ```
#[proc_macro_derive(ResponseTarget, attributes(response))]
pub fn derive_response_target(input: TokenStream) -> TokenStream {
    response_derive::expand_response_target(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
