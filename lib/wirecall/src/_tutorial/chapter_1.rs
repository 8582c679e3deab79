//! # Chapter 1: Field Placements
//!
//! A field's `#[request(...)]` tag decides where its value goes.
//!
//! ## Placements
//!
//! | Tag | Destination | Example |
//! |-----|-------------|---------|
//! | `path` | `{name}` placeholder | `/users/{id}` → `/users/42` |
//! | `query` | query parameter | `?page=2` |
//! | `header` | request header | `X-Trace: abc` |
//! | `cookie` | `Cookie` header entry | `session=s1` |
//! | `form` | whole body, as JSON | `{"name":"x"}` |
//!
//! Add `required` to fail before any network call when the value is absent
//! or empty:
//!
//! ```ignore
//! #[derive(HttpRequest)]
//! #[request(method = "GET", path = "/v1/{org}/items")]
//! pub struct ListItems {
//!     #[request(path, required)]
//!     pub org: String,
//!     #[request(query)]
//!     pub page: Option<u32>,
//!     #[request(query, url_encode, alias = "q")]
//!     pub search: Option<String>,
//!     #[request(header, alias = "X-Trace")]
//!     pub trace: Option<String>,
//!     #[request(cookie)]
//!     pub session: Option<String>,
//! }
//! ```
//!
//! Fields without a tag are ignored.
//!
//! ## Wire Names
//!
//! The wire name is the `alias`, else the `serde` name, else the field name:
//!
//! ```ignore
//! #[derive(Serialize, HttpRequest)]
//! #[serde(rename_all = "camelCase")]
//! #[request(method = "GET", path = "/v1/items")]
//! pub struct Search {
//!     #[request(query)]
//!     pub page_size: u32, // ?pageSize=...
//! }
//! ```
//!
//! A structured tag works too, and wins over `#[request]`:
//! `#[schema(query = "page_size", required)]`.
//!
//! ## Values
//!
//! Integers, floats, booleans and strings are written as text. Sequences are
//! written as JSON arrays. `None` counts as absent.
//!
//! ## Bodies
//!
//! Send the whole record as JSON, while path, header and query fields still
//! apply:
//!
//! ```ignore
//! #[derive(Serialize, HttpRequest)]
//! #[request(method = "POST", path = "/v1/items", json_body)]
//! pub struct CreateItem {
//!     #[serde(rename = "Name")]
//!     pub name: String,
//!     #[serde(skip)]
//!     #[request(header, alias = "X-Request-Id")]
//!     pub request_id: Option<String>,
//! }
//! ```
//!
//! Or tag one field with `form` to make it the body.
//!
//! ## Embedded Records
//!
//! `#[request(nested)]` (or `#[serde(flatten)]`) walks into another record,
//! handy for fields shared across requests.
//!
//! ## Next Steps
//!
//! - [Chapter 2: Responses & Transport][super::chapter_2] - Targets, errors, HTTP/2
