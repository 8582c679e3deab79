//! # Chapter 2: Responses & Transport
//!
//! Fill result targets, read errors, pick a transport.
//!
//! ## Result Targets
//!
//! Any `#[derive(ResponseTarget)]` type is decoded from JSON. Fields can
//! opt into extra details:
//!
//! ```ignore
//! #[derive(Default, Deserialize, ResponseTarget)]
//! pub struct Listing {
//!     pub items: Vec<String>,
//!     #[serde(skip)]
//!     #[response(status, error)]
//!     pub failure: ErrorResponse,
//! }
//!
//! let mut listing = Listing::default();
//! client.call(&ListItems::default(), Some(&mut listing)).await?;
//! if let Some(failure) = listing.failure.failed() {
//!     eprintln!("{} {}", failure.status_code(), failure);
//! }
//! ```
//!
//! | Attribute | Receives |
//! |-----------|----------|
//! | `#[response(status)]` | the status code |
//! | `#[response(error)]` | code + `from response: <body>` when not 200 |
//! | `#[response(capture)]` | the raw body stream, nothing is decoded |
//! | `#[response(unmarshal)]` | the body, decoded by your `UnmarshalBody` |
//!
//! ## No Target
//!
//! Without a target, anything but 200 is an error:
//!
//! ```ignore
//! let err = wirecall::do_request::<_, ()>(base, &DeleteItem { id: 1 }, None, None)
//!     .await
//!     .unwrap_err();
//! assert_eq!(err.status(), Some(404));
//! ```
//!
//! ## Transport
//!
//! Share one client and base URL with [`ApiClient`](crate::ApiClient):
//!
//! ```ignore
//! let http = HyperClient::builder()
//!     .timeout(Duration::from_secs(30))
//!     .with_logging()
//!     .build();
//! let client = ApiClient::new(http, "https://api.example.com")?;
//! ```
//!
//! Or pick an HTTP/2 transport with custom TLS for a single call:
//!
//! ```ignore
//! let transport = ClientConfig::http2_with_tls(tls_config);
//! wirecall::do_request(base, &record, Some(&mut target), Some(&transport)).await?;
//! ```
//!
//! The logging middleware tags each exchange with the record name and path
//! template, then emits the request-scoped [`RequestLog`](crate::RequestLog).
