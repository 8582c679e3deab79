//! Request generation: from a tagged record to an outbound [`Request`].
//!
//! [`generate`] runs, in order:
//!
//! 1. validation (unless the record opts out),
//! 2. base URL + path template join,
//! 3. the pre-built request shortcut, when the record provides one,
//! 4. the whole-record JSON body, when the record opts in,
//! 5. field assignment.

use bytes::Bytes;
use derive_more::{Display, Error};
use tracing::debug;

use crate::{BoxError, Error, JsonBody, Record, Request, RequestLog, Result, RouteInfo, assign};

// ============================================================================
// Capabilities
// ============================================================================

/// Client-side validation of a request record.
pub trait Validate {
    /// Check the record before any request is built.
    ///
    /// # Errors
    ///
    /// Any error aborts generation with [`Error::Validation`].
    fn validate(&self) -> std::result::Result<(), BoxError>;
}

/// A record that builds its own request.
///
/// Only the URL and the method of the returned request are overwritten; no
/// field assignment happens.
pub trait BuildRequest {
    /// Build the request.
    ///
    /// # Errors
    ///
    /// Any error aborts generation with [`Error::InvalidRequest`].
    fn build_request(&self) -> Result<Request<Bytes>>;
}

/// A tagged record describing one HTTP call.
///
/// Usually derived:
///
/// ```ignore
/// use wirecall::HttpRequest;
///
/// #[derive(HttpRequest)]
/// #[request(method = "GET", path = "/v1/items/{id}")]
/// struct GetItem {
///     #[request(path, required)]
///     id: u64,
///     #[request(header, alias = "X-Trace")]
///     trace: Option<String>,
/// }
/// ```
pub trait HttpRequest: Record {
    /// Method, path template and logical name.
    fn route(&self) -> RouteInfo;

    /// Client-side validation, when the record has some.
    fn validator(&self) -> Option<&dyn Validate> {
        None
    }

    /// Bypass [`HttpRequest::validator`].
    fn skip_client_validation(&self) -> bool {
        false
    }

    /// Pre-built request shortcut.
    fn request_builder(&self) -> Option<&dyn BuildRequest> {
        None
    }

    /// Serialize the whole record as the JSON body.
    fn json_body(&self) -> Option<&dyn JsonBody> {
        None
    }
}

// ============================================================================
// Generate
// ============================================================================

/// A generation failure, with the partially built request when there is one.
#[derive(Debug, Display, Error)]
#[display("{error}")]
pub struct GenerateError {
    #[error(source)]
    error: Error,
    #[error(not(source))]
    partial: Option<Box<Request<Bytes>>>,
}

impl GenerateError {
    fn new(error: Error) -> Self {
        Self {
            error,
            partial: None,
        }
    }

    fn with_partial(error: Error, request: Request<Bytes>) -> Self {
        Self {
            error,
            partial: Some(Box::new(request)),
        }
    }

    /// The underlying error.
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.error
    }

    /// The request as it was when field assignment failed.
    #[must_use]
    pub fn partial_request(&self) -> Option<&Request<Bytes>> {
        self.partial.as_deref()
    }

    /// Split into the error and the partial request.
    #[must_use]
    pub fn into_parts(self) -> (Error, Option<Request<Bytes>>) {
        (self.error, self.partial.map(|request| *request))
    }
}

impl From<GenerateError> for Error {
    fn from(err: GenerateError) -> Self {
        err.error
    }
}

/// Join a base URL and a path template with exactly one `/`.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Build the outbound request for a record.
///
/// The request carries the record's [`RouteInfo`] and a fresh shared
/// [`RequestLog`] in its extensions.
///
/// # Errors
///
/// - no record: [`Error::InvalidRequest`]
/// - validation failure: [`Error::Validation`]
/// - base URL and path do not form a URL: [`Error::InvalidUrl`]
/// - pre-built request failure: [`Error::InvalidRequest`]
/// - whole-record body serialization: [`Error::JsonSerialization`]
/// - field assignment: [`Error::Assignment`], with the partial request
pub fn generate<R: HttpRequest>(
    base_url: &str,
    record: Option<&R>,
) -> std::result::Result<Request<Bytes>, GenerateError> {
    let Some(record) = record else {
        return Err(GenerateError::new(Error::invalid_request(
            "no request record supplied",
        )));
    };
    let route = record.route();

    if !record.skip_client_validation()
        && let Some(validator) = record.validator()
    {
        validator
            .validate()
            .map_err(|err| GenerateError::new(Error::validation(err)))?;
    }

    let joined = join_url(base_url, route.path);
    let url = url::Url::parse(&joined)
        .map_err(|err| GenerateError::new(Error::invalid_url(&joined, err)))?;

    if let Some(builder) = record.request_builder() {
        let mut request = builder.build_request().map_err(|err| {
            GenerateError::new(Error::invalid_request(format!(
                "client generation failed [{joined}] {err}: malformed request"
            )))
        })?;
        request.set_url(url);
        request.set_method(route.method);
        attach_metadata(&mut request, route);
        debug!(
            name = route.name,
            method = %route.method,
            url = %request.url(),
            "using pre-built request"
        );
        return Ok(request);
    }

    let mut request = Request::builder(route.method, url).build();
    attach_metadata(&mut request, route);

    if let Some(body) = record.json_body() {
        let bytes = body.to_json_bytes().map_err(GenerateError::new)?;
        request.set_json_body(bytes);
    }

    if let Err(err) = assign(&mut request, record) {
        debug!(name = route.name, error = %err, "field assignment failed");
        return Err(GenerateError::with_partial(
            Error::assignment(route.name, err),
            request,
        ));
    }

    debug!(
        name = route.name,
        method = %route.method,
        url = %request.url(),
        headers = request.headers().len(),
        has_body = request.body().is_some(),
        "generated request"
    );
    Ok(request)
}

fn attach_metadata(request: &mut Request<Bytes>, route: RouteInfo) {
    request.extensions_mut().insert(route);
    request.extensions_mut().insert(RequestLog::shared());
}
