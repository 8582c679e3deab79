//! Request execution: send a generated request and fill the result target.
//!
//! The target's capabilities are consulted in a fixed order:
//!
//! 1. status receiver, from the response status,
//! 2. raw-body capture, which takes the body stream and ends the call,
//! 3. error receiver, for any status other than 200,
//! 4. custom unmarshal, used instead of JSON decoding,
//! 5. JSON decoding.
//!
//! Without a target, any status other than 200 is an
//! [`Error::Status`] carrying an [`ErrorResponse`].

use std::sync::OnceLock;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::{
    ClientConfig, Error, ErrorResponse, HttpClientStreaming, HttpRequest, HyperClient, Method,
    Request, ResponseTarget, Result, StreamingResponse, TransportConfig, generate,
};

/// Shared transport used when no [`TransportConfig`] is given.
fn default_client() -> &'static HyperClient {
    static CLIENT: OnceLock<HyperClient> = OnceLock::new();
    CLIENT.get_or_init(HyperClient::new)
}

/// Send `request` and fill `target` from the response.
///
/// Uses a shared default transport, or a dedicated one built from
/// `transport` (e.g. HTTP/2 only with custom TLS settings).
///
/// # Example
///
/// ```ignore
/// let request = wirecall::generate("https://api.example.com", Some(&GetUser { id: 42 }))?;
/// let mut user = User::default();
/// wirecall::execute(request, Some(&mut user), None).await?;
/// ```
///
/// # Errors
///
/// - transport failure, returned as is
/// - [`Error::Capture`], [`Error::BodyRead`] or [`Error::Decode`], naming the
///   method and URL
/// - [`Error::Status`] when there is no target and the status is not 200
pub async fn execute<T>(
    request: Request<Bytes>,
    target: Option<&mut T>,
    transport: Option<&TransportConfig>,
) -> Result<()>
where
    T: ResponseTarget + ?Sized,
{
    match transport {
        Some(config) => {
            let client = HyperClient::with_config(config.clone());
            execute_with(&client, request, target).await
        }
        None => execute_with(default_client(), request, target).await,
    }
}

/// Send `request` with `client` and fill `target` from the response.
///
/// # Errors
///
/// See [`execute`].
pub async fn execute_with<C, T>(
    client: &C,
    request: Request<Bytes>,
    target: Option<&mut T>,
) -> Result<()>
where
    C: HttpClientStreaming + ?Sized,
    T: ResponseTarget + ?Sized,
{
    let method = request.method();
    let url = request.url().clone();

    let response = client.execute_streaming(request).await?;
    let status = response.status();
    debug!(%method, %url, status, "response received");

    let Some(target) = target else {
        let body = read_body(response, method, &url).await?;
        if status != 200 {
            warn!(%method, %url, status, "non-200 response without a result target");
            return Err(Error::Status(ErrorResponse::from_status(status, &body)));
        }
        return Ok(());
    };

    if let Some(receiver) = target.status_receiver() {
        receiver.receive_status(status);
    }

    if let Some(capture) = target.body_capture() {
        debug!(%method, %url, "handing over the response body");
        return capture
            .capture(response.into_body())
            .map_err(|err| Error::capture(method, &url, err));
    }

    let body = read_body(response, method, &url).await?;

    if status != 200
        && let Some(receiver) = target.error_receiver()
    {
        debug!(%method, %url, status, "filling error receiver");
        receiver.receive_error(
            status,
            format!("from response: {}", String::from_utf8_lossy(&body)),
        );
    }

    if let Some(unmarshal) = target.custom_unmarshal() {
        return unmarshal.unmarshal_body(&body).map_err(|err| {
            warn!(%method, %url, error = %err, "custom decoding failed");
            Error::decode(method, &url, err)
        });
    }

    target.decode_json(&body).map_err(|err| {
        warn!(%method, %url, error = %err, "JSON decoding failed");
        Error::decode(method, &url, err)
    })
}

async fn read_body(response: StreamingResponse, method: Method, url: &url::Url) -> Result<Bytes> {
    response
        .collect()
        .await
        .map(crate::Response::into_body)
        .map_err(|err| Error::body_read(method, url, err))
}

/// Generate the request for `record` and execute it.
///
/// # Errors
///
/// Generation errors (see [`generate`]) and execution errors (see [`execute`]).
pub async fn do_request<R, T>(
    base_url: &str,
    record: &R,
    target: Option<&mut T>,
    transport: Option<&ClientConfig>,
) -> Result<()>
where
    R: HttpRequest,
    T: ResponseTarget + ?Sized,
{
    let request = generate(base_url, Some(record))?;
    execute(request, target, transport).await
}
