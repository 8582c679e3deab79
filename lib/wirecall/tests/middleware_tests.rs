//! Integration tests for middleware functionality.

use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use wirecall::{
    Error, ExtendedLog, HttpClient, HttpRequest, HyperClient, Method, Request, RequestLog,
    RouteInfo, StreamingResponse, execute_with, generate,
    middleware::{Layer, LoggingLayer},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[derive(HttpRequest)]
#[request(method = "GET", path = "/v1/orders/{id}", name = "GetOrder")]
struct GetOrder {
    #[request(path)]
    id: u32,
}

/// Stamps outgoing requests with a header and a request log entry.
#[derive(Clone)]
struct StampLayer(&'static str);

impl<S> Layer<S> for StampLayer {
    type Service = Stamp<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Stamp {
            inner,
            value: self.0,
        }
    }
}

#[derive(Clone)]
struct Stamp<S> {
    inner: S,
    value: &'static str,
}

impl<S> tower::Service<Request<Bytes>> for Stamp<S>
where
    S: tower::Service<Request<Bytes>, Response = StreamingResponse, Error = Error>,
{
    type Response = StreamingResponse;
    type Error = Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        if let Some(log) = request.extensions().get::<Arc<RequestLog>>() {
            log.log(format!("stamp.{}", self.value), true);
        }
        if let Some(route) = request.extensions().get::<RouteInfo>() {
            let name = route.name;
            if let Some(log) = request.extensions().get::<Arc<RequestLog>>() {
                log.log("route", name);
            }
        }
        request
            .append_header("X-Stamp", self.value)
            .expect("valid header");
        self.inner.call(request)
    }
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged": true})))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_logging().build();

    let url = url::Url::parse(&format!("{}/logged", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

/// Debug logging also reports failures without swallowing them.
#[tokio::test]
async fn test_debug_logging_on_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_debug_logging().build();

    let url = url::Url::parse(&format!("{}/broken", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 500);
    assert_eq!(response.body().as_ref(), b"boom");
}

/// Generated requests reach the middleware with their route and request log.
#[tokio::test]
async fn test_layer_sees_route_and_request_log() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/orders/12"))
        .and(header("X-Stamp", "inner"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .layer(StampLayer("inner"))
        .with_logging()
        .build();

    let request = generate(&mock_server.uri(), Some(&GetOrder { id: 12 })).expect("request");
    let log = request
        .extensions()
        .get::<Arc<RequestLog>>()
        .cloned()
        .expect("request log");

    let mut value = serde_json::Value::Null;
    execute_with(&client, request, Some(&mut value))
        .await
        .expect("call");

    let entries = log.get_all();
    assert_eq!(entries.get("stamp.inner"), Some(&serde_json::json!(true)));
    assert_eq!(entries.get("route"), Some(&serde_json::json!("GetOrder")));
}

/// Test multiple layers composed together.
#[tokio::test]
async fn test_middleware_composition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/orders/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .layer(StampLayer("first"))
        .layer(LoggingLayer::debug())
        .layer(StampLayer("second"))
        .build();

    let request = generate(&mock_server.uri(), Some(&GetOrder { id: 3 })).expect("request");
    let log = request
        .extensions()
        .get::<Arc<RequestLog>>()
        .cloned()
        .expect("request log");

    let response = client.execute(request).await.expect("response");
    assert!(response.is_success());

    let received = mock_server
        .received_requests()
        .await
        .expect("recorded requests");
    let stamps: Vec<_> = received
        .first()
        .expect("one request")
        .headers
        .get_all("x-stamp")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    // The last layer added runs first.
    assert_eq!(stamps, ["second", "first"]);
    assert_eq!(log.len(), 3);
}

/// Calls are single-attempt: a server error is not retried.
#[tokio::test]
async fn test_no_retry_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_logging().build();

    let url = url::Url::parse(&format!("{}/error", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 503);
}
