//! Integration tests for request execution using wiremock.

use assert2::{check, let_assert};
use bytes::Bytes;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use wirecall::{
    ApiClient, BoxError, CaptureBody, ClientConfig, Error, ErrorResponse, HttpClient, HttpRequest,
    HyperClient, Method, Request, ResponseTarget, StreamingBody, UnmarshalBody, do_request,
    execute, execute_with, generate,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

// ============================================================================
// Records
// ============================================================================

#[derive(HttpRequest)]
#[request(method = "GET", path = "/v1/{org}/items/{id}", name = "GetItem")]
struct GetItem {
    #[request(path, required)]
    org: String,
    #[request(path)]
    id: u64,
    #[request(query)]
    verbose: bool,
    #[request(header, alias = "X-Trace")]
    trace: Option<String>,
    #[request(cookie)]
    session: String,
}

impl GetItem {
    fn new(id: u64) -> Self {
        Self {
            org: "acme".to_string(),
            id,
            verbose: true,
            trace: Some("t-1".to_string()),
            session: "s1".to_string(),
        }
    }
}

#[derive(Serialize, HttpRequest)]
#[request(method = "POST", path = "/v1/items", json_body)]
struct CreateItem {
    #[serde(rename = "Name")]
    name: String,
    #[serde(skip)]
    #[request(header, alias = "X-Request-Id")]
    request_id: String,
}

#[derive(HttpRequest)]
#[request(method = "DELETE", path = "/v1/items/{id}")]
struct DeleteItem {
    #[request(path)]
    id: u64,
}

#[derive(HttpRequest)]
#[request(method = "GET", path = "/v1/items")]
struct ListItems {
    #[request(header, required, alias = "X-Token")]
    token: Option<String>,
}

// ============================================================================
// Targets
// ============================================================================

#[derive(Debug, Default, PartialEq, Eq, Deserialize, ResponseTarget)]
struct Item {
    id: u64,
    name: String,
}

#[derive(Debug, Default, Deserialize, ResponseTarget)]
struct Listing {
    #[serde(default)]
    items: Vec<String>,
    #[serde(skip)]
    #[response(status, error)]
    failure: ErrorResponse,
}

#[derive(Debug, Default, Deserialize, ResponseTarget)]
struct Coded {
    name: String,
    #[serde(skip)]
    #[response(status)]
    code: u16,
}

#[derive(Default, ResponseTarget)]
#[response(capture)]
struct Raw {
    body: Option<StreamingBody>,
}

impl CaptureBody for Raw {
    fn capture(&mut self, body: StreamingBody) -> Result<(), BoxError> {
        self.body = Some(body);
        Ok(())
    }
}

#[derive(Default, ResponseTarget)]
#[response(unmarshal)]
struct Lines {
    lines: Vec<String>,
}

impl UnmarshalBody for Lines {
    fn unmarshal_body(&mut self, body: &[u8]) -> Result<(), BoxError> {
        let text = std::str::from_utf8(body)?;
        self.lines = text.lines().map(str::to_string).collect();
        Ok(())
    }
}

#[derive(Default, ResponseTarget)]
#[response(unmarshal)]
struct Rejecting;

impl UnmarshalBody for Rejecting {
    fn unmarshal_body(&mut self, _body: &[u8]) -> Result<(), BoxError> {
        Err("no thanks".into())
    }
}

// ============================================================================
// Request generation on the wire
// ============================================================================

#[tokio::test]
async fn fields_reach_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acme/items/7"))
        .and(query_param("verbose", "true"))
        .and(header("X-Trace", "t-1"))
        .and(header("Cookie", "session=s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "name": "anvil"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut item = Item::default();
    let result = do_request(&mock_server.uri(), &GetItem::new(7), Some(&mut item), None).await;

    let_assert!(Ok(()) = result);
    check!(
        item == Item {
            id: 7,
            name: "anvil".to_string()
        }
    );
}

#[tokio::test]
async fn whole_record_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/items"))
        .and(header("Content-Type", "application/json"))
        .and(header("X-Request-Id", "r-9"))
        .and(body_json(serde_json::json!({"Name": "anvil"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "name": "anvil"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = CreateItem {
        name: "anvil".to_string(),
        request_id: "r-9".to_string(),
    };
    let mut item = Item::default();
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &record, Some(&mut item), None).await);
    check!(item.id == 1);
}

#[tokio::test]
async fn required_field_fails_before_any_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = do_request::<_, ()>(
        &mock_server.uri(),
        &ListItems { token: None },
        None,
        None,
    )
    .await;

    let_assert!(Err(err) = result);
    check!(
        err.to_string()
            == "client field assignment failed, for client ListItems: \
                required header not found or not set: X-Token"
    );
}

// ============================================================================
// Result targets
// ============================================================================

#[tokio::test]
async fn missing_target_turns_non_200_into_error_carrier() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/items/3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = do_request::<_, ()>(&mock_server.uri(), &DeleteItem { id: 3 }, None, None).await;

    let_assert!(Err(Error::Status(carrier)) = result);
    check!(carrier.status_code() == 404);
    check!(carrier.to_string() == "Not Found");
}

#[tokio::test]
async fn missing_target_keeps_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(409).set_body_string("locked"))
        .mount(&mock_server)
        .await;

    let result = do_request::<_, ()>(&mock_server.uri(), &DeleteItem { id: 3 }, None, None).await;

    let_assert!(Err(err) = result);
    check!(err.status() == Some(409));
    check!(err.to_string() == "Conflict: locked");
}

#[tokio::test]
async fn missing_target_accepts_200() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ignored"))
        .mount(&mock_server)
        .await;

    let result = do_request::<_, ()>(&mock_server.uri(), &DeleteItem { id: 3 }, None, None).await;
    let_assert!(Ok(()) = result);
}

#[tokio::test]
async fn other_success_statuses_are_errors_without_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let result = do_request::<_, ()>(&mock_server.uri(), &DeleteItem { id: 3 }, None, None).await;
    let_assert!(Err(err) = result);
    check!(err.status() == Some(204));
}

#[tokio::test]
async fn error_receiver_gets_body_and_decoding_continues() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"items":["stale"]}"#))
        .mount(&mock_server)
        .await;

    let mut listing = Listing::default();
    let record = ListItems {
        token: Some("tok".to_string()),
    };
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &record, Some(&mut listing), None).await);

    let_assert!(Some(failure) = listing.failure.failed());
    check!(failure.status_code() == 503);
    check!(failure.to_string() == r#"from response: {"items":["stale"]}"#);
    check!(listing.items == ["stale"]);
}

#[tokio::test]
async fn error_receiver_untouched_on_200() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items":["a","b"]}"#))
        .mount(&mock_server)
        .await;

    let mut listing = Listing::default();
    let record = ListItems {
        token: Some("tok".to_string()),
    };
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &record, Some(&mut listing), None).await);

    check!(listing.failure.failed().is_none());
    check!(listing.failure.status_code() == 200);
    check!(listing.items.len() == 2);
}

#[tokio::test]
async fn status_receiver_survives_decoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"name":"made"}"#))
        .mount(&mock_server)
        .await;

    let mut coded = Coded::default();
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &GetItem::new(1), Some(&mut coded), None).await);
    check!(coded.code == 201);
    check!(coded.name == "made");
}

#[tokio::test]
async fn capture_takes_the_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("raw bytes, not JSON"))
        .mount(&mock_server)
        .await;

    let mut raw = Raw::default();
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &GetItem::new(1), Some(&mut raw), None).await);

    let_assert!(Some(mut body) = raw.body.take());
    let mut collected = Vec::new();
    while let Some(chunk) = body.next().await {
        let_assert!(Ok(chunk) = chunk);
        collected.extend_from_slice(&chunk);
    }
    check!(collected == b"raw bytes, not JSON");
}

#[tokio::test]
async fn builtin_capture_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("streamed"))
        .mount(&mock_server)
        .await;

    let mut body: Option<StreamingBody> = None;
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &GetItem::new(1), Some(&mut body), None).await);
    check!(body.is_some());
}

#[tokio::test]
async fn custom_unmarshal_replaces_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first\nsecond"))
        .mount(&mock_server)
        .await;

    let mut lines = Lines::default();
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &GetItem::new(1), Some(&mut lines), None).await);
    check!(lines.lines == ["first", "second"]);
}

#[tokio::test]
async fn custom_unmarshal_failure_names_the_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let mut target = Rejecting;
    let result = do_request(&mock_server.uri(), &GetItem::new(1), Some(&mut target), None).await;

    let_assert!(Err(err) = result);
    let message = err.to_string();
    check!(message.starts_with("unable to decode response body for GET "));
    check!(message.contains("/v1/acme/items/1"));
    check!(message.ends_with("due to no thanks"));
}

#[tokio::test]
async fn json_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let mut item = Item::default();
    let result = do_request(&mock_server.uri(), &GetItem::new(1), Some(&mut item), None).await;

    let_assert!(Err(Error::Decode { .. }) = result);
}

#[tokio::test]
async fn dynamic_json_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"any":[1,2]}"#))
        .mount(&mock_server)
        .await;

    let mut value = serde_json::Value::Null;
    let_assert!(Ok(()) = do_request(&mock_server.uri(), &GetItem::new(1), Some(&mut value), None).await);
    check!(value["any"][1] == 2);
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn execute_with_explicit_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acme/items/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":5,"name":"x"}"#))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_logging().build();
    let_assert!(Ok(request) = generate(&mock_server.uri(), Some(&GetItem::new(5))));

    let mut item = Item::default();
    let_assert!(Ok(()) = execute_with(&client, request, Some(&mut item)).await);
    check!(item.id == 5);
}

#[tokio::test]
async fn dedicated_transport_per_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":2,"name":"y"}"#))
        .mount(&mock_server)
        .await;

    let transport = ClientConfig::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build();
    let_assert!(Ok(request) = generate(&mock_server.uri(), Some(&GetItem::new(2))));

    let mut item = Item::default();
    let_assert!(Ok(()) = execute(request, Some(&mut item), Some(&transport)).await);
    check!(item.name == "y");
}

#[tokio::test]
async fn api_client_binds_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acme/items/9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":9,"name":"z"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let_assert!(Ok(client) = ApiClient::new(HyperClient::new(), mock_server.uri()));
    let mut item = Item::default();
    let_assert!(Ok(()) = client.call(&GetItem::new(9), Some(&mut item)).await);
    check!(item.id == 9);
}

#[tokio::test]
async fn buffered_execution() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let_assert!(Ok(url) = url::Url::parse(&format!("{}/plain", mock_server.uri())));
    let request = Request::builder(Method::Get, url).build();

    let_assert!(Ok(response) = client.execute(request).await);
    check!(response.status() == 200);
    check!(response.body() == &Bytes::from_static(b"hello"));
}

#[tokio::test]
async fn timeout_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(std::time::Duration::from_millis(100))
        .build();
    let_assert!(Ok(request) = generate(&mock_server.uri(), Some(&GetItem::new(1))));

    let result = execute_with(&client, request, None::<&mut ()>).await;
    let_assert!(Err(err) = result);
    check!(err.is_timeout());
}

#[tokio::test]
async fn connection_error_is_returned_as_is() {
    let result = do_request::<_, ()>("http://127.0.0.1:1", &DeleteItem { id: 1 }, None, None).await;

    let_assert!(Err(err) = result);
    check!(err.is_connection(), "expected connection error, got: {err}");
}

#[test]
fn targets_expose_their_capabilities() {
    let mut listing = Listing::default();
    check!(listing.status_receiver().is_some());
    check!(listing.error_receiver().is_some());
    check!(listing.body_capture().is_none());
    check!(listing.custom_unmarshal().is_none());

    let mut raw = Raw::default();
    check!(raw.body_capture().is_some());
}
