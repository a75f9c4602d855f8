// Router tests for the relay endpoints.
//
// A scripted gateway stands in for the AI API so every status path can be
// driven without a network. Requests go through the full Axum router via
// tower's `oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use safeguard::config::Config;
use safeguard::gateway::traits::{ChatCompletion, GatewayError};
use safeguard::gateway::types::{ChatRequest, MessageContent};
use safeguard::relay::{build_router, AppState, ALLOW_HEADERS, MAX_BODY_BYTES};

type Script = Box<dyn Fn() -> Result<Option<String>, GatewayError> + Send + Sync>;

struct ScriptedGateway {
    script: Script,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedGateway {
    fn new(script: impl Fn() -> Result<Option<String>, GatewayError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn replying(content: &str) -> Arc<Self> {
        let content = content.to_string();
        Self::new(move || Ok(Some(content.clone())))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletion for ScriptedGateway {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        (self.script)()
    }
}

fn app(gateway: Arc<ScriptedGateway>) -> Router {
    build_router(AppState::new(Config::default(), gateway))
}

async fn post(app: Router, path: &str, body: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, value)
}

fn assert_cors(headers: &axum::http::HeaderMap) {
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
}

const SAFE_REPLY: &str =
    r#"{"toxicityScore":0,"issues":[],"overallSafe":true,"friendlyMessage":"ok"}"#;

#[tokio::test]
async fn text_success_returns_verdict() {
    let gateway = ScriptedGateway::replying(
        r#"```json
{"toxicityScore":72,"issues":[{"harmType":"abuse","severity":"high","content":"you're worthless","reason":"Bullying","explanation":"Words like this can really hurt."}],"overallSafe":false,"friendlyMessage":"Let's talk about this."}
```"#,
    );
    let (status, headers, body) =
        post(app(gateway.clone()), "/analyze-text", r#"{"text":"you're worthless"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);
    assert_eq!(body["toxicityScore"], 72);
    assert_eq!(body["overallSafe"], false);
    assert_eq!(body["issues"][0]["harmType"], "abuse");
    assert_eq!(body["issues"][0]["severity"], "high");
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn text_request_embeds_text_in_user_message() {
    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    post(app(gateway.clone()), "/analyze-text", r#"{"text":"hello there"}"#).await;

    let request = gateway.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.model, Config::default().model);
    match &request.messages[1].content {
        MessageContent::Text(text) => assert!(text.ends_with("\n\nhello there")),
        other => panic!("expected text content, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_body_is_rejected_without_upstream_call() {
    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    let (status, headers, body) = post(app(gateway.clone()), "/analyze-text", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_cors(&headers);
    assert_eq!(body["error"], "Please provide text to analyze");
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn non_string_text_is_rejected() {
    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    let (status, _, body) = post(app(gateway.clone()), "/analyze-text", r#"{"text": 7}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn malformed_json_body_is_rejected() {
    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    let (status, _, body) = post(app(gateway.clone()), "/analyze-text", "text=hi").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must be valid JSON");
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn image_without_source_is_rejected() {
    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    let (status, headers, body) = post(app(gateway.clone()), "/analyze-image", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_cors(&headers);
    assert_eq!(body["error"], "Please provide an image to analyze (base64 or URL)");
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn image_url_is_attached_inline() {
    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    let (status, _, _) = post(
        app(gateway.clone()),
        "/analyze-image",
        r#"{"imageUrl":"https://example.com/cat.png"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let request = gateway.last_request.lock().unwrap().clone().unwrap();
    let user = serde_json::to_value(&request.messages[1]).unwrap();
    assert_eq!(user["content"][1]["type"], "image_url");
    assert_eq!(user["content"][1]["image_url"]["url"], "https://example.com/cat.png");
}

#[tokio::test]
async fn upstream_rate_limit_passes_through() {
    let gateway = ScriptedGateway::new(|| Err(GatewayError::RateLimited));
    let (status, headers, body) = post(app(gateway), "/analyze-text", r#"{"text":"hi"}"#).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_cors(&headers);
    assert_eq!(body["error"], "Rate limit exceeded. Please try again in a moment.");
}

#[tokio::test]
async fn upstream_quota_passes_through() {
    let gateway = ScriptedGateway::new(|| Err(GatewayError::QuotaExceeded));
    let (status, _, body) = post(app(gateway), "/analyze-image", r#"{"imageUrl":"https://x/y.png"}"#).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error"], "AI usage limit reached. Please try again later.");
}

#[tokio::test]
async fn other_upstream_failures_become_500() {
    let gateway = ScriptedGateway::new(|| {
        Err(GatewayError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "bad gateway".to_string(),
        })
    });
    let (status, headers, body) = post(app(gateway), "/analyze-text", r#"{"text":"hi"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&headers);
    assert_eq!(body["error"], "AI Gateway error: 502");
}

#[tokio::test]
async fn missing_api_key_is_a_500() {
    let gateway = ScriptedGateway::new(|| Err(GatewayError::MissingApiKey));
    let (status, _, body) = post(app(gateway), "/analyze-text", r#"{"text":"hi"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "SAFEGUARD_API_KEY is not configured");
}

#[tokio::test]
async fn unparseable_reply_fails_open() {
    let gateway = ScriptedGateway::replying("not json at all");
    let (status, _, body) = post(app(gateway), "/analyze-text", r#"{"text":"hi"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "toxicityScore": 0,
            "issues": [],
            "overallSafe": true,
            "friendlyMessage": "We analyzed the content but couldn't determine specific issues. The content may be safe."
        })
    );
}

#[tokio::test]
async fn absent_reply_fails_open_with_image_copy() {
    let gateway = ScriptedGateway::new(|| Ok(None));
    let (status, _, body) = post(app(gateway), "/analyze-image", r#"{"imageBase64":"data:image/png;base64,AA"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallSafe"], true);
    assert_eq!(
        body["friendlyMessage"],
        "We analyzed the image but couldn't determine specific issues. The image may be safe."
    );
}

#[tokio::test]
async fn preflight_is_empty_200_with_cors() {
    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    for path in ["/analyze-text", "/analyze-image"] {
        let response = app(gateway.clone())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(response.headers());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn health_is_ok() {
    let response = app(ScriptedGateway::replying(SAFE_REPLY))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(response.headers());
}

#[tokio::test]
async fn phone_sized_image_is_accepted() {
    // ~4 MiB of base64, what a 3 MB photo turns into
    let payload = "A".repeat(4 * 1024 * 1024);
    let body = format!(r#"{{"imageBase64":"data:image/jpeg;base64,{payload}"}}"#);

    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    let (status, headers, verdict) = post(app(gateway.clone()), "/analyze-image", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);
    assert_eq!(verdict["overallSafe"], true);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn oversized_body_is_a_json_error() {
    let payload = "A".repeat(MAX_BODY_BYTES);
    let body = format!(r#"{{"imageBase64":"data:image/jpeg;base64,{payload}"}}"#);

    let gateway = ScriptedGateway::replying(SAFE_REPLY);
    let (status, headers, verdict) = post(app(gateway.clone()), "/analyze-image", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_cors(&headers);
    assert_eq!(verdict["error"], "Request body is too large");
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn wrong_method_still_carries_cors() {
    let response = app(ScriptedGateway::replying(SAFE_REPLY))
        .oneshot(Request::builder().uri("/analyze-text").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(response.headers());
}

#[tokio::test]
async fn unknown_path_still_carries_cors() {
    let response = app(ScriptedGateway::replying(SAFE_REPLY))
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_cors(response.headers());
}
