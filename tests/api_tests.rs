use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Json, Router, routing::post};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use beyondchat_backend::message::Sender;
use beyondchat_backend::routes::create_router;
use beyondchat_backend::services::gemini::{GeminiClient, Provider};
use beyondchat_backend::services::relay::HttpRelay;
use beyondchat_backend::services::session::ChatSession;
use beyondchat_backend::state::AppState;

fn app(provider: Provider) -> Router {
    create_router().with_state(Arc::new(AppState::new(provider)))
}

/// Serve the full backend on an ephemeral port, for tests that go through a
/// real HTTP client instead of `oneshot`.
async fn spawn_app(provider: Provider) -> String {
    spawn_router(app(provider)).await
}

async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Stand-in for the Gemini API: answers every generateContent call with a
/// fixed status and body.
async fn spawn_provider(status: StatusCode, body: Value) -> String {
    let router = Router::new().route(
        "/v1/models/{model}",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    spawn_router(router).await
}

async fn gemini_provider(status: StatusCode, body: Value) -> Provider {
    let base_url = spawn_provider(status, body).await;
    let client = GeminiClient::new(
        "test-key".to_string(),
        "gemini-2.0-flash".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
    .with_base_url(base_url);
    Provider::Gemini(client)
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn unconfigured_provider_returns_fixed_500() {
    let app = app(Provider::Unconfigured);
    let (status, body) = post_chat(app, r#"{"message": "Hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Chat service is not configured properly");
}

#[tokio::test]
async fn non_string_message_is_rejected() {
    // Needs a configured provider: the unconfigured check runs before
    // validation and would mask the 400.
    let provider = gemini_provider(StatusCode::OK, json!({})).await;
    let (status, body) = post_chat(app(provider), r#"{"message": 123}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required and must be a string");
}

#[tokio::test]
async fn missing_and_empty_messages_are_rejected() {
    let provider = gemini_provider(StatusCode::OK, json!({})).await;

    let (status, _) = post_chat(app(provider.clone()), r#"{}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_chat(app(provider), r#"{"message": ""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required and must be a string");
}

#[tokio::test]
async fn successful_completion_returns_text() {
    let provider = gemini_provider(
        StatusCode::OK,
        json!({
            "candidates": [
                {"content": {"parts": [{"text": "Hello back"}]}}
            ]
        }),
    )
    .await;

    let (status, body) = post_chat(
        app(provider),
        r#"{"message": "Hi", "history": [{"role": "user", "content": "previous"}]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Hello back");
}

#[tokio::test]
async fn shape_variant_history_is_tolerated() {
    let provider = gemini_provider(
        StatusCode::OK,
        json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}),
    )
    .await;

    // Three historical shapes plus one droppable entry; none may fail the call.
    let (status, body) = post_chat(
        app(provider),
        r#"{"message": "Hi", "history": [
            {"role": "user", "content": "a"},
            {"sender": "assistant", "parts": [{"text": "b"}]},
            {"role": "model", "parts": "c"},
            {"content": "no role or sender"}
        ]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "ok");
}

#[tokio::test]
async fn api_key_rejection_maps_to_401() {
    let provider = gemini_provider(
        StatusCode::BAD_REQUEST,
        json!({"error": {"message": "API key not valid. Please pass a valid API key."}}),
    )
    .await;

    let (status, body) = post_chat(app(provider), r#"{"message": "Hi"}"#).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or missing API key");
}

#[tokio::test]
async fn missing_model_maps_to_503() {
    let provider = gemini_provider(
        StatusCode::NOT_FOUND,
        json!({"error": {"message": "model not found"}}),
    )
    .await;

    let (status, body) = post_chat(app(provider), r#"{"message": "Hi"}"#).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["error"],
        "The requested AI model is not available. Please try again later."
    );
}

#[tokio::test]
async fn empty_candidates_map_to_500() {
    let provider = gemini_provider(StatusCode::OK, json!({"candidates": []})).await;

    let (status, body) = post_chat(app(provider), r#"{"message": "Hi"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No response text received from the model");
}

#[tokio::test]
async fn unclassified_provider_error_passes_message_through() {
    let provider = gemini_provider(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "quota exceeded"}}),
    )
    .await;

    let (status, body) = post_chat(app(provider), r#"{"message": "Hi"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "quota exceeded");
}

#[tokio::test]
async fn http_relay_session_round_trip() {
    let provider = gemini_provider(
        StatusCode::OK,
        json!({"candidates": [{"content": {"parts": [{"text": "Hello back"}]}}]}),
    )
    .await;
    let base_url = spawn_app(provider).await;

    let mut session = ChatSession::new(HttpRelay::new(base_url));
    session.send_message("Hi").await;

    let log = session.messages();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].sender, Sender::User);
    assert_eq!(log[0].content, "Hi");
    assert_eq!(log[1].sender, Sender::Assistant);
    assert_eq!(log[1].content, "Hello back");
    assert!(session.error().is_none());
}

#[tokio::test]
async fn http_relay_surfaces_structured_errors_to_the_session() {
    let base_url = spawn_app(Provider::Unconfigured).await;

    let mut session = ChatSession::new(HttpRelay::new(base_url));
    session.send_message("Hi").await;

    let log = session.messages();
    assert_eq!(log.len(), 2);
    assert_eq!(
        log[1].content,
        "I'm having trouble connecting to the AI service. Please try again in a moment."
    );
    assert_eq!(session.error(), Some("Chat service is not configured properly"));
}

#[tokio::test]
async fn http_relay_defaults_message_for_unparseable_error_bodies() {
    // A backend that answers with a non-JSON error body.
    let router = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream oops") }),
    );
    let base_url = spawn_router(router).await;

    let mut session = ChatSession::new(HttpRelay::new(base_url));
    session.send_message("Hi").await;

    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.error(), Some("Failed to send message"));
}

#[tokio::test]
async fn error_details_follow_the_development_gate() {
    let provider = gemini_provider(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "quota exceeded"}}),
    )
    .await;

    // APP_ENV is process-global, so both sides of the gate live in one test.
    unsafe { std::env::set_var("APP_ENV", "development") };
    let (status, body) = post_chat(app(provider.clone()), r#"{"message": "Hi"}"#).await;
    unsafe { std::env::remove_var("APP_ENV") };

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let details = body["details"].as_str().expect("details in development");
    assert!(details.contains("quota exceeded"));

    let (status, body) = post_chat(app(provider), r#"{"message": "Hi"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = app(Provider::Unconfigured);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn catalog_endpoints_serve_mock_data() {
    let app = app(Provider::Unconfigured);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/conversations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let conversations: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(conversations.as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/conversations/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
