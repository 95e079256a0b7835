use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use bfhl_service::ai::gemini::{GeminiConfig, GeminiGenerator};
use bfhl_service::ai::{GenerationOptions, ProviderError, TextGenerator};
use secrecy::SecretString;
use serde_json::{json, Value};

async fn mock_generate(Json(request): Json<Value>) -> Json<Value> {
    let prompt = request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let answer = if prompt.contains("Maharashtra") {
        "**Mumbai**"
    } else {
        "Unknown"
    };

    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": answer}]},
            "finishReason": "STOP"
        }]
    }))
}

async fn mock_blocked() -> Json<Value> {
    Json(json!({"candidates": [{"finishReason": "SAFETY"}]}))
}

async fn mock_rate_limited() -> StatusCode {
    StatusCode::TOO_MANY_REQUESTS
}

async fn mock_error_page() -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>".repeat(50_000))
}

async fn spawn_mock_gemini() -> String {
    let app = Router::new()
        .route("/v1beta/models/ok-model:generateContent", post(mock_generate))
        .route("/v1beta/models/blocked-model:generateContent", post(mock_blocked))
        .route("/v1beta/models/busy-model:generateContent", post(mock_rate_limited))
        .route("/v1beta/models/broken-model:generateContent", post(mock_error_page));
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v1beta")
}

fn generator(base_url: &str, model: &str) -> GeminiGenerator {
    GeminiGenerator::new(GeminiConfig {
        api_key: Some(SecretString::new("test-key".to_string())),
        model: model.to_string(),
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn e2e_gemini_returns_candidate_text() {
    let base_url = spawn_mock_gemini().await;

    let text = generator(&base_url, "ok-model")
        .generate("Question: capital of Maharashtra?", &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(text, "**Mumbai**");
}

#[tokio::test]
async fn e2e_gemini_safety_block_is_content_filtered() {
    let base_url = spawn_mock_gemini().await;

    let err = generator(&base_url, "blocked-model")
        .generate("q", &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ContentFiltered));
}

#[tokio::test]
async fn e2e_gemini_429_is_rate_limited() {
    let base_url = spawn_mock_gemini().await;

    let err = generator(&base_url, "busy-model")
        .generate("q", &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn e2e_gemini_unknown_model_is_api_error() {
    let base_url = spawn_mock_gemini().await;

    let err = generator(&base_url, "missing-model")
        .generate("q", &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ApiError(_)));
}

#[tokio::test]
async fn e2e_gemini_large_error_page_is_bounded() {
    let base_url = spawn_mock_gemini().await;

    let err = generator(&base_url, "broken-model")
        .generate("q", &GenerationOptions::default())
        .await
        .unwrap_err();

    let message = match err {
        ProviderError::ApiError(message) => message,
        other => panic!("expected ApiError, got {other:?}"),
    };
    assert!(message.contains("500"));
    assert!(message.ends_with("(300000 bytes)"));
    assert!(message.len() < 1_024);
}
