//! Drives `OpenAiCompatProvider` against a local mock of the
//! chat-completions endpoint.

use std::time::Duration;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use kasa_core::error::ProviderError;
use kasa_core::message::Message;
use kasa_core::provider::{Provider, ProviderRequest};
use kasa_providers::OpenAiCompatProvider;

async fn spawn_mock(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v1")
}

fn provider(base_url: &str, timeout: Duration) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new("mock", base_url, "sk-test", timeout).unwrap()
}

fn request() -> ProviderRequest {
    ProviderRequest {
        model: "gpt-4o-mini".into(),
        messages: vec![
            Message::system("You are a kind tutor."),
            Message::user("Learner age: 6. Question: \"spell cat\""),
        ],
        temperature: 0.5,
        max_tokens: Some(500),
        top_p: None,
    }
}

#[tokio::test]
async fn completion_success_returns_first_choice() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|Json(body): Json<serde_json::Value>| async move {
            assert_eq!(body["messages"][0]["role"], "system");
            assert_eq!(body["messages"][1]["role"], "user");
            Json(serde_json::json!({
                "model": "gpt-4o-mini",
                "choices": [
                    {"message": {"role": "assistant", "content": "C-A-T, kuh-ah-tuh, cat! You got this!"}},
                    {"message": {"role": "assistant", "content": "second choice"}}
                ],
                "usage": {"prompt_tokens": 20, "completion_tokens": 10, "total_tokens": 30}
            }))
        }),
    );
    let base_url = spawn_mock(app).await;

    let response = provider(&base_url, Duration::from_secs(5))
        .complete(request())
        .await
        .unwrap();

    assert_eq!(response.message.content, "C-A-T, kuh-ah-tuh, cat! You got this!");
    assert_eq!(response.usage.unwrap().total_tokens, 30);
}

#[tokio::test]
async fn status_429_is_rate_limited() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "20")], "slow down") }),
    );
    let base_url = spawn_mock(app).await;

    let err = provider(&base_url, Duration::from_secs(5))
        .complete(request())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited { retry_after_secs: 20 }));
}

#[tokio::test]
async fn status_401_is_authentication_failure() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { StatusCode::UNAUTHORIZED }),
    );
    let base_url = spawn_mock(app).await;

    let err = provider(&base_url, Duration::from_secs(5))
        .complete(request())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let base_url = spawn_mock(app).await;

    let err = provider(&base_url, Duration::from_secs(5))
        .complete(request())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ApiError { status_code: 500, .. }));
}

#[tokio::test]
async fn garbage_body_is_malformed() {
    let app = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
    let base_url = spawn_mock(app).await;

    let err = provider(&base_url, Duration::from_secs(5))
        .complete(request())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(serde_json::json!({"choices": []})) }),
    );
    let base_url = spawn_mock(app).await;

    let err = provider(&base_url, Duration::from_secs(5))
        .complete(request())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let base_url = spawn_mock(app).await;

    let err = provider(&base_url, Duration::from_millis(200))
        .complete(request())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Timeout(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() {
    let err = provider("http://127.0.0.1:1/v1", Duration::from_secs(2))
        .complete(request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::Network(_) | ProviderError::Timeout(_)
    ));
}
