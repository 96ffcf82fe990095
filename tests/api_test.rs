use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use voxgate::application::ports::{TranscriptionEngine, TranscriptionError};
use voxgate::application::services::TranscriptionWorker;
use voxgate::presentation::{AppState, AuthGate, create_router};

const TEST_API_KEY: &str = "test-secret-token";

/// Echoes the waveform it received, so tests can assert on the exact
/// normalized samples that reached the engine.
struct EchoEngine {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TranscriptionEngine for EchoEngine {
    async fn transcribe(
        &self,
        samples: &[f32],
        _sample_rate: u32,
    ) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("transcript:{:?}", samples))
    }
}

struct FailingEngine;

#[async_trait]
impl TranscriptionEngine for FailingEngine {
    async fn transcribe(
        &self,
        _samples: &[f32],
        _sample_rate: u32,
    ) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::TranscriptionFailed("boom".to_string()))
    }
}

fn create_test_app(engine: Arc<dyn TranscriptionEngine>) -> axum::Router {
    let (worker, dispatcher) = TranscriptionWorker::new(engine);
    tokio::spawn(worker.run());

    let state = AppState {
        dispatcher,
        auth: AuthGate::new(TEST_API_KEY.to_string()),
    };
    create_router(state)
}

fn create_echo_app() -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(Arc::new(EchoEngine {
        calls: Arc::clone(&calls),
    }));
    (app, calls)
}

fn transcribe_request(token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/transcribe")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn given_valid_token_and_payload_when_transcribe_then_returns_normalized_transcript() {
    let (app, _) = create_echo_app();

    let response = app
        .oneshot(transcribe_request(
            TEST_API_KEY,
            r#"{"pcm_data": [0, 16384, -16384, 0]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, "transcript:[0.0, 0.5, -0.5, 0.0]");
}

#[tokio::test]
async fn given_wrong_token_when_transcribe_then_returns_unauthorized_and_engine_never_runs() {
    let (app, calls) = create_echo_app();

    let response = app
        .oneshot(transcribe_request(
            "wrong-token",
            r#"{"pcm_data": [0, 16384, -16384, 0]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_missing_authorization_header_when_transcribe_then_returns_unauthorized() {
    let (app, calls) = create_echo_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/transcribe")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"pcm_data": [1, 2, 3]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_schemeless_header_when_transcribe_then_returns_unauthorized() {
    let (app, _) = create_echo_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/transcribe")
                .header("content-type", "application/json")
                .header("authorization", TEST_API_KEY)
                .body(Body::from(r#"{"pcm_data": [1, 2, 3]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Without a scheme prefix there is no second segment to match.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_wrong_field_name_when_transcribe_then_returns_bad_request() {
    let (app, calls) = create_echo_app();

    let response = app
        .oneshot(transcribe_request(TEST_API_KEY, r#"{"audio": [1, 2, 3]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let json = body_json(response).await;
    assert!(json["description"].is_string());
}

#[tokio::test]
async fn given_malformed_json_when_transcribe_then_returns_bad_request() {
    let (app, calls) = create_echo_app();

    let response = app
        .oneshot(transcribe_request(TEST_API_KEY, "this is not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_non_integer_samples_when_transcribe_then_returns_bad_request() {
    let (app, calls) = create_echo_app();

    let response = app
        .oneshot(transcribe_request(
            TEST_API_KEY,
            r#"{"pcm_data": ["loud", "noises"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_empty_pcm_data_when_transcribe_then_returns_ok_with_error_body() {
    let (app, calls) = create_echo_app();

    let response = app
        .oneshot(transcribe_request(TEST_API_KEY, r#"{"pcm_data": []}"#))
        .await
        .unwrap();

    // Preprocessing failures travel in-band through the reply channel and
    // keep the 200 status; only the body shape signals the error.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn given_failing_engine_when_transcribe_then_returns_ok_with_error_body() {
    let app = create_test_app(Arc::new(FailingEngine));

    let response = app
        .oneshot(transcribe_request(TEST_API_KEY, r#"{"pcm_data": [1, 2, 3]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("boom"));
}

#[tokio::test]
async fn given_stopped_worker_when_transcribe_then_returns_internal_server_error() {
    let engine: Arc<dyn TranscriptionEngine> = Arc::new(FailingEngine);
    let (worker, dispatcher) = TranscriptionWorker::new(engine);
    drop(worker);

    let state = AppState {
        dispatcher,
        auth: AuthGate::new(TEST_API_KEY.to_string()),
    };
    let app = create_router(state);

    let response = app
        .oneshot(transcribe_request(TEST_API_KEY, r#"{"pcm_data": [1, 2, 3]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn given_health_check_when_get_then_returns_healthy() {
    let (app, _) = create_echo_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_request_without_id_when_any_endpoint_then_response_contains_request_id() {
    let (app, _) = create_echo_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn given_request_with_id_when_any_endpoint_then_response_echoes_request_id() {
    let (app, _) = create_echo_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "test-request-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-request-123"
    );
}
