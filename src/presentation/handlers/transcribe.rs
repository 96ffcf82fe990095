use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::application::services::TranscriptionTask;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub description: String,
}

/// Synchronous request/response bridge over the dispatcher queue.
///
/// The body is parsed by hand rather than through the `Json` extractor so
/// that authentication is checked before any body validation: an extractor
/// rejection would otherwise turn an unauthenticated malformed request into
/// a 400 instead of a 401.
#[tracing::instrument(skip(state, headers, body))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if !state.auth.validate(auth_header) {
        tracing::warn!("Unauthorized access attempt");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Request body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidationResponse {
                    description: "Invalid request format.".to_string(),
                }),
            )
                .into_response();
        }
    };

    let Some(field) = payload.get("pcm_data") else {
        tracing::warn!("Request body missing pcm_data");
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidationResponse {
                description: "Invalid request format.".to_string(),
            }),
        )
            .into_response();
    };

    let samples: Vec<i16> = match serde_json::from_value(field.clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "pcm_data is not an array of 16-bit integers");
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidationResponse {
                    description: "pcm_data must be an array of 16-bit integers.".to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(samples = samples.len(), "Transcription request accepted");

    let (reply_tx, reply_rx) = oneshot::channel();
    state.dispatcher.submit(TranscriptionTask {
        samples,
        reply: reply_tx,
    });

    // Blocks until the worker reaches this task; queueing latency is
    // unbounded by design (no timeout, no cancellation).
    match reply_rx.await {
        Ok(Ok(text)) => (StatusCode::OK, Json(text)).into_response(),
        // Inference-side failures keep the 200 status with an error-shaped
        // body; clients distinguish outcomes by body shape, and changing
        // the status would break the external contract.
        Ok(Err(e)) => (
            StatusCode::OK,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Reply channel closed without a result");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("transcription worker unavailable: {}", e),
                }),
            )
                .into_response()
        }
    }
}
