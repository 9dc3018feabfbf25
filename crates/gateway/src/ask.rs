//! `POST /ask` — one learner question in, one reply out.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use kasa_tutor::RawAsk;

use crate::{ErrorResponse, SharedState};

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub reply: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Handle one question.
///
/// Status codes:
/// - 200 with `{reply}` on success
/// - 400 with `{error}` for malformed or non-object JSON, or a rejected question
/// - 413 when the body exceeds the configured byte limit
/// - 500 with a friendly `{reply}` when the provider failed
///   (200 when `mask_provider_failures` is set)
pub async fn ask_handler(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let span = info_span!("ask", request_id = %Uuid::new_v4());

    async move {
        let Json(body) = match body {
            Ok(json) => json,
            Err(rejection) => {
                let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    StatusCode::PAYLOAD_TOO_LARGE
                } else {
                    StatusCode::BAD_REQUEST
                };
                debug!(status = %status, reason = %rejection.body_text(), "Rejected request body");
                return error_response(status, rejection.body_text());
            }
        };

        let raw = match RawAsk::from_json(body) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "Request body is not a JSON object");
                return error_response(StatusCode::BAD_REQUEST, e.to_string());
            }
        };

        let reply = match state.tutor.ask(&raw).await {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = %e, "Question failed validation");
                return error_response(StatusCode::BAD_REQUEST, e.to_string());
            }
        };

        let status = if reply.is_fallback() && !state.mask_provider_failures {
            warn!(outcome = ?reply.outcome, "Answered with fallback reply");
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };

        (status, Json(AskResponse { reply: reply.reply })).into_response()
    }
    .instrument(span)
    .await
}
