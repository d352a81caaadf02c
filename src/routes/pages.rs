//! Page analysis route.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::{ErrorCode, error_response};
use crate::services::analyze::{self, AnalyzeError, AnalyzeRequest, AnalyzeResponse};
use crate::state::AppState;

fn analyze_error_status(err: &AnalyzeError) -> StatusCode {
    match err {
        AnalyzeError::BadRequest(_) | AnalyzeError::EmptyImage | AnalyzeError::UnsupportedMime(_) => {
            StatusCode::BAD_REQUEST
        }
        AnalyzeError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        AnalyzeError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        AnalyzeError::Llm(_) | AnalyzeError::Suggestions(_) => StatusCode::BAD_GATEWAY,
    }
}

fn analyze_error_response(err: &AnalyzeError) -> Response {
    let status = analyze_error_status(err);
    warn!(status = status.as_u16(), code = err.error_code(), retryable = err.retryable(), error = %err, "analyze failed");
    error_response(status, err)
}

/// `POST /api/pages/analyze`
pub async fn analyze(State(state): State<AppState>, body: Result<Json<AnalyzeRequest>, JsonRejection>) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return analyze_error_response(&AnalyzeError::PayloadTooLarge);
        }
        Err(rejection) => return analyze_error_response(&AnalyzeError::BadRequest(rejection.body_text())),
    };
    let Some(llm) = state.llm.as_deref() else {
        return analyze_error_response(&AnalyzeError::LlmNotConfigured);
    };

    match analyze::analyze_page(llm, state.config.ai_max_tokens, &req.image, &req.mime_type).await {
        Ok(suggestions) => Json(AnalyzeResponse { suggestions }).into_response(),
        Err(e) => analyze_error_response(&e),
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
