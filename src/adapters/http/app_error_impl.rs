use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Database(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError, None)
            }
            AppError::InvalidCredentials => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::InvalidCredentials, None)
            }
            AppError::Forbidden => error_resp(StatusCode::FORBIDDEN, ErrorCode::Forbidden, None),
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, Some(msg))
            }
            AppError::InvalidBillingCycle(cycle) => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidBillingCycle,
                Some(format!("Invalid billing cycle: {}", cycle)),
            ),
            AppError::PaymentNotCompleted(status) => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::PaymentNotCompleted,
                Some(format!("Payment was not completed (status: {})", status)),
            ),
            // Provider details may contain raw API bodies; keep them in the log only.
            AppError::Provider(_) => {
                error_resp(StatusCode::BAD_GATEWAY, ErrorCode::ProviderError, None)
            }
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, None),
            AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, None)
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
