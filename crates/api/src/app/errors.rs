use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockledger_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::DuplicateItem(_) => json_error(StatusCode::CONFLICT, "duplicate_item", message),
        DomainError::UnknownItem(_) => json_error(StatusCode::NOT_FOUND, "unknown_item", message),
        DomainError::InvalidQuantity(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_quantity", message)
        }
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
    }
}

/// Malformed or mistyped request bodies get the same JSON error shape as
/// domain failures, keeping axum's status (400, 415 or 422).
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(rejection.status(), "validation_error", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
