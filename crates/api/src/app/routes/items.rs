use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockledger_core::DomainError;
use stockledger_inventory::MovementKind;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", post(register_item).get(list_items))
        .route("/items/:code", get(get_item))
        .route("/items/:code/entries", post(record_entry))
        .route("/items/:code/exits", post(record_exit))
        .route("/items/:code/movements", get(item_movements))
}

pub async fn register_item(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let code = body.code.trim();
    if code.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "code cannot be empty");
    }
    let name = body.name.trim();
    if name.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "name cannot be empty");
    }

    match services.ledger().register_item(
        code,
        name,
        body.description.trim(),
        body.unit_of_measure.trim(),
    ) {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.ledger().list_items())
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match services.ledger().get_item(&code) {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        None => errors::domain_error_to_response(DomainError::unknown_item(code)),
    }
}

pub async fn record_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    record(&services, MovementKind::Entry, code, body)
}

pub async fn record_exit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    record(&services, MovementKind::Exit, code, body)
}

fn record(
    services: &AppServices,
    kind: MovementKind,
    code: String,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let actor = services.actor_or_default(body.actor);
    let ledger = services.ledger();

    let result = match kind {
        MovementKind::Entry => ledger.record_entry(code, body.quantity, body.reason, actor),
        MovementKind::Exit => ledger.record_exit(code, body.quantity, body.reason, actor),
    };

    match result {
        Ok(recorded) => (StatusCode::CREATED, Json(recorded)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn item_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let ledger = services.ledger();
    // Items are never removed, so existence checked here still holds below.
    if ledger.get_item(&code).is_none() {
        return errors::domain_error_to_response(DomainError::unknown_item(code));
    }
    (StatusCode::OK, Json(ledger.movements_for(&code))).into_response()
}
