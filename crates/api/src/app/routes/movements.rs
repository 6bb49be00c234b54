use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::services::AppServices;

pub async fn list_movements(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.ledger().all_movements())
}

pub async fn report(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.ledger().build_report())
}
