use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower::ServiceBuilder;

use stockledger_inventory::SharedLedger;

use crate::config::ApiConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the application router around an existing ledger.
pub fn build_app(ledger: SharedLedger, config: &ApiConfig) -> Router {
    let services = Arc::new(AppServices::new(ledger, config.default_actor.clone()));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
