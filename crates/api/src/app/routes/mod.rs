use axum::{routing::get, Router};

pub mod items;
pub mod movements;
pub mod system;

pub fn router() -> Router {
    items::router()
        .route("/movements", get(movements::list_movements))
        .route("/report", get(movements::report))
}
