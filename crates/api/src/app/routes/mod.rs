use axum::{Router, routing::get};

pub mod locations;
pub mod movements;
pub mod products;
pub mod report;
pub mod system;

/// Router for all record and report endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/report", get(report::balance_report))
        .nest("/products", products::router())
        .nest("/locations", locations::router())
        .nest("/movements", movements::router())
}
