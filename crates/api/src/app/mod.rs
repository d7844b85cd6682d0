//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: store selection and the shared inventory service
//! - `routes/`: HTTP routes + handlers (one file per record type)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: JSON body extractor with the same error shape

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

use services::AppService;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(service)))
}
