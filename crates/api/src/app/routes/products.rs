use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_core::{EntityKind, ProductId};

use crate::app::extract::ApiJson;
use crate::app::services::AppService;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product))
}

pub async fn list_products(Extension(service): Extension<Arc<AppService>>) -> axum::response::Response {
    match service.list_products().await {
        Ok(products) => {
            let items: Vec<_> = products.iter().map(dto::product_to_json).collect();
            Json(items).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(service): Extension<Arc<AppService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match ProductId::new(id.as_str()) {
        Ok(v) => v,
        Err(_) => return errors::not_found(EntityKind::Product, &id),
    };

    match service.get_product(&product_id).await {
        Ok(Some(p)) => Json(dto::product_to_json(&p)).into_response(),
        Ok(None) => errors::not_found(EntityKind::Product, product_id.as_str()),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(service): Extension<Arc<AppService>>,
    ApiJson(body): ApiJson<dto::CreateProductRequest>,
) -> axum::response::Response {
    let cmd = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.add_product(cmd).await {
        Ok(p) => (StatusCode::CREATED, Json(dto::product_to_json(&p))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(service): Extension<Arc<AppService>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let product_id = match ProductId::new(id.as_str()) {
        Ok(v) => v,
        Err(_) => return errors::not_found(EntityKind::Product, &id),
    };
    let edit = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.edit_product(&product_id, edit).await {
        Ok(p) => Json(dto::product_to_json(&p)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
