use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_core::{EntityKind, LocationId};

use crate::app::extract::ApiJson;
use crate::app::services::AppService;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/:id", get(get_location).put(update_location))
}

pub async fn list_locations(Extension(service): Extension<Arc<AppService>>) -> axum::response::Response {
    match service.list_locations().await {
        Ok(locations) => {
            let items: Vec<_> = locations.iter().map(dto::location_to_json).collect();
            Json(items).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_location(
    Extension(service): Extension<Arc<AppService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let location_id = match LocationId::new(id.as_str()) {
        Ok(v) => v,
        Err(_) => return errors::not_found(EntityKind::Location, &id),
    };

    match service.get_location(&location_id).await {
        Ok(Some(l)) => Json(dto::location_to_json(&l)).into_response(),
        Ok(None) => errors::not_found(EntityKind::Location, location_id.as_str()),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_location(
    Extension(service): Extension<Arc<AppService>>,
    ApiJson(body): ApiJson<dto::CreateLocationRequest>,
) -> axum::response::Response {
    let cmd = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.add_location(cmd).await {
        Ok(l) => (StatusCode::CREATED, Json(dto::location_to_json(&l))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_location(
    Extension(service): Extension<Arc<AppService>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateLocationRequest>,
) -> axum::response::Response {
    let location_id = match LocationId::new(id.as_str()) {
        Ok(v) => v,
        Err(_) => return errors::not_found(EntityKind::Location, &id),
    };
    let edit = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.edit_location(&location_id, edit).await {
        Ok(l) => Json(dto::location_to_json(&l)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
