use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_core::{EntityKind, MovementId};

use crate::app::extract::ApiJson;
use crate::app::services::AppService;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route("/:id", get(get_movement).put(update_movement))
}

pub async fn list_movements(Extension(service): Extension<Arc<AppService>>) -> axum::response::Response {
    match service.list_movements().await {
        Ok(movements) => {
            let items: Vec<_> = movements.iter().map(dto::movement_to_json).collect();
            Json(items).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_movement(
    Extension(service): Extension<Arc<AppService>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let movement_id = match MovementId::new(id.as_str()) {
        Ok(v) => v,
        Err(_) => return errors::not_found(EntityKind::Movement, &id),
    };

    match service.get_movement(&movement_id).await {
        Ok(Some(m)) => Json(dto::movement_to_json(&m)).into_response(),
        Ok(None) => errors::not_found(EntityKind::Movement, movement_id.as_str()),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Record a movement. `movement_id` may be omitted; one is generated.
pub async fn create_movement(
    Extension(service): Extension<Arc<AppService>>,
    ApiJson(body): ApiJson<dto::CreateMovementRequest>,
) -> axum::response::Response {
    let cmd = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.add_movement(cmd).await {
        Ok(m) => (StatusCode::CREATED, Json(dto::movement_to_json(&m))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_movement(
    Extension(service): Extension<Arc<AppService>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateMovementRequest>,
) -> axum::response::Response {
    let movement_id = match MovementId::new(id.as_str()) {
        Ok(v) => v,
        Err(_) => return errors::not_found(EntityKind::Movement, &id),
    };
    let edit = match body.into_command() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.edit_movement(&movement_id, edit).await {
        Ok(m) => Json(dto::movement_to_json(&m)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
