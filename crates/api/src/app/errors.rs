use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::{DomainError, EntityKind};
use stockroom_infra::StoreError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::DuplicateKey { .. } => StatusCode::CONFLICT,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidReference { .. }
        | DomainError::InvalidQuantity(_)
        | DomainError::InvalidMovement(_)
        | DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        other => {
            tracing::error!(error = %other, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                other.to_string(),
            )
        }
    }
}

/// Request body that could not be read as the expected JSON.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    let code = match &rejection {
        JsonRejection::JsonSyntaxError(_) => "malformed_json",
        JsonRejection::MissingJsonContentType(_) => "unsupported_media_type",
        _ => "invalid_body",
    };
    json_error(rejection.status(), code, rejection.body_text())
}

/// 404 for a lookup that found nothing.
pub fn not_found(kind: EntityKind, id: &str) -> axum::response::Response {
    domain_error_to_response(DomainError::not_found(kind, id))
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
