//! Request extractors with the API's error body shape.

use axum::extract::{FromRequest, Request};
use axum::response::Response;

use crate::app::errors;

/// `axum::Json` whose rejections (malformed JSON, wrong field types, missing
/// content type) render as `{"error", "message"}` like every other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(errors::json_rejection_to_response(rejection)),
        }
    }
}
