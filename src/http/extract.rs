//! Request-body extraction for structured-JSON and form-encoded bodies.

use axum::extract::{Form, FromRequest, Json, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Accepts a mutation body as either `application/json` or
/// `application/x-www-form-urlencoded`, mirroring what the pipeline
/// advertises to clients.
pub struct JsonOrForm<T>(pub T);

impl<T> FromRequest<AppState> for JsonOrForm<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|err| ApiError::bad_request(state.collection_url.clone(), err.to_string()))?;
            return Ok(JsonOrForm(value));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|err| ApiError::bad_request(state.collection_url.clone(), err.to_string()))?;
            return Ok(JsonOrForm(value));
        }

        Err(ApiError::bad_request(
            state.collection_url.clone(),
            format!("unsupported content type: {content_type:?}"),
        ))
    }
}
