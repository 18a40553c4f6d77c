//! Client-visible failure translation.
//!
//! # Responsibilities
//! - The uniform error envelope `{errors: [{source, detail}]}` clients
//!   depend on
//! - The catch-all not-found fallback, registered after every route
//! - Terminal translation of route failures into status + envelope
//!
//! # Design Decisions
//! - Every failure path goes through [`ApiError`], so no request-phase
//!   error can escape and take the process down
//! - Internal causes are logged, never serialized into the payload

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::http::server::AppState;

/// Detail reported when a mutation arrives without a usable body.
pub const MISSING_DATA_DETAIL: &str = "_missing_data_member_in_document_body_";

#[derive(Debug, Serialize)]
pub struct ErrorSource {
    pub pointer: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorItem {
    pub source: ErrorSource,
    pub detail: Value,
}

/// The envelope wrapping every client-visible failure.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorItem>,
}

impl ErrorEnvelope {
    pub fn single(pointer: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self {
            errors: vec![ErrorItem {
                source: ErrorSource {
                    pointer: pointer.into(),
                },
                detail: detail.into(),
            }],
        }
    }
}

/// A request-phase failure, carrying the status it translates to.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub envelope: ErrorEnvelope,
}

impl ApiError {
    pub fn new(status: StatusCode, pointer: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self {
            status,
            envelope: ErrorEnvelope::single(pointer, detail),
        }
    }

    /// 400: the store rejected the document.
    pub fn bad_request(pointer: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, pointer, detail)
    }

    /// 422: malformed identifier or unusable mutation body.
    pub fn missing_data(pointer: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, pointer, MISSING_DATA_DETAIL)
    }

    /// 404 from the catch-all fallback.
    pub fn not_available(pointer: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::NOT_FOUND, pointer, detail)
    }

    /// 500: unexpected failure while serving the request.
    pub fn internal(pointer: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, pointer, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

/// Catch-all for requests no route matched. Must stay registered after
/// every route or it would shadow them.
pub async fn resource_not_available(State(state): State<AppState>, uri: Uri) -> ApiError {
    ApiError::not_available(
        state.collection_url.clone(),
        format!(
            "{}: Resource Not Available {}",
            state.service_name,
            uri.path()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_the_contract_shape() {
        let envelope = ErrorEnvelope::single("http://gw:8080/automoviles", "boom");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["errors"][0]["source"]["pointer"], "http://gw:8080/automoviles");
        assert_eq!(value["errors"][0]["detail"], "boom");
    }

    #[test]
    fn missing_data_maps_to_422() {
        let err = ApiError::missing_data("http://gw:8080/automoviles");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            serde_json::to_value(&err.envelope).unwrap()["errors"][0]["detail"],
            MISSING_DATA_DETAIL
        );
    }
}
