//! Resource routes for the vehicle collection.
//!
//! Thin request/response translation over the [`Automoviles`]
//! collaborator. Every store call is wrapped with local failure
//! translation: domain failures become 4xx, unexpected failures 500, all
//! in the uniform error envelope.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extract::JsonOrForm;
use crate::http::server::AppState;
use crate::store::{AutomovilPatch, ListQuery, NewAutomovil, StoreError};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/automoviles", get(list_automoviles).post(create_automovil))
        .route(
            "/automoviles/{id}",
            get(find_automovil)
                .patch(patch_automovil)
                .delete(delete_automovil),
        )
}

#[derive(Debug, Deserialize)]
struct ListParams {
    /// Tolerates non-numeric values by falling back to the configured
    /// default, the way clients of the original gateway relied on.
    records_per_page: Option<String>,
    fields: Option<String>,
}

async fn list_automoviles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let query = ListQuery {
        fields: params
            .fields
            .map(|fields| fields.split(',').map(str::to_string).collect()),
        limit: params
            .records_per_page
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(state.default_page_size),
    };

    match state.automoviles.find_all(query).await {
        Ok(records) if records.is_empty() => {
            Ok((StatusCode::NOT_FOUND, Json(records)).into_response())
        }
        Ok(records) => Ok((StatusCode::OK, Json(records)).into_response()),
        Err(err) => Err(serving_error(&state, "GET", "/automoviles", err)),
    }
}

async fn find_automovil(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    // A malformed identifier cannot name any record; report the same
    // not-found signal as an absent one.
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return Ok((StatusCode::NOT_FOUND, Json(Value::Null)).into_response());
    };

    match state.automoviles.find_one(oid).await {
        Ok(Some(record)) => Ok((StatusCode::OK, Json(record)).into_response()),
        Ok(None) => Ok((StatusCode::NOT_FOUND, Json(Value::Null)).into_response()),
        Err(err) => Err(serving_error(&state, "GET", "/automoviles/:id", err)),
    }
}

async fn create_automovil(
    State(state): State<AppState>,
    JsonOrForm(new): JsonOrForm<NewAutomovil>,
) -> Result<Response, ApiError> {
    match state.automoviles.create(new).await {
        Ok(saved) => Ok((StatusCode::CREATED, Json(saved)).into_response()),
        Err(StoreError::Validation(detail)) => {
            tracing::error!(
                service = %state.service_name,
                method = "POST",
                path = "/automoviles",
                detail = %detail,
                "store rejected new record"
            );
            Err(ApiError::bad_request(state.collection_url.clone(), detail))
        }
        Err(err) => Err(serving_error(&state, "POST", "/automoviles", err)),
    }
}

async fn patch_automovil(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<JsonOrForm<AutomovilPatch>, ApiError>,
) -> Result<Response, ApiError> {
    // Identifier first, body second; neither failure touches the store.
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return Err(ApiError::missing_data(state.collection_url.clone()));
    };
    let patch = match body {
        Ok(JsonOrForm(patch)) if !patch.is_empty() => patch,
        _ => return Err(ApiError::missing_data(state.collection_url.clone())),
    };

    match state.automoviles.patch(oid, patch).await {
        Ok(_) => Ok(StatusCode::OK.into_response()),
        Err(err) => Err(serving_error(&state, "PATCH", "/automoviles/:id", err)),
    }
}

async fn delete_automovil(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return Err(ApiError::missing_data(state.collection_url.clone()));
    };

    match state.automoviles.delete(oid).await {
        Ok(outcome) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "deleteResult": outcome })),
        )
            .into_response()),
        Err(err) => Err(serving_error(&state, "DELETE", "/automoviles/:id", err)),
    }
}

/// Log an unexpected store failure and translate it to a 500 envelope.
/// Internal detail goes to the log, the message to the envelope.
fn serving_error(state: &AppState, method: &str, path: &str, err: StoreError) -> ApiError {
    tracing::error!(
        service = %state.service_name,
        method,
        path,
        error = %err,
        "error when serving request"
    );
    ApiError::internal(state.collection_url.clone(), err.to_string())
}
