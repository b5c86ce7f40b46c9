//! API handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::api::AppState;
use crate::types::{parse_id, Employee};
use crate::Error;

type ApiError = (StatusCode, String);

/// Health check with backend status
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Health check failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend().to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
}

/// List every employee
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = state
        .store
        .list()
        .await
        .map_err(|e| store_failure("list", e))?;

    Ok(Json(employees))
}

/// Create an employee; the store assigns the id
pub async fn create_employee(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let employee = parse_body(&body)?;

    let created = state
        .store
        .insert(employee)
        .await
        .map_err(|e| store_failure("create", e))?;

    tracing::info!(id = created.id.as_deref().unwrap_or_default(), "Employee created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace name, salary and age of one employee
///
/// Responds with the submitted record and the path id; the store is not
/// read back. An unknown id is a 400, like any other bad request.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Employee>, ApiError> {
    let oid = parse_path_id(&id)?;
    let employee = parse_body(&body)?;

    let matched = state
        .store
        .update(oid, &employee.fields())
        .await
        .map_err(|e| store_failure("update", e))?;

    if !matched {
        tracing::debug!(%id, "Update matched no employee");
        return Err((StatusCode::BAD_REQUEST, format!("employee {} not found", id)));
    }

    Ok(Json(employee.with_id(id)))
}

/// Delete one employee
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    let oid = parse_path_id(&id)?;

    let deleted = state
        .store
        .delete(oid)
        .await
        .map_err(|e| store_failure("delete", e))?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, format!("employee {} not found", id)));
    }

    tracing::info!(%id, "Employee deleted");
    Ok(Json("record deleted"))
}

fn parse_path_id(id: &str) -> Result<ObjectId, ApiError> {
    parse_id(id).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting malformed id");
        (StatusCode::BAD_REQUEST, e.to_string())
    })
}

fn parse_body(body: &[u8]) -> Result<Employee, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting malformed employee body");
        (StatusCode::BAD_REQUEST, e.to_string())
    })
}

fn store_failure(operation: &'static str, err: Error) -> ApiError {
    tracing::error!(operation, error = %err, "Store operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
