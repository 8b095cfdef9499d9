//! `/employees` endpoints.
//!
//! Every handler follows the same flow: parse path/body, run exactly one
//! store operation on the blocking pool, map the outcome to a response.
//! Absence is detected from the store result (`None` or a zero count).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use log::debug;
use serde::Serialize;

use employee_core::{
    Employee, EmployeeChanges, EmployeeDraft, EmployeeId, EmployeeRepository, RepoResult,
};

use crate::error::ApiError;
use crate::state::AppState;

pub const CREATED_MESSAGE: &str = "Employee created successfully";
pub const UPDATED_MESSAGE: &str = "Employee updated successfully";
pub const DELETED_MESSAGE: &str = "Employee deleted successfully";

/// Employee route group.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
}

/// Body returned by update and delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body returned by create.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: EmployeeId,
}

/// Runs one store call on the blocking pool.
///
/// The outer error is a panicked or cancelled store task.
async fn run_store<T, F>(
    state: &AppState,
    operation: &str,
    call: F,
) -> Result<RepoResult<T>, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&(dyn EmployeeRepository + Send + Sync)) -> RepoResult<T> + Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|err| ApiError::internal(operation, err.to_string()))
}

/// Unwraps a JSON body. A body sent without a JSON content type is left
/// unparsed and reads as an empty object.
fn json_or_empty<T: Default>(
    operation: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::bad_request(operation, rejection.body_text())),
    }
}

/// `GET /employees`.
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = run_store(&state, "list", |store| store.list_employees())
        .await?
        .map_err(|err| ApiError::internal("list", err.to_string()))?;

    debug!(
        "event=employee_list module=http status=ok count={}",
        employees.len()
    );
    Ok(Json(employees))
}

/// `GET /employees/{id}`.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ApiError> {
    let found = run_store(&state, "get", move |store| store.find_employee(&id))
        .await?
        .map_err(|err| ApiError::internal("get", err.to_string()))?;

    found.map(Json).ok_or(ApiError::NotFound)
}

/// `POST /employees`.
///
/// Any refusal, whether of the JSON body or of the document by the store,
/// is a 400 carrying the refusal message.
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let draft = json_or_empty("create", payload)?;

    let id = run_store(&state, "create", move |store| store.insert_employee(&draft))
        .await?
        .map_err(|err| ApiError::bad_request("create", err.to_string()))?;

    debug!("event=employee_create module=http status=ok id={id}");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: CREATED_MESSAGE,
            id,
        }),
    ))
}

/// `PUT /employees/{id}`.
///
/// Only fields present in the body are set; `id` in the body is ignored.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeChanges>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let changes = json_or_empty("update", payload)?;

    let matched = run_store(&state, "update", move |store| {
        store.update_employee(&id, &changes)
    })
    .await?
    .map_err(|err| ApiError::internal("update", err.to_string()))?;

    if matched == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(Json(MessageResponse {
        message: UPDATED_MESSAGE,
    }))
}

/// `DELETE /employees/{id}`.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = run_store(&state, "delete", move |store| store.delete_employee(&id))
        .await?
        .map_err(|err| ApiError::internal("delete", err.to_string()))?;

    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE,
    }))
}
