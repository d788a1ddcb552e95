use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use shared::models::{
    CreateTaskRequest, ListTasksResponse, OkResponse, TaskStatus, UpdateTaskAssigneesRequest,
    UpdateTaskStatusRequest,
};
use uuid::Uuid;

use super::AppState;
use super::errors::{bad_request_response, store_error_response};

#[derive(Debug, Deserialize)]
pub(super) struct ListTasksQuery {
    project_id: Option<Uuid>,
}

pub(super) async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Response {
    match state.store.list_tasks(query.project_id).await {
        Ok(items) => (StatusCode::OK, Json(ListTasksResponse { items })).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Response {
    let title = req.title.trim();
    if title.is_empty() {
        return bad_request_response("invalid_title", "Task title must not be empty");
    }

    let status = req.status.unwrap_or(TaskStatus::Todo);
    match state.store.create_task(req.project_id, title, status).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn update_status(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> Response {
    match state.store.update_task_status(task_id, req.status).await {
        Ok(()) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn update_assignees(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskAssigneesRequest>,
) -> Response {
    match state
        .store
        .update_task_assignees(task_id, &req.assignees)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),
        Err(err) => store_error_response(err),
    }
}
