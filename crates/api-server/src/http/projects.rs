use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::models::{CreateProjectRequest, ListProjectsResponse};

use super::AppState;
use super::errors::{bad_request_response, store_error_response};

pub(super) async fn list_projects(State(state): State<AppState>) -> Response {
    match state.store.list_projects().await {
        Ok(items) => (StatusCode::OK, Json(ListProjectsResponse { items })).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Response {
    let name = req.name.trim();
    if name.is_empty() {
        return bad_request_response("invalid_name", "Project name must not be empty");
    }

    let status = req.status.as_deref().unwrap_or("active");
    match state.store.create_project(name, status).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(err) => store_error_response(err),
    }
}
