use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use shared::models::{CreateDocumentRequest, ListDocumentsResponse};
use uuid::Uuid;

use super::AppState;
use super::errors::{bad_request_response, store_error_response};

#[derive(Debug, Deserialize)]
pub(super) struct ListDocumentsQuery {
    project_id: Option<Uuid>,
}

pub(super) async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Response {
    match state.store.list_documents(query.project_id).await {
        Ok(items) => (StatusCode::OK, Json(ListDocumentsResponse { items })).into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> Response {
    let title = req.title.trim();
    if title.is_empty() {
        return bad_request_response("invalid_title", "Document title must not be empty");
    }

    let content = match req.content.as_deref() {
        Some(content) => content.to_string(),
        None => format!("# {title}"),
    };

    match state
        .store
        .create_document(req.project_id, title, &content, req.doc_type)
        .await
    {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => store_error_response(err),
    }
}
