use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use shared::llm::BrainGateway;
use shared::repos::Store;

mod chat;
mod documents;
mod errors;
mod health;
mod projects;
mod session_locks;
mod tasks;

pub use session_locks::SessionLocks;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub brain: Option<Arc<dyn BrainGateway>>,
    pub session_locks: SessionLocks,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/v1/chat/messages", post(chat::send_message))
        .route(
            "/v1/chat/{session_id}/messages",
            get(chat::list_messages),
        )
        .route(
            "/v1/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/v1/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/v1/tasks/{task_id}/status", put(tasks::update_status))
        .route(
            "/v1/tasks/{task_id}/assignees",
            put(tasks::update_assignees),
        )
        .route(
            "/v1/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .with_state(app_state)
}
