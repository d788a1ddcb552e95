use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::interpreter::{responses, run_chat_turn};
use shared::llm::{BrainRequest, mentions_data_change};
use shared::models::{
    AssistantMode, ChatHistoryResponse, ChatRole, SendChatMessageRequest, SendChatMessageResponse,
};
use tracing::warn;

use super::AppState;
use super::errors::{bad_request_response, store_error_response};

pub(super) async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendChatMessageRequest>,
) -> Response {
    let session_id = req.session_id.trim();
    if session_id.is_empty() {
        return bad_request_response("invalid_session", "session_id must not be empty");
    }

    let message = req.message.trim();
    if message.is_empty() {
        return bad_request_response("invalid_message", "Message must not be empty");
    }

    // Turns for one session are strictly sequential; the guard is held until
    // the response (and its memory write) is complete.
    let _turn_guard = state.session_locks.acquire(session_id).await;

    let wants_ai = req.mode == Some(AssistantMode::Ai);
    if wants_ai && let Some(brain) = state.brain.as_ref() {
        return ai_turn(&state, brain.as_ref(), session_id, message).await;
    }

    // The interpreter never fails a turn; store faults inside it come back
    // as reply text.
    let outcome = run_chat_turn(&state.store, session_id, message).await;
    (
        StatusCode::OK,
        Json(SendChatMessageResponse {
            reply: outcome.reply,
            data_changed: outcome.data_changed,
        }),
    )
        .into_response()
}

/// The AI bypass: the raw message goes to the external brain verbatim and the
/// deterministic state machine (and its conversation memory) is never touched.
async fn ai_turn(
    state: &AppState,
    brain: &dyn shared::llm::BrainGateway,
    session_id: &str,
    message: &str,
) -> Response {
    append_history(state, session_id, ChatRole::User, message).await;

    let (reply, data_changed) = match brain
        .respond(BrainRequest {
            message: message.to_string(),
            session_id: session_id.to_string(),
        })
        .await
    {
        Ok(brain_reply) => {
            let data_changed = mentions_data_change(&brain_reply.response);
            (brain_reply.response, data_changed)
        }
        Err(err) => {
            warn!(session_id, "brain request failed: {err}");
            (responses::brain_unavailable(), false)
        }
    };

    append_history(state, session_id, ChatRole::Assistant, &reply).await;

    (
        StatusCode::OK,
        Json(SendChatMessageResponse {
            reply,
            data_changed,
        }),
    )
        .into_response()
}

async fn append_history(state: &AppState, session_id: &str, role: ChatRole, content: &str) {
    if let Err(err) = state
        .store
        .append_chat_message(session_id, role, content)
        .await
    {
        warn!(session_id, "failed to append chat message: {err}");
    }
}

pub(super) async fn list_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.store.list_chat_messages(&session_id).await {
        Ok(items) => (StatusCode::OK, Json(ChatHistoryResponse { items })).into_response(),
        Err(err) => store_error_response(err),
    }
}
