use std::future::Future;
use std::pin::Pin;

use tracing::warn;
use uuid::Uuid;

use super::intents::{self, Intent};
use super::resolve::{
    DOC_FLOW_ORDINALS, TASK_FLOW_ORDINALS, resolve_project_mention, resolve_project_reply,
};
use super::responses;
use crate::conversation_memory::PendingAction;
use crate::models::{ChatRole, Document, DocumentType, Project, Task, TaskStatus};
use crate::repos::StoreError;

#[cfg(test)]
mod tests;

pub const OPEN_TASK_LIST_LIMIT: i64 = 5;

const AFFIRMATIVE_TOKENS: &[&str] = &["si", "yes", "confirmado", "procede", "ok"];
const LIST_PROJECTS_COMMAND: &str = "list_projects";

pub type StoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Call contract between the interpreter and the data store. Implemented by
/// `repos::Store` against Postgres and by an in-memory double in tests.
pub trait CommandStore: Send + Sync {
    fn load_memory<'a>(&'a self, session_id: &'a str) -> StoreFuture<'a, Option<PendingAction>>;
    fn upsert_memory<'a>(
        &'a self,
        session_id: &'a str,
        action: &'a PendingAction,
    ) -> StoreFuture<'a, ()>;
    fn delete_memory<'a>(&'a self, session_id: &'a str) -> StoreFuture<'a, ()>;
    fn list_projects<'a>(&'a self) -> StoreFuture<'a, Vec<Project>>;
    fn list_open_tasks<'a>(&'a self, limit: i64) -> StoreFuture<'a, Vec<Task>>;
    fn create_task<'a>(
        &'a self,
        project_id: Uuid,
        title: &'a str,
        status: TaskStatus,
    ) -> StoreFuture<'a, Task>;
    fn update_task_assignees<'a>(
        &'a self,
        task_id: Uuid,
        assignees: &'a [String],
    ) -> StoreFuture<'a, ()>;
    fn create_document<'a>(
        &'a self,
        project_id: Uuid,
        title: &'a str,
        content: &'a str,
        doc_type: DocumentType,
    ) -> StoreFuture<'a, Document>;
    fn append_chat_message<'a>(
        &'a self,
        session_id: &'a str,
        role: ChatRole,
        content: &'a str,
    ) -> StoreFuture<'a, ()>;
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub data_changed: bool,
}

/// What happens to the session's memory record once the turn's reply is
/// known. `Keep` leaves the record exactly as it was, which is how a failed
/// slot-filling step stays retryable.
#[derive(Debug, Clone, PartialEq)]
enum MemoryUpdate {
    Keep,
    Clear,
    Set(PendingAction),
}

#[derive(Debug)]
struct TurnStep {
    reply: String,
    memory: MemoryUpdate,
    data_changed: bool,
}

impl TurnStep {
    fn reply_only(reply: String) -> Self {
        Self {
            reply,
            memory: MemoryUpdate::Keep,
            data_changed: false,
        }
    }
}

/// Runs one conversational turn: dispatches on the pending flow when one
/// exists, otherwise classifies the raw text as a fresh command. The memory
/// write is applied before the reply is returned so a fast follow-up from the
/// same session never observes stale pending state. Chat-history appends are
/// best effort and never fail the turn.
///
/// A turn always ends in a textual reply. Any store failure inside the turn
/// (memory load, listings, the memory write itself) is caught here and
/// reported in the reply, with the memory record left as it was.
pub async fn run_chat_turn(store: &dyn CommandStore, session_id: &str, text: &str) -> TurnOutcome {
    if let Err(err) = store
        .append_chat_message(session_id, ChatRole::User, text)
        .await
    {
        warn!(session_id, "failed to append user chat message: {err}");
    }

    let outcome = match execute_turn(store, session_id, text).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(session_id, "chat turn failed: {err}");
            TurnOutcome {
                reply: responses::mutation_failed(&err.to_string()),
                data_changed: false,
            }
        }
    };

    if let Err(err) = store
        .append_chat_message(session_id, ChatRole::Assistant, &outcome.reply)
        .await
    {
        warn!(session_id, "failed to append assistant chat message: {err}");
    }

    outcome
}

async fn execute_turn(
    store: &dyn CommandStore,
    session_id: &str,
    text: &str,
) -> Result<TurnOutcome, StoreError> {
    let pending = store.load_memory(session_id).await?;
    let step = match pending {
        Some(action) => handle_pending(store, action, text).await?,
        None => handle_intent(store, text).await?,
    };

    match &step.memory {
        MemoryUpdate::Keep => {}
        MemoryUpdate::Clear => store.delete_memory(session_id).await?,
        MemoryUpdate::Set(action) => store.upsert_memory(session_id, action).await?,
    }

    Ok(TurnOutcome {
        reply: step.reply,
        data_changed: step.data_changed,
    })
}

async fn handle_pending(
    store: &dyn CommandStore,
    action: PendingAction,
    text: &str,
) -> Result<TurnStep, StoreError> {
    match action {
        PendingAction::AwaitingConfirmation { command } => {
            handle_confirmation(store, command.as_deref(), text).await
        }
        PendingAction::AwaitingAssignment { title, task_id } => {
            Ok(handle_assignment(store, &title, task_id, text).await)
        }
        PendingAction::AwaitingProject {
            title,
            last_options,
        } => handle_project_reply(store, &title, &last_options, text).await,
        PendingAction::AwaitingProjectDoc {
            title,
            doc_type,
            last_options,
        } => handle_project_doc_reply(store, &title, doc_type, &last_options, text).await,
    }
}

async fn handle_confirmation(
    store: &dyn CommandStore,
    command: Option<&str>,
    text: &str,
) -> Result<TurnStep, StoreError> {
    let normalized = text.to_lowercase();
    let affirmative = AFFIRMATIVE_TOKENS
        .iter()
        .any(|token| normalized.contains(token));

    let reply = if !affirmative {
        responses::operation_cancelled()
    } else if command == Some(LIST_PROJECTS_COMMAND) {
        let projects = store.list_projects().await?;
        responses::project_list_with_status(&projects)
    } else {
        responses::operation_confirmed()
    };

    Ok(TurnStep {
        reply,
        memory: MemoryUpdate::Clear,
        data_changed: false,
    })
}

async fn handle_assignment(
    store: &dyn CommandStore,
    title: &str,
    task_id: Uuid,
    text: &str,
) -> TurnStep {
    // The whole reply is the assignee's display name; it replaces any
    // previous assignee list outright.
    let assignee = text.trim().to_string();
    match store
        .update_task_assignees(task_id, std::slice::from_ref(&assignee))
        .await
    {
        Ok(()) => TurnStep {
            reply: responses::task_assigned(&assignee, title),
            memory: MemoryUpdate::Clear,
            data_changed: true,
        },
        Err(err) => TurnStep::reply_only(responses::mutation_failed(&err.to_string())),
    }
}

async fn handle_project_reply(
    store: &dyn CommandStore,
    title: &str,
    last_options: &[String],
    text: &str,
) -> Result<TurnStep, StoreError> {
    let projects = store.list_projects().await?;
    let Some(project) = resolve_project_reply(text, last_options, &projects, TASK_FLOW_ORDINALS)
    else {
        return Ok(TurnStep::reply_only(responses::project_reprompt()));
    };

    Ok(
        match store.create_task(project.id, title, TaskStatus::Todo).await {
            Ok(task) => TurnStep {
                reply: responses::task_created(title, &project.name),
                memory: MemoryUpdate::Set(PendingAction::AwaitingAssignment {
                    title: title.to_string(),
                    task_id: task.id,
                }),
                data_changed: true,
            },
            Err(err) => TurnStep::reply_only(responses::mutation_failed(&err.to_string())),
        },
    )
}

async fn handle_project_doc_reply(
    store: &dyn CommandStore,
    title: &str,
    doc_type: DocumentType,
    last_options: &[String],
    text: &str,
) -> Result<TurnStep, StoreError> {
    let projects = store.list_projects().await?;
    let Some(project) = resolve_project_reply(text, last_options, &projects, DOC_FLOW_ORDINALS)
    else {
        return Ok(TurnStep::reply_only(responses::project_reprompt()));
    };

    let content = format!("# {title}");
    Ok(
        match store
            .create_document(project.id, title, &content, doc_type)
            .await
        {
            Ok(_) => TurnStep {
                reply: responses::document_created(title, &project.name),
                memory: MemoryUpdate::Clear,
                data_changed: true,
            },
            Err(err) => TurnStep::reply_only(responses::mutation_failed(&err.to_string())),
        },
    )
}

async fn handle_intent(store: &dyn CommandStore, text: &str) -> Result<TurnStep, StoreError> {
    match intents::classify(text) {
        Intent::CreateDocument {
            title,
            doc_type,
            project_mention,
        } => create_document_intent(store, text, &title, doc_type, project_mention.as_deref()).await,
        Intent::CreateTask {
            title,
            project_mention,
        } => create_task_intent(store, text, &title, project_mention.as_deref()).await,
        Intent::ListProjects => {
            let projects = store.list_projects().await?;
            Ok(TurnStep::reply_only(responses::project_list(&projects)))
        }
        Intent::ListTasks => {
            let tasks = store.list_open_tasks(OPEN_TASK_LIST_LIMIT).await?;
            Ok(TurnStep::reply_only(responses::open_task_list(&tasks)))
        }
        Intent::SmallTalk => Ok(TurnStep::reply_only(responses::small_talk())),
    }
}

async fn create_document_intent(
    store: &dyn CommandStore,
    text: &str,
    title: &str,
    doc_type: DocumentType,
    project_mention: Option<&str>,
) -> Result<TurnStep, StoreError> {
    let projects = store.list_projects().await?;

    let Some(project) = resolve_project_mention(text, project_mention, &projects) else {
        let last_options: Vec<String> =
            projects.iter().map(|project| project.name.clone()).collect();
        return Ok(TurnStep {
            reply: responses::numbered_project_options(title, &last_options),
            memory: MemoryUpdate::Set(PendingAction::AwaitingProjectDoc {
                title: title.to_string(),
                doc_type,
                last_options,
            }),
            data_changed: false,
        });
    };

    let content = format!("# {title}");
    Ok(
        match store
            .create_document(project.id, title, &content, doc_type)
            .await
        {
            Ok(_) => TurnStep {
                reply: responses::document_created(title, &project.name),
                memory: MemoryUpdate::Keep,
                data_changed: true,
            },
            Err(err) => TurnStep::reply_only(responses::mutation_failed(&err.to_string())),
        },
    )
}

async fn create_task_intent(
    store: &dyn CommandStore,
    text: &str,
    title: &str,
    project_mention: Option<&str>,
) -> Result<TurnStep, StoreError> {
    let projects = store.list_projects().await?;

    let Some(project) = resolve_project_mention(text, project_mention, &projects) else {
        let last_options: Vec<String> =
            projects.iter().map(|project| project.name.clone()).collect();
        return Ok(TurnStep {
            reply: responses::numbered_project_options(title, &last_options),
            memory: MemoryUpdate::Set(PendingAction::AwaitingProject {
                title: title.to_string(),
                last_options,
            }),
            data_changed: false,
        });
    };

    Ok(
        match store.create_task(project.id, title, TaskStatus::Todo).await {
            Ok(task) => TurnStep {
                reply: responses::task_created(title, &project.name),
                memory: MemoryUpdate::Set(PendingAction::AwaitingAssignment {
                    title: title.to_string(),
                    task_id: task.id,
                }),
                data_changed: true,
            },
            Err(err) => TurnStep::reply_only(responses::mutation_failed(&err.to_string())),
        },
    )
}
