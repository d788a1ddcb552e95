use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use super::{CommandStore, StoreFuture, run_chat_turn};
use crate::conversation_memory::PendingAction;
use crate::models::{ChatRole, Document, DocumentType, Project, Task, TaskStatus};
use crate::repos::StoreError;

#[derive(Default)]
struct MemState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    documents: Vec<Document>,
    memory: HashMap<String, PendingAction>,
    chat: Vec<(String, ChatRole, String)>,
    fail_task_creation: bool,
    fail_assignment: bool,
    fail_memory_load: bool,
    fail_project_listing: bool,
}

#[derive(Default)]
struct MemStore {
    state: Mutex<MemState>,
}

impl MemStore {
    fn with_projects(names: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().expect("state lock");
            state.projects = names
                .iter()
                .map(|name| Project {
                    id: Uuid::new_v4(),
                    name: (*name).to_string(),
                    status: "active".to_string(),
                    created_at: Utc::now(),
                })
                .collect();
        }
        store
    }

    fn set_memory(&self, session_id: &str, action: PendingAction) {
        self.state
            .lock()
            .expect("state lock")
            .memory
            .insert(session_id.to_string(), action);
    }

    fn memory(&self, session_id: &str) -> Option<PendingAction> {
        self.state
            .lock()
            .expect("state lock")
            .memory
            .get(session_id)
            .cloned()
    }

    fn tasks(&self) -> Vec<Task> {
        self.state.lock().expect("state lock").tasks.clone()
    }

    fn documents(&self) -> Vec<Document> {
        self.state.lock().expect("state lock").documents.clone()
    }

    fn chat(&self) -> Vec<(String, ChatRole, String)> {
        self.state.lock().expect("state lock").chat.clone()
    }

    fn project_id(&self, name: &str) -> Uuid {
        self.state
            .lock()
            .expect("state lock")
            .projects
            .iter()
            .find(|project| project.name == name)
            .map(|project| project.id)
            .expect("project should exist")
    }
}

impl CommandStore for MemStore {
    fn load_memory<'a>(&'a self, session_id: &'a str) -> StoreFuture<'a, Option<PendingAction>> {
        Box::pin(async move {
            if self.state.lock().expect("state lock").fail_memory_load {
                return Err(StoreError::InvalidData("memory row corrupt".to_string()));
            }
            Ok(self.memory(session_id))
        })
    }

    fn upsert_memory<'a>(
        &'a self,
        session_id: &'a str,
        action: &'a PendingAction,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.set_memory(session_id, action.clone());
            Ok(())
        })
    }

    fn delete_memory<'a>(&'a self, session_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state
                .lock()
                .expect("state lock")
                .memory
                .remove(session_id);
            Ok(())
        })
    }

    fn list_projects<'a>(&'a self) -> StoreFuture<'a, Vec<Project>> {
        Box::pin(async move {
            let state = self.state.lock().expect("state lock");
            if state.fail_project_listing {
                return Err(StoreError::InvalidData("projects query failed".to_string()));
            }
            Ok(state.projects.clone())
        })
    }

    fn list_open_tasks<'a>(&'a self, limit: i64) -> StoreFuture<'a, Vec<Task>> {
        Box::pin(async move {
            let state = self.state.lock().expect("state lock");
            Ok(state
                .tasks
                .iter()
                .filter(|task| task.status != TaskStatus::Done)
                .take(limit as usize)
                .cloned()
                .collect())
        })
    }

    fn create_task<'a>(
        &'a self,
        project_id: Uuid,
        title: &'a str,
        status: TaskStatus,
    ) -> StoreFuture<'a, Task> {
        Box::pin(async move {
            let mut state = self.state.lock().expect("state lock");
            if state.fail_task_creation {
                return Err(StoreError::InvalidData("task insert rejected".to_string()));
            }
            let task = Task {
                id: Uuid::new_v4(),
                project_id,
                title: title.to_string(),
                status,
                assignees: Vec::new(),
                created_at: Utc::now(),
            };
            state.tasks.push(task.clone());
            Ok(task)
        })
    }

    fn update_task_assignees<'a>(
        &'a self,
        task_id: Uuid,
        assignees: &'a [String],
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().expect("state lock");
            if state.fail_assignment {
                return Err(StoreError::InvalidData(
                    "assignee update rejected".to_string(),
                ));
            }
            let task = state
                .tasks
                .iter_mut()
                .find(|task| task.id == task_id)
                .ok_or_else(|| StoreError::InvalidData("task not found".to_string()))?;
            task.assignees = assignees.to_vec();
            Ok(())
        })
    }

    fn create_document<'a>(
        &'a self,
        project_id: Uuid,
        title: &'a str,
        content: &'a str,
        doc_type: DocumentType,
    ) -> StoreFuture<'a, Document> {
        Box::pin(async move {
            let mut state = self.state.lock().expect("state lock");
            let document = Document {
                id: Uuid::new_v4(),
                project_id,
                title: title.to_string(),
                content: content.to_string(),
                doc_type,
                created_at: Utc::now(),
            };
            state.documents.push(document.clone());
            Ok(document)
        })
    }

    fn append_chat_message<'a>(
        &'a self,
        session_id: &'a str,
        role: ChatRole,
        content: &'a str,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state.lock().expect("state lock").chat.push((
                session_id.to_string(),
                role,
                content.to_string(),
            ));
            Ok(())
        })
    }
}

const SESSION: &str = "chat-session-1";

#[tokio::test]
async fn project_listing_names_every_project_and_leaves_no_memory() {
    let store = MemStore::with_projects(&["Alpha", "Beta"]);

    let outcome = run_chat_turn(&store, SESSION, "muéstrame los proyectos").await;

    assert!(outcome.reply.contains("• Alpha"));
    assert!(outcome.reply.contains("• Beta"));
    // The fresh-listing format omits status; only the confirmation path shows it.
    assert!(!outcome.reply.contains("[active]"));
    assert!(!outcome.data_changed);
    assert!(store.memory(SESSION).is_none());
}

#[tokio::test]
async fn task_creation_without_project_offers_numbered_options() {
    let store = MemStore::with_projects(&["Alpha", "Beta"]);

    let outcome = run_chat_turn(&store, SESSION, r#"Crea la tarea "Fix login""#).await;

    assert!(outcome.reply.contains("1. Alpha"));
    assert!(outcome.reply.contains("2. Beta"));
    assert!(store.tasks().is_empty());
    assert_eq!(
        store.memory(SESSION),
        Some(PendingAction::AwaitingProject {
            title: "Fix login".to_string(),
            last_options: vec!["Alpha".to_string(), "Beta".to_string()],
        })
    );
}

#[tokio::test]
async fn task_creation_with_inline_project_creates_and_asks_for_assignee() {
    let store = MemStore::with_projects(&["Mars Logistics App"]);

    let outcome = run_chat_turn(
        &store,
        SESSION,
        r#"Crea la tarea "Fix login" en el proyecto "Mars Logistics App""#,
    )
    .await;

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Fix login");
    assert_eq!(tasks[0].status, TaskStatus::Todo);
    assert_eq!(tasks[0].project_id, store.project_id("Mars Logistics App"));

    assert!(outcome.reply.contains("¿A quién se la asigno?"));
    assert!(outcome.data_changed);
    assert_eq!(
        store.memory(SESSION),
        Some(PendingAction::AwaitingAssignment {
            title: "Fix login".to_string(),
            task_id: tasks[0].id,
        })
    );
}

#[tokio::test]
async fn numeric_reply_resolves_second_offered_project() {
    let store = MemStore::with_projects(&["Alpha", "Beta"]);
    store.set_memory(
        SESSION,
        PendingAction::AwaitingProject {
            title: "Fix login".to_string(),
            last_options: vec!["Alpha".to_string(), "Beta".to_string()],
        },
    );

    run_chat_turn(&store, SESSION, "2").await;

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].project_id, store.project_id("Beta"));
}

#[tokio::test]
async fn assignment_reply_overwrites_assignees_and_clears_memory() {
    let store = MemStore::with_projects(&["Alpha"]);

    run_chat_turn(&store, SESSION, "crea la tarea pagos en Alpha").await;
    let outcome = run_chat_turn(&store, SESSION, "Carla Ruiz").await;

    let tasks = store.tasks();
    assert_eq!(tasks[0].assignees, vec!["Carla Ruiz".to_string()]);
    assert!(outcome.reply.contains("Carla Ruiz"));
    assert!(outcome.data_changed);
    assert!(store.memory(SESSION).is_none());
}

#[tokio::test]
async fn failed_assignment_keeps_memory_for_retry() {
    let store = MemStore::with_projects(&["Alpha"]);
    let task_id = Uuid::new_v4();
    store.set_memory(
        SESSION,
        PendingAction::AwaitingAssignment {
            title: "pagos".to_string(),
            task_id,
        },
    );
    store.state.lock().expect("state lock").fail_assignment = true;

    let outcome = run_chat_turn(&store, SESSION, "Carla").await;

    assert!(outcome.reply.contains("assignee update rejected"));
    assert!(!outcome.data_changed);
    assert_eq!(
        store.memory(SESSION),
        Some(PendingAction::AwaitingAssignment {
            title: "pagos".to_string(),
            task_id,
        })
    );
}

#[tokio::test]
async fn failed_task_creation_keeps_project_flow_retryable() {
    let store = MemStore::with_projects(&["Alpha"]);
    store.set_memory(
        SESSION,
        PendingAction::AwaitingProject {
            title: "pagos".to_string(),
            last_options: vec!["Alpha".to_string()],
        },
    );
    store.state.lock().expect("state lock").fail_task_creation = true;

    let outcome = run_chat_turn(&store, SESSION, "1").await;

    assert!(outcome.reply.contains("task insert rejected"));
    assert_eq!(
        store.memory(SESSION),
        Some(PendingAction::AwaitingProject {
            title: "pagos".to_string(),
            last_options: vec!["Alpha".to_string()],
        })
    );
}

#[tokio::test]
async fn failed_memory_load_still_ends_in_a_reply() {
    let store = MemStore::with_projects(&["Alpha"]);
    let pending = PendingAction::AwaitingConfirmation { command: None };
    store.set_memory(SESSION, pending.clone());
    store.state.lock().expect("state lock").fail_memory_load = true;

    let outcome = run_chat_turn(&store, SESSION, "si").await;

    assert!(outcome.reply.contains("Ocurrió un error"));
    assert!(!outcome.data_changed);
    assert_eq!(store.memory(SESSION), Some(pending));
    // Both sides of the failed turn still land in chat history.
    let chat = store.chat();
    assert_eq!(chat.len(), 2);
    assert_eq!(chat[1].1, ChatRole::Assistant);
}

#[tokio::test]
async fn failed_project_listing_still_ends_in_a_reply() {
    let store = MemStore::with_projects(&["Alpha"]);
    store.state.lock().expect("state lock").fail_project_listing = true;

    let outcome = run_chat_turn(&store, SESSION, "muéstrame los proyectos").await;

    assert!(outcome.reply.contains("Ocurrió un error"));
    assert!(!outcome.data_changed);
    assert!(store.memory(SESSION).is_none());
}

#[tokio::test]
async fn unresolved_disambiguation_reply_keeps_last_options_unchanged() {
    let store = MemStore::with_projects(&["Alpha", "Beta"]);
    let pending = PendingAction::AwaitingProject {
        title: "pagos".to_string(),
        last_options: vec!["Alpha".to_string(), "Beta".to_string()],
    };
    store.set_memory(SESSION, pending.clone());

    let first = run_chat_turn(&store, SESSION, "ninguno de esos").await;
    let second = run_chat_turn(&store, SESSION, "tampoco").await;

    assert_eq!(first.reply, second.reply);
    assert_eq!(store.memory(SESSION), Some(pending));
    assert!(store.tasks().is_empty());
}

#[tokio::test]
async fn doc_flow_numeric_three_resolves_past_its_ordinal_map() {
    let store = MemStore::with_projects(&["Alpha", "Beta", "Gamma"]);
    store.set_memory(
        SESSION,
        PendingAction::AwaitingProjectDoc {
            title: "Alcance MVP".to_string(),
            doc_type: DocumentType::Scope,
            last_options: vec![
                "Alpha".to_string(),
                "Beta".to_string(),
                "Gamma".to_string(),
            ],
        },
    );

    let outcome = run_chat_turn(&store, SESSION, "3").await;

    let documents = store.documents();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].project_id, store.project_id("Gamma"));
    assert_eq!(documents[0].title, "Alcance MVP");
    assert_eq!(documents[0].content, "# Alcance MVP");
    assert_eq!(documents[0].doc_type, DocumentType::Scope);
    assert!(outcome.data_changed);
    // Document creation has no follow-up step.
    assert!(store.memory(SESSION).is_none());
}

#[tokio::test]
async fn document_creation_without_project_awaits_project_choice() {
    let store = MemStore::with_projects(&["Alpha", "Beta"]);

    let outcome = run_chat_turn(&store, SESSION, "genera un doc tecnico").await;

    assert!(outcome.reply.contains("1. Alpha"));
    assert_eq!(
        store.memory(SESSION),
        Some(PendingAction::AwaitingProjectDoc {
            title: "tecnico".to_string(),
            doc_type: DocumentType::Technical,
            last_options: vec!["Alpha".to_string(), "Beta".to_string()],
        })
    );
}

#[tokio::test]
async fn confirmation_special_cases_only_the_list_projects_command() {
    let store = MemStore::with_projects(&["Alpha"]);
    store.set_memory(
        SESSION,
        PendingAction::AwaitingConfirmation {
            command: Some("list_projects".to_string()),
        },
    );

    let listing = run_chat_turn(&store, SESSION, "si, procede").await;
    assert!(listing.reply.contains("Alpha [active]"));
    assert!(store.memory(SESSION).is_none());

    store.set_memory(
        SESSION,
        PendingAction::AwaitingConfirmation {
            command: Some("archive_project".to_string()),
        },
    );
    let generic = run_chat_turn(&store, SESSION, "ok").await;
    assert!(!generic.reply.contains("Alpha"));
    assert!(store.memory(SESSION).is_none());
}

#[tokio::test]
async fn non_affirmative_confirmation_reply_cancels_and_clears_memory() {
    let store = MemStore::with_projects(&["Alpha"]);
    store.set_memory(SESSION, PendingAction::AwaitingConfirmation { command: None });

    let outcome = run_chat_turn(&store, SESSION, "mejor no").await;

    assert!(outcome.reply.contains("cancelada"));
    assert!(store.memory(SESSION).is_none());
}

#[tokio::test]
async fn open_task_listing_caps_at_five_and_skips_done() {
    let store = MemStore::with_projects(&["Alpha"]);
    let project_id = store.project_id("Alpha");
    {
        let mut state = store.state.lock().expect("state lock");
        for index in 0..7 {
            state.tasks.push(Task {
                id: Uuid::new_v4(),
                project_id,
                title: format!("tarea {index}"),
                status: if index == 0 {
                    TaskStatus::Done
                } else {
                    TaskStatus::Todo
                },
                assignees: Vec::new(),
                created_at: Utc::now(),
            });
        }
    }

    let outcome = run_chat_turn(&store, SESSION, "qué tareas hay").await;

    assert!(!outcome.reply.contains("tarea 0"));
    assert_eq!(outcome.reply.matches("• ").count(), 5);
}

#[tokio::test]
async fn empty_backlog_reports_no_pending_tasks() {
    let store = MemStore::with_projects(&["Alpha"]);

    let outcome = run_chat_turn(&store, SESSION, "backlog").await;

    assert_eq!(outcome.reply, "No hay tareas pendientes.");
}

#[tokio::test]
async fn chat_history_records_user_then_assistant_per_turn() {
    let store = MemStore::with_projects(&["Alpha"]);

    run_chat_turn(&store, SESSION, "hola").await;

    let chat = store.chat();
    assert_eq!(chat.len(), 2);
    assert_eq!(chat[0].1, ChatRole::User);
    assert_eq!(chat[0].2, "hola");
    assert_eq!(chat[1].1, ChatRole::Assistant);
}
