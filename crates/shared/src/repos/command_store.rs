use uuid::Uuid;

use crate::conversation_memory::PendingAction;
use crate::interpreter::engine::{CommandStore, StoreFuture};
use crate::models::{ChatRole, Document, DocumentType, Project, Task, TaskStatus};

use super::Store;

impl CommandStore for Store {
    fn load_memory<'a>(&'a self, session_id: &'a str) -> StoreFuture<'a, Option<PendingAction>> {
        Box::pin(Store::load_memory(self, session_id))
    }

    fn upsert_memory<'a>(
        &'a self,
        session_id: &'a str,
        action: &'a PendingAction,
    ) -> StoreFuture<'a, ()> {
        Box::pin(Store::upsert_memory(self, session_id, action))
    }

    fn delete_memory<'a>(&'a self, session_id: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(Store::delete_memory(self, session_id))
    }

    fn list_projects<'a>(&'a self) -> StoreFuture<'a, Vec<Project>> {
        Box::pin(Store::list_projects(self))
    }

    fn list_open_tasks<'a>(&'a self, limit: i64) -> StoreFuture<'a, Vec<Task>> {
        Box::pin(Store::list_open_tasks(self, limit))
    }

    fn create_task<'a>(
        &'a self,
        project_id: Uuid,
        title: &'a str,
        status: TaskStatus,
    ) -> StoreFuture<'a, Task> {
        Box::pin(Store::create_task(self, project_id, title, status))
    }

    fn update_task_assignees<'a>(
        &'a self,
        task_id: Uuid,
        assignees: &'a [String],
    ) -> StoreFuture<'a, ()> {
        Box::pin(Store::update_task_assignees(self, task_id, assignees))
    }

    fn create_document<'a>(
        &'a self,
        project_id: Uuid,
        title: &'a str,
        content: &'a str,
        doc_type: DocumentType,
    ) -> StoreFuture<'a, Document> {
        Box::pin(Store::create_document(self, project_id, title, content, doc_type))
    }

    fn append_chat_message<'a>(
        &'a self,
        session_id: &'a str,
        role: ChatRole,
        content: &'a str,
    ) -> StoreFuture<'a, ()> {
        Box::pin(Store::append_chat_message(self, session_id, role, content))
    }
}
