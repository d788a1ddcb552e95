use sqlx::Row;
use uuid::Uuid;

use crate::models::{ChatMessage, ChatRole};

use super::{Store, StoreError};

impl Store {
    pub async fn append_chat_message(
        &self,
        session_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO chat_messages (id, session_id, role, content)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(role.as_str())
        .bind(content)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_chat_messages(
        &self,
        session_id: &str,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, session_id, role, content, created_at
             FROM chat_messages
             WHERE session_id = $1
             ORDER BY created_at",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let role_raw: String = row.try_get("role")?;
                let role = ChatRole::from_db(&role_raw).ok_or_else(|| {
                    StoreError::InvalidData(format!("unknown chat role: {role_raw}"))
                })?;

                Ok(ChatMessage {
                    id: row.try_get("id")?,
                    session_id: row.try_get("session_id")?,
                    role,
                    content: row.try_get("content")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
