use serde_json::Value;
use sqlx::Row;

use crate::conversation_memory::PendingAction;

use super::{Store, StoreError};

impl Store {
    pub async fn load_memory(&self, session_id: &str) -> Result<Option<PendingAction>, StoreError> {
        let row = sqlx::query(
            "SELECT current_action, context_data
             FROM conversation_memory
             WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let current_action: String = row.try_get("current_action")?;
            let context_data: Value = row.try_get("context_data")?;

            serde_json::from_value(serde_json::json!({
                "current_action": current_action,
                "context_data": context_data,
            }))
            .map_err(|err| StoreError::InvalidData(format!("conversation memory invalid: {err}")))
        })
        .transpose()
    }

    pub async fn upsert_memory(
        &self,
        session_id: &str,
        action: &PendingAction,
    ) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(action)
            .map_err(|err| StoreError::InvalidData(format!("conversation memory invalid: {err}")))?;
        let context_data = encoded
            .get("context_data")
            .cloned()
            .unwrap_or(Value::Object(serde_json::Map::new()));

        sqlx::query(
            "INSERT INTO conversation_memory (session_id, current_action, context_data, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (session_id)
             DO UPDATE SET
               current_action = EXCLUDED.current_action,
               context_data = EXCLUDED.context_data,
               updated_at = NOW()",
        )
        .bind(session_id)
        .bind(action.action_tag())
        .bind(context_data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_memory(&self, session_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM conversation_memory WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
