use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::models::{Task, TaskStatus};

use super::{Store, StoreError};

impl Store {
    pub async fn create_task(
        &self,
        project_id: Uuid,
        title: &str,
        status: TaskStatus,
    ) -> Result<Task, StoreError> {
        let row = sqlx::query(
            "INSERT INTO tasks (id, project_id, title, status)
             VALUES ($1, $2, $3, $4)
             RETURNING id, project_id, title, status, assignees, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(title)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        task_from_row(&row)
    }

    pub async fn list_tasks(&self, project_id: Option<Uuid>) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, project_id, title, status, assignees, created_at
             FROM tasks
             WHERE $1::uuid IS NULL OR project_id = $1
             ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(task_from_row).collect()
    }

    pub async fn list_open_tasks(&self, limit: i64) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, project_id, title, status, assignees, created_at
             FROM tasks
             WHERE status <> 'done'
             ORDER BY created_at
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(task_from_row).collect()
    }

    pub async fn update_task_status(
        &self,
        task_id: Uuid,
        status: TaskStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE tasks
             SET status = $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(task_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("task"));
        }

        Ok(())
    }

    pub async fn update_task_assignees(
        &self,
        task_id: Uuid,
        assignees: &[String],
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE tasks
             SET assignees = $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(task_id)
        .bind(assignees)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("task"));
        }

        Ok(())
    }
}

fn task_from_row(row: &PgRow) -> Result<Task, StoreError> {
    let status_raw: String = row.try_get("status")?;
    let status = TaskStatus::from_db(&status_raw)
        .ok_or_else(|| StoreError::InvalidData(format!("unknown task status: {status_raw}")))?;

    Ok(Task {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        title: row.try_get("title")?,
        status,
        assignees: row.try_get("assignees")?,
        created_at: row.try_get("created_at")?,
    })
}
