use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::models::Project;

use super::{Store, StoreError};

impl Store {
    pub async fn create_project(&self, name: &str, status: &str) -> Result<Project, StoreError> {
        let row = sqlx::query(
            "INSERT INTO projects (id, name, status)
             VALUES ($1, $2, $3)
             RETURNING id, name, status, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        project_from_row(&row)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, status, created_at
             FROM projects
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(project_from_row).collect()
    }
}

fn project_from_row(row: &PgRow) -> Result<Project, StoreError> {
    Ok(Project {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}
