use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::models::{Document, DocumentType};

use super::{Store, StoreError};

impl Store {
    pub async fn create_document(
        &self,
        project_id: Uuid,
        title: &str,
        content: &str,
        doc_type: DocumentType,
    ) -> Result<Document, StoreError> {
        let row = sqlx::query(
            "INSERT INTO documents (id, project_id, title, content, doc_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, project_id, title, content, doc_type, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(title)
        .bind(content)
        .bind(doc_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        document_from_row(&row)
    }

    pub async fn list_documents(
        &self,
        project_id: Option<Uuid>,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, project_id, title, content, doc_type, created_at
             FROM documents
             WHERE $1::uuid IS NULL OR project_id = $1
             ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(document_from_row).collect()
    }
}

fn document_from_row(row: &PgRow) -> Result<Document, StoreError> {
    let doc_type_raw: String = row.try_get("doc_type")?;
    let doc_type = DocumentType::from_db(&doc_type_raw).ok_or_else(|| {
        StoreError::InvalidData(format!("unknown document type: {doc_type_raw}"))
    })?;

    Ok(Document {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        doc_type,
        created_at: row.try_get("created_at")?,
    })
}
