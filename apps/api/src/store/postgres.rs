use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DocumentAnalysis, RecordStore};
use crate::errors::AppError;
use crate::models::courseware::CoursewareRow;
use crate::models::document::DocumentRow;
use crate::models::RecordStatus;

/// `RecordStore` over the backend's Postgres database.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_status(
        &self,
        table: Table,
        id: Uuid,
        status: RecordStatus,
    ) -> Result<(), AppError> {
        let sql = match table {
            Table::Documents => "UPDATE documents SET status = $1, updated_at = NOW() WHERE id = $2",
            Table::Coursewares => {
                "UPDATE coursewares SET status = $1, updated_at = NOW() WHERE id = $2"
            }
        };
        let result = sqlx::query(sql)
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_found(result.rows_affected(), table, id)
    }
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Documents,
    Coursewares,
}

fn ensure_found(rows: u64, table: Table, id: Uuid) -> Result<(), AppError> {
    if rows == 0 {
        let kind = match table {
            Table::Documents => "Document",
            Table::Coursewares => "Courseware",
        };
        return Err(AppError::NotFound(format!("{kind} {id} not found")));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get_document(&self, id: Uuid) -> Result<DocumentRow, AppError> {
        sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, status, ai_summary, key_points,
                   COALESCE(ai_degraded, FALSE) AS ai_degraded, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
    }

    async fn mark_document_processing(&self, id: Uuid) -> Result<(), AppError> {
        self.set_status(Table::Documents, id, RecordStatus::Processing)
            .await
    }

    async fn complete_document(
        &self,
        id: Uuid,
        analysis: DocumentAnalysis<'_>,
    ) -> Result<(), AppError> {
        let key_points = serde_json::to_value(analysis.key_points)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize key points: {e}")))?;

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET status = $1, ai_summary = $2, key_points = $3, ai_degraded = $4, updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(RecordStatus::Ready.as_str())
        .bind(analysis.summary)
        .bind(&key_points)
        .bind(analysis.degraded)
        .bind(id)
        .execute(&self.pool)
        .await?;

        ensure_found(result.rows_affected(), Table::Documents, id)
    }

    async fn fail_document(&self, id: Uuid) -> Result<(), AppError> {
        self.set_status(Table::Documents, id, RecordStatus::Error)
            .await
    }

    async fn get_courseware(&self, id: Uuid) -> Result<CoursewareRow, AppError> {
        sqlx::query_as::<_, CoursewareRow>(
            "SELECT id, status, outline, scripts, updated_at FROM coursewares WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Courseware {id} not found")))
    }

    async fn mark_courseware_processing(&self, id: Uuid) -> Result<(), AppError> {
        self.set_status(Table::Coursewares, id, RecordStatus::Processing)
            .await
    }

    async fn complete_courseware(
        &self,
        id: Uuid,
        outline: &Value,
        scripts: &Value,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE coursewares
            SET status = $1, outline = $2, scripts = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(RecordStatus::Ready.as_str())
        .bind(outline)
        .bind(scripts)
        .bind(id)
        .execute(&self.pool)
        .await?;

        ensure_found(result.rows_affected(), Table::Coursewares, id)
    }

    async fn fail_courseware(&self, id: Uuid) -> Result<(), AppError> {
        self.set_status(Table::Coursewares, id, RecordStatus::Error)
            .await
    }
}
