//! In-memory `RecordStore` used by the router tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentAnalysis, RecordStore};
use crate::errors::AppError;
use crate::models::courseware::CoursewareRow;
use crate::models::document::DocumentRow;
use crate::models::RecordStatus;

/// HashMap-backed store. Records must be seeded before generation touches them,
/// mirroring the UPDATE-only behaviour of the Postgres store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    documents: Arc<RwLock<HashMap<Uuid, DocumentRow>>>,
    coursewares: Arc<RwLock<HashMap<Uuid, CoursewareRow>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_document(&self, id: Uuid, status: RecordStatus) {
        self.documents.write().await.insert(
            id,
            DocumentRow {
                id,
                status: status.as_str().to_string(),
                ai_summary: None,
                key_points: None,
                ai_degraded: false,
                updated_at: Utc::now(),
            },
        );
    }

    pub async fn insert_courseware(&self, id: Uuid, status: RecordStatus) {
        self.coursewares.write().await.insert(
            id,
            CoursewareRow {
                id,
                status: status.as_str().to_string(),
                outline: None,
                scripts: None,
                updated_at: Utc::now(),
            },
        );
    }

    async fn update_document<F>(&self, id: Uuid, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut DocumentRow) + Send,
    {
        let mut documents = self.documents.write().await;
        let row = documents
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
        apply(row);
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn update_courseware<F>(&self, id: Uuid, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut CoursewareRow) + Send,
    {
        let mut coursewares = self.coursewares.write().await;
        let row = coursewares
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Courseware {id} not found")))?;
        apply(row);
        row.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_document(&self, id: Uuid) -> Result<DocumentRow, AppError> {
        self.documents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
    }

    async fn mark_document_processing(&self, id: Uuid) -> Result<(), AppError> {
        self.update_document(id, |row| {
            row.status = RecordStatus::Processing.as_str().to_string();
        })
        .await
    }

    async fn complete_document(
        &self,
        id: Uuid,
        analysis: DocumentAnalysis<'_>,
    ) -> Result<(), AppError> {
        let summary = analysis.summary.to_string();
        let key_points = Value::from(analysis.key_points.to_vec());
        let degraded = analysis.degraded;
        self.update_document(id, move |row| {
            row.status = RecordStatus::Ready.as_str().to_string();
            row.ai_summary = Some(summary);
            row.key_points = Some(key_points);
            row.ai_degraded = degraded;
        })
        .await
    }

    async fn fail_document(&self, id: Uuid) -> Result<(), AppError> {
        self.update_document(id, |row| {
            row.status = RecordStatus::Error.as_str().to_string();
        })
        .await
    }

    async fn get_courseware(&self, id: Uuid) -> Result<CoursewareRow, AppError> {
        self.coursewares
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Courseware {id} not found")))
    }

    async fn mark_courseware_processing(&self, id: Uuid) -> Result<(), AppError> {
        self.update_courseware(id, |row| {
            row.status = RecordStatus::Processing.as_str().to_string();
        })
        .await
    }

    async fn complete_courseware(
        &self,
        id: Uuid,
        outline: &Value,
        scripts: &Value,
    ) -> Result<(), AppError> {
        let outline = outline.clone();
        let scripts = scripts.clone();
        self.update_courseware(id, move |row| {
            row.status = RecordStatus::Ready.as_str().to_string();
            row.outline = Some(outline);
            row.scripts = Some(scripts);
        })
        .await
    }

    async fn fail_courseware(&self, id: Uuid) -> Result<(), AppError> {
        self.update_courseware(id, |row| {
            row.status = RecordStatus::Error.as_str().to_string();
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_document_lifecycle() {
        let store = InMemoryRecordStore::new();
        let id = Uuid::new_v4();
        store.insert_document(id, RecordStatus::Processing).await;

        let points = vec!["first".to_string()];
        store
            .complete_document(
                id,
                DocumentAnalysis {
                    summary: "summary",
                    key_points: &points,
                    degraded: false,
                },
            )
            .await
            .unwrap();

        let row = store.get_document(id).await.unwrap();
        assert_eq!(row.status(), Some(RecordStatus::Ready));
        assert_eq!(row.ai_summary.as_deref(), Some("summary"));
        assert_eq!(row.key_points, Some(serde_json::json!(["first"])));
    }

    #[tokio::test]
    async fn test_updates_to_missing_record_are_not_found() {
        let store = InMemoryRecordStore::new();
        let err = store.fail_courseware(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
