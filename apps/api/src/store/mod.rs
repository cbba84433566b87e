//! Persistence writer for the generation side effects.
//!
//! Only the AI-owned columns of `documents` and `coursewares` are touched.
//! Writes are plain single-row updates: no transaction and no version check,
//! so two generations racing on one record leave whichever status lands last.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::courseware::CoursewareRow;
use crate::models::document::DocumentRow;

#[cfg(test)]
pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;

/// Summary and key points produced for a document.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis<'a> {
    pub summary: &'a str,
    pub key_points: &'a [String],
    pub degraded: bool,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_document(&self, id: Uuid) -> Result<DocumentRow, AppError>;

    /// `* → processing`
    async fn mark_document_processing(&self, id: Uuid) -> Result<(), AppError>;

    /// `processing → ready`, storing the analysis.
    async fn complete_document(
        &self,
        id: Uuid,
        analysis: DocumentAnalysis<'_>,
    ) -> Result<(), AppError>;

    /// `processing → error`
    async fn fail_document(&self, id: Uuid) -> Result<(), AppError>;

    async fn get_courseware(&self, id: Uuid) -> Result<CoursewareRow, AppError>;

    async fn mark_courseware_processing(&self, id: Uuid) -> Result<(), AppError>;

    async fn complete_courseware(
        &self,
        id: Uuid,
        outline: &Value,
        scripts: &Value,
    ) -> Result<(), AppError>;

    async fn fail_courseware(&self, id: Uuid) -> Result<(), AppError>;
}
