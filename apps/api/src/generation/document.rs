//! Document parsing — summarizes an uploaded knowledge document and stores the
//! summary and key points on its record.
//!
//! Record status: `processing → ready` whenever a summary is stored (a fallback
//! summary is stored with `ai_degraded = true`), `processing → error` when the
//! model call fails.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::document_loader::DocumentLoader;
use crate::generation::generator::{generate, GenerationTask, Generated};
use crate::generation::prompts::{
    fill_template, DOCUMENT_CONTENT_UNAVAILABLE, DOCUMENT_PROMPT_TEMPLATE, DOCUMENT_ROLE,
};
use crate::llm_client::prompts::{system_prompt, LANGUAGE_INSTRUCTION};
use crate::llm_client::ChatModel;
use crate::state::AppState;
use crate::store::{DocumentAnalysis, RecordStore};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseDocumentRequest {
    pub document_id: Option<Uuid>,
    pub file_url: String,
    pub file_name: String,
}

impl ParseDocumentRequest {
    /// Checks required fields and returns the document id.
    pub fn validate(&self) -> Result<Uuid, AppError> {
        let id = self
            .document_id
            .ok_or_else(|| AppError::Validation("documentId is required".to_string()))?;
        if self.file_url.trim().is_empty() {
            return Err(AppError::Validation("fileUrl is required".to_string()));
        }
        if self.file_name.trim().is_empty() {
            return Err(AppError::Validation("fileName is required".to_string()));
        }
        Ok(id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentSummary {
    pub summary: String,
    pub key_points: Vec<String>,
}

pub struct DocumentTask<'a> {
    request: &'a ParseDocumentRequest,
    content: Option<String>,
}

impl GenerationTask for DocumentTask<'_> {
    type Output = DocumentSummary;

    fn name(&self) -> &'static str {
        "document"
    }

    fn system_prompt(&self) -> String {
        system_prompt(DOCUMENT_ROLE)
    }

    fn build_prompt(&self) -> String {
        fill_template(
            DOCUMENT_PROMPT_TEMPLATE,
            &[
                ("file_name", self.request.file_name.as_str()),
                ("file_url", self.request.file_url.as_str()),
                (
                    "content",
                    self.content.as_deref().unwrap_or(DOCUMENT_CONTENT_UNAVAILABLE),
                ),
                ("language_instruction", LANGUAGE_INSTRUCTION),
            ],
        )
    }

    fn fallback(&self) -> DocumentSummary {
        DocumentSummary {
            summary: format!(
                "《{}》已上传，AI 暂时无法解析其内容，请查看原文档。",
                self.request.file_name
            ),
            key_points: vec!["请查看原文档了解详细内容".to_string()],
        }
    }
}

/// Validates, loads, summarizes and persists one document.
pub async fn parse_document(
    llm: &dyn ChatModel,
    store: &dyn RecordStore,
    loader: &dyn DocumentLoader,
    request: &ParseDocumentRequest,
) -> Result<Generated<DocumentSummary>, AppError> {
    let id = request.validate()?;
    store.mark_document_processing(id).await?;
    summarize_document(llm, store, loader, id, request).await
}

/// Loads, summarizes and persists a document already marked `processing`.
async fn summarize_document(
    llm: &dyn ChatModel,
    store: &dyn RecordStore,
    loader: &dyn DocumentLoader,
    id: Uuid,
    request: &ParseDocumentRequest,
) -> Result<Generated<DocumentSummary>, AppError> {
    let content = match loader
        .load_text(&request.file_url, &request.file_name)
        .await
    {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Could not load document {id} ({}): {e:#}", request.file_name);
            None
        }
    };

    let task = DocumentTask { request, content };

    let generated = match generate(llm, &task).await {
        Ok(generated) => generated,
        Err(e) => {
            if let Err(mark_err) = store.fail_document(id).await {
                error!("Failed to mark document {id} as error: {mark_err}");
            }
            return Err(AppError::from_llm_generic("Document parsing failed", e));
        }
    };

    store
        .complete_document(
            id,
            DocumentAnalysis {
                summary: &generated.value.summary,
                key_points: &generated.value.key_points,
                degraded: generated.degraded,
            },
        )
        .await?;

    info!(
        "Document {id} ready with {} key points (degraded={})",
        generated.value.key_points.len(),
        generated.degraded
    );

    Ok(generated)
}

/// Validates the request and marks the record `processing`, then summarizes it
/// on a detached task. Errors before the spawn go back to the caller, so an
/// unknown id fails here. Later failures are logged by the task.
pub async fn queue_parse_document(
    state: AppState,
    request: ParseDocumentRequest,
) -> Result<(), AppError> {
    let id = request.validate()?;
    state.store.mark_document_processing(id).await?;

    tokio::spawn(async move {
        let result = summarize_document(
            state.llm.as_ref(),
            state.store.as_ref(),
            state.loader.as_ref(),
            id,
            &request,
        )
        .await;

        if let Err(e) = result {
            error!(
                "Background parse of document {id} ({}) failed: {e}",
                request.file_name
            );
        }
    });
    Ok(())
}
