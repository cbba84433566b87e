use std::sync::Arc;

use crate::config::Config;
use crate::generation::document_loader::DocumentLoader;
use crate::llm_client::ChatModel;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model gateway. `LlmClient` in production.
    pub llm: Arc<dyn ChatModel>,
    /// Documents and coursewares. `PgRecordStore` in production.
    pub store: Arc<dyn RecordStore>,
    pub loader: Arc<dyn DocumentLoader>,
    pub config: Config,
}
