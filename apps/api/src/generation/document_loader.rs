//! Fetches an uploaded knowledge document and turns it into prompt text.
//!
//! Loading is best-effort: callers fall back to a name-only prompt on any error.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::Config;

#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Returns the document's text, truncated to the loader's limit.
    async fn load_text(&self, file_url: &str, file_name: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    PlainText,
}

fn detect_kind(file_name: &str) -> Option<DocumentKind> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(DocumentKind::Pdf),
        "txt" | "md" | "markdown" | "csv" | "json" | "html" | "htm" => {
            Some(DocumentKind::PlainText)
        }
        _ => None,
    }
}

fn decode(kind: DocumentKind, body: &Bytes) -> Result<String> {
    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(body)
            .map_err(|e| anyhow::anyhow!("Failed to extract PDF text: {e}")),
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(body).into_owned()),
    }
}

/// Runs `decode` on the blocking pool. A panic inside the PDF extractor
/// surfaces as an ordinary load error.
async fn extract_text(kind: DocumentKind, body: Bytes) -> Result<String> {
    tokio::task::spawn_blocking(move || decode(kind, &body))
        .await
        .context("Document text extraction aborted")?
}

/// Reads the response body, giving up once it grows past `max_bytes`.
async fn read_capped(mut response: Response, max_bytes: usize, file_name: &str) -> Result<Bytes> {
    if let Some(declared) = response.content_length() {
        if declared > max_bytes as u64 {
            bail!("Document {file_name} is {declared} bytes, exceeds limit of {max_bytes}");
        }
    }

    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed to read {file_name}"))?
    {
        if body.len() + chunk.len() > max_bytes {
            bail!("Document {file_name} exceeds limit of {max_bytes} bytes");
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Keeps at most `max_chars` characters, collapsing blank-line runs first.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let mut cleaned = String::with_capacity(text.len().min(max_chars * 4));
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        cleaned.push_str(line);
        cleaned.push('\n');
    }
    cleaned.trim().chars().take(max_chars).collect()
}

/// Downloads documents over HTTP from their storage URL.
#[derive(Clone)]
pub struct HttpDocumentLoader {
    client: Client,
    max_bytes: usize,
    max_chars: usize,
}

impl HttpDocumentLoader {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.document_fetch_timeout_secs))
                .build()
                .context("Failed to build document HTTP client")?,
            max_bytes: config.max_document_bytes,
            max_chars: config.max_document_chars,
        })
    }
}

#[async_trait]
impl DocumentLoader for HttpDocumentLoader {
    async fn load_text(&self, file_url: &str, file_name: &str) -> Result<String> {
        let Some(kind) = detect_kind(file_name) else {
            bail!("Unsupported document type: {file_name}");
        };

        let response = self
            .client
            .get(file_url)
            .send()
            .await
            .with_context(|| format!("Failed to download {file_name}"))?
            .error_for_status()
            .with_context(|| format!("Storage refused {file_name}"))?;
        let body = read_capped(response, self.max_bytes, file_name).await?;
        debug!("Downloaded {file_name}: {} bytes", body.len());

        let text = extract_text(kind, body).await?;
        let text = truncate_text(&text, self.max_chars);
        if text.is_empty() {
            bail!("Document {file_name} contains no extractable text");
        }
        Ok(text)
    }
}
