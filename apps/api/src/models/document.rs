use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[cfg(test)]
use super::RecordStatus;

/// The AI-owned columns of a knowledge document.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub status: String,
    pub ai_summary: Option<String>,
    pub key_points: Option<Value>,
    pub ai_degraded: bool,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl DocumentRow {
    pub fn status(&self) -> Option<RecordStatus> {
        RecordStatus::parse(&self.status)
    }
}
