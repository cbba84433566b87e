use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[cfg(test)]
use super::RecordStatus;

/// The AI-owned columns of a courseware record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoursewareRow {
    pub id: Uuid,
    pub status: String,
    pub outline: Option<Value>,
    pub scripts: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl CoursewareRow {
    pub fn status(&self) -> Option<RecordStatus> {
        RecordStatus::parse(&self.status)
    }
}
