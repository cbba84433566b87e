pub mod courseware;
pub mod document;

use serde::{Deserialize, Serialize};

/// Generation status shared by documents and coursewares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Processing,
    Ready,
    Error,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Processing => "processing",
            RecordStatus::Ready => "ready",
            RecordStatus::Error => "error",
        }
    }

    /// Unknown values written by other clients read back as `None`.
    #[cfg(test)]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "processing" => Some(RecordStatus::Processing),
            "ready" => Some(RecordStatus::Ready),
            "error" => Some(RecordStatus::Error),
            _ => None,
        }
    }
}
