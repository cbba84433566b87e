//! Courseware generation — builds a course outline and per-section scripts from
//! knowledge documents, then writes them onto the courseware record.
//!
//! Record status: `processing → ready` on success (degraded or not),
//! `processing → error` when the model call itself fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate, GenerationTask, Generated};
use crate::generation::prompts::{
    fill_template, COURSEWARE_PROMPT_TEMPLATE, COURSEWARE_ROLE, NOT_SPECIFIED,
};
use crate::llm_client::prompts::{system_prompt, LANGUAGE_INSTRUCTION};
use crate::llm_client::ChatModel;
use crate::store::RecordStore;

/// A knowledge document selected as course source material.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseDocument {
    #[serde(alias = "title", alias = "fileName")]
    pub name: String,
    #[serde(alias = "aiSummary")]
    pub summary: Option<String>,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateCoursewareRequest {
    pub courseware_id: Option<Uuid>,
    pub documents: Vec<CourseDocument>,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OutlineSection {
    pub title: String,
    pub duration: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoursewareContent {
    pub outline: Vec<OutlineSection>,
    pub scripts: BTreeMap<String, String>,
}

pub struct CoursewareTask<'a> {
    courseware_id: Uuid,
    request: &'a GenerateCoursewareRequest,
}

impl<'a> CoursewareTask<'a> {
    pub fn new(request: &'a GenerateCoursewareRequest) -> Result<Self, AppError> {
        let courseware_id = request
            .courseware_id
            .ok_or_else(|| AppError::Validation("coursewareId is required".to_string()))?;
        if request.documents.is_empty() {
            return Err(AppError::Validation(
                "documents must contain at least one document".to_string(),
            ));
        }
        if request.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        Ok(Self {
            courseware_id,
            request,
        })
    }

    pub fn courseware_id(&self) -> Uuid {
        self.courseware_id
    }
}

impl GenerationTask for CoursewareTask<'_> {
    type Output = CoursewareContent;

    fn name(&self) -> &'static str {
        "courseware"
    }

    fn system_prompt(&self) -> String {
        system_prompt(COURSEWARE_ROLE)
    }

    fn build_prompt(&self) -> String {
        let documents_json = serde_json::to_string_pretty(&self.request.documents)
            .unwrap_or_else(|_| "[]".to_string());

        fill_template(
            COURSEWARE_PROMPT_TEMPLATE,
            &[
                ("title", self.request.title.as_str()),
                (
                    "description",
                    self.request.description.as_deref().unwrap_or(NOT_SPECIFIED),
                ),
                ("documents_json", documents_json.as_str()),
                ("language_instruction", LANGUAGE_INSTRUCTION),
            ],
        )
    }

    fn fallback(&self) -> CoursewareContent {
        let mut outline = vec![OutlineSection {
            title: "课程导入".to_string(),
            duration: "5分钟".to_string(),
            key_points: vec![format!("《{}》课程目标", self.request.title)],
        }];
        outline.extend(self.request.documents.iter().map(|doc| OutlineSection {
            title: doc.name.clone(),
            duration: "15分钟".to_string(),
            key_points: doc.key_points.clone(),
        }));
        outline.push(OutlineSection {
            title: "总结与测验".to_string(),
            duration: "10分钟".to_string(),
            key_points: vec!["回顾核心知识点".to_string()],
        });

        let scripts = outline
            .iter()
            .map(|section| {
                (
                    section.title.clone(),
                    format!("本节讲解「{}」，请讲师根据资料补充讲稿。", section.title),
                )
            })
            .collect();

        CoursewareContent { outline, scripts }
    }
}

/// Validates, generates and persists a courseware outline.
pub async fn generate_courseware(
    llm: &dyn ChatModel,
    store: &dyn RecordStore,
    request: &GenerateCoursewareRequest,
) -> Result<Generated<CoursewareContent>, AppError> {
    let task = CoursewareTask::new(request)?;
    let id = task.courseware_id();

    store.mark_courseware_processing(id).await?;

    let generated = match generate(llm, &task).await {
        Ok(generated) => generated,
        Err(e) => {
            if let Err(mark_err) = store.fail_courseware(id).await {
                error!("Failed to mark courseware {id} as error: {mark_err}");
            }
            return Err(AppError::from_llm("Courseware generation failed", e));
        }
    };

    let outline = serde_json::to_value(&generated.value.outline)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize outline: {e}")))?;
    let scripts = serde_json::to_value(&generated.value.scripts)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize scripts: {e}")))?;

    store.complete_courseware(id, &outline, &scripts).await?;

    info!(
        "Courseware {id} ready with {} sections (degraded={})",
        generated.value.outline.len(),
        generated.degraded
    );

    Ok(generated)
}
