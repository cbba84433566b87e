//! Student diagnosis — turns a learner's skill radar and practice history into a report.
//!
//! Every upstream failure is reported as a generic 500 for this endpoint.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{generate, GenerationTask, Generated};
use crate::generation::prompts::{fill_template, DIAGNOSIS_PROMPT_TEMPLATE, DIAGNOSIS_ROLE};
use crate::llm_client::prompts::{system_prompt, LANGUAGE_INSTRUCTION};
use crate::llm_client::ChatModel;

/// One axis of the skill radar chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarPoint {
    #[serde(alias = "dimension")]
    pub subject: String,
    pub score: f64,
    pub full_mark: Option<f64>,
}

/// One completed practice session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeRecord {
    pub scenario: String,
    pub score: Option<f64>,
    pub date: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnoseStudentRequest {
    pub student_name: String,
    /// Required, but may be empty.
    pub radar_data: Option<Vec<RadarPoint>>,
    /// Required, but may be empty.
    pub practice_history: Option<Vec<PracticeRecord>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DimensionAnalysis {
    pub dimension: String,
    pub score: f64,
    pub comment: String,
}

/// Diagnosis report returned to the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Diagnosis {
    pub overall_level: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub dimension_analysis: Vec<DimensionAnalysis>,
    pub recommendations: Vec<String>,
    pub suggested_scenarios: Vec<String>,
}

pub struct DiagnosisTask<'a> {
    student_name: &'a str,
    radar_data: &'a [RadarPoint],
    practice_history: &'a [PracticeRecord],
}

impl<'a> DiagnosisTask<'a> {
    pub fn new(request: &'a DiagnoseStudentRequest) -> Result<Self, AppError> {
        if request.student_name.trim().is_empty() {
            return Err(AppError::Validation("studentName is required".to_string()));
        }
        let radar_data = request
            .radar_data
            .as_deref()
            .ok_or_else(|| AppError::Validation("radarData is required".to_string()))?;
        let practice_history = request
            .practice_history
            .as_deref()
            .ok_or_else(|| AppError::Validation("practiceHistory is required".to_string()))?;
        Ok(Self {
            student_name: &request.student_name,
            radar_data,
            practice_history,
        })
    }
}

impl GenerationTask for DiagnosisTask<'_> {
    type Output = Diagnosis;

    fn name(&self) -> &'static str {
        "diagnosis"
    }

    fn system_prompt(&self) -> String {
        system_prompt(DIAGNOSIS_ROLE)
    }

    fn build_prompt(&self) -> String {
        let radar_json = serde_json::to_string_pretty(self.radar_data)
            .unwrap_or_else(|_| "[]".to_string());
        let history_json = serde_json::to_string_pretty(self.practice_history)
            .unwrap_or_else(|_| "[]".to_string());

        fill_template(
            DIAGNOSIS_PROMPT_TEMPLATE,
            &[
                ("student_name", self.student_name),
                ("radar_json", radar_json.as_str()),
                ("history_json", history_json.as_str()),
                ("language_instruction", LANGUAGE_INSTRUCTION),
            ],
        )
    }

    fn fallback(&self) -> Diagnosis {
        Diagnosis {
            overall_level: "intermediate".to_string(),
            summary: format!(
                "{}的学习数据已收到，AI 诊断暂时无法生成详细报告，请稍后重试。",
                self.student_name
            ),
            strengths: vec!["坚持完成练习任务".to_string()],
            weaknesses: vec!["需要更多练习数据以识别薄弱环节".to_string()],
            dimension_analysis: self
                .radar_data
                .iter()
                .map(|point| DimensionAnalysis {
                    dimension: point.subject.clone(),
                    score: point.score,
                    comment: "暂无详细分析".to_string(),
                })
                .collect(),
            recommendations: vec![
                "每周至少完成三次场景练习".to_string(),
                "复盘最近一次练习的 AI 点评".to_string(),
            ],
            suggested_scenarios: vec!["客户异议处理".to_string()],
        }
    }
}

/// Validates the request and generates a diagnosis.
pub async fn diagnose_student(
    llm: &dyn ChatModel,
    request: &DiagnoseStudentRequest,
) -> Result<Generated<Diagnosis>, AppError> {
    let task = DiagnosisTask::new(request)?;
    generate(llm, &task)
        .await
        .map_err(|e| AppError::from_llm_generic("Diagnosis generation failed", e))
}
