//! Training-plan generation. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{generate, GenerationTask, Generated};
use crate::generation::prompts::{
    fill_template, NOT_SPECIFIED, TRAINING_PLAN_PROMPT_TEMPLATE, TRAINING_PLAN_ROLE,
};
use crate::llm_client::prompts::{system_prompt, LANGUAGE_INSTRUCTION};
use crate::llm_client::ChatModel;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateTrainingPlanRequest {
    pub prompt: String,
    pub target_audience: Option<String>,
    pub training_goals: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanStage {
    pub name: String,
    pub duration: String,
    pub objectives: Vec<String>,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingPlan {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub stages: Vec<PlanStage>,
    pub assessment: String,
}

pub struct TrainingPlanTask<'a> {
    request: &'a GenerateTrainingPlanRequest,
}

impl<'a> TrainingPlanTask<'a> {
    pub fn new(request: &'a GenerateTrainingPlanRequest) -> Result<Self, AppError> {
        if request.prompt.trim().is_empty() {
            return Err(AppError::Validation("prompt cannot be empty".to_string()));
        }
        Ok(Self { request })
    }
}

impl GenerationTask for TrainingPlanTask<'_> {
    type Output = TrainingPlan;

    fn name(&self) -> &'static str {
        "training_plan"
    }

    fn system_prompt(&self) -> String {
        system_prompt(TRAINING_PLAN_ROLE)
    }

    fn build_prompt(&self) -> String {
        fill_template(
            TRAINING_PLAN_PROMPT_TEMPLATE,
            &[
                ("prompt", self.request.prompt.as_str()),
                (
                    "target_audience",
                    self.request.target_audience.as_deref().unwrap_or(NOT_SPECIFIED),
                ),
                (
                    "training_goals",
                    self.request.training_goals.as_deref().unwrap_or(NOT_SPECIFIED),
                ),
                ("language_instruction", LANGUAGE_INSTRUCTION),
            ],
        )
    }

    fn fallback(&self) -> TrainingPlan {
        let stage = |name: &str, duration: &str, objective: &str, activity: &str| PlanStage {
            name: name.to_string(),
            duration: duration.to_string(),
            objectives: vec![objective.to_string()],
            activities: vec![activity.to_string()],
        };

        TrainingPlan {
            title: "销售能力提升培训计划".to_string(),
            description: "AI 暂时无法生成定制计划，以下为通用培训框架，可在此基础上调整。"
                .to_string(),
            duration: "4周".to_string(),
            stages: vec![
                stage("基础知识", "1周", "掌握产品与行业知识", "学习知识库文档并完成测验"),
                stage("场景练习", "2周", "熟练应对常见客户场景", "完成 AI 陪练场景练习"),
                stage("综合考核", "1周", "检验综合实战能力", "模拟完整销售流程"),
            ],
            assessment: "结合练习得分与最终模拟考核评定".to_string(),
        }
    }
}

pub async fn generate_training_plan(
    llm: &dyn ChatModel,
    request: &GenerateTrainingPlanRequest,
) -> Result<Generated<TrainingPlan>, AppError> {
    let task = TrainingPlanTask::new(request)?;
    generate(llm, &task)
        .await
        .map_err(|e| AppError::from_llm("Training plan generation failed", e))
}
