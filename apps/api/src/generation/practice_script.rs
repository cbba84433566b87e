//! Practice-script generation — a role-play script between a learner and an AI
//! customer character. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{generate, GenerationTask, Generated};
use crate::generation::prompts::{
    fill_template, NOT_SPECIFIED, PRACTICE_SCRIPT_PROMPT_TEMPLATE, PRACTICE_SCRIPT_ROLE,
};
use crate::llm_client::prompts::{system_prompt, LANGUAGE_INSTRUCTION};
use crate::llm_client::ChatModel;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratePracticeScriptRequest {
    pub prompt: String,
    pub practice_mode: String,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptCharacter {
    pub name: String,
    pub role: String,
    pub personality: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialogueTurn {
    pub speaker: String,
    pub content: String,
    pub hint: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeScript {
    pub title: String,
    pub scenario: String,
    pub character: ScriptCharacter,
    pub dialogues: Vec<DialogueTurn>,
    pub evaluation_criteria: Vec<String>,
}

pub struct PracticeScriptTask<'a> {
    request: &'a GeneratePracticeScriptRequest,
}

impl<'a> PracticeScriptTask<'a> {
    pub fn new(request: &'a GeneratePracticeScriptRequest) -> Result<Self, AppError> {
        if request.prompt.trim().is_empty() {
            return Err(AppError::Validation("prompt cannot be empty".to_string()));
        }
        if request.practice_mode.trim().is_empty() {
            return Err(AppError::Validation("practiceMode is required".to_string()));
        }
        Ok(Self { request })
    }
}

impl GenerationTask for PracticeScriptTask<'_> {
    type Output = PracticeScript;

    fn name(&self) -> &'static str {
        "practice_script"
    }

    fn system_prompt(&self) -> String {
        system_prompt(PRACTICE_SCRIPT_ROLE)
    }

    fn build_prompt(&self) -> String {
        fill_template(
            PRACTICE_SCRIPT_PROMPT_TEMPLATE,
            &[
                ("prompt", self.request.prompt.as_str()),
                ("practice_mode", self.request.practice_mode.as_str()),
                (
                    "difficulty",
                    self.request.difficulty.as_deref().unwrap_or(NOT_SPECIFIED),
                ),
                ("language_instruction", LANGUAGE_INSTRUCTION),
            ],
        )
    }

    fn fallback(&self) -> PracticeScript {
        let turn = |speaker: &str, content: &str, hint: &str| DialogueTurn {
            speaker: speaker.to_string(),
            content: content.to_string(),
            hint: hint.to_string(),
        };

        PracticeScript {
            title: "客户初次拜访练习".to_string(),
            scenario: "你将拜访一位对产品感兴趣但预算有限的客户，了解其需求并推进下一步沟通。"
                .to_string(),
            character: ScriptCharacter {
                name: "王经理".to_string(),
                role: "采购经理".to_string(),
                personality: "谨慎务实，关注性价比".to_string(),
            },
            dialogues: vec![
                turn("character", "你好，听说你们的产品不错，能简单介绍一下吗？", ""),
                turn(
                    "learner",
                    "王经理您好，在介绍之前想先了解一下您目前遇到的主要问题。",
                    "先提问，挖掘客户需求",
                ),
                turn("character", "我们现在的系统效率太低，但预算比较紧张。", ""),
                turn(
                    "learner",
                    "理解，我们有分阶段的方案，可以先解决最紧迫的问题。",
                    "回应顾虑，给出可选方案",
                ),
            ],
            evaluation_criteria: vec![
                "是否主动挖掘客户需求".to_string(),
                "是否妥善回应价格顾虑".to_string(),
                "是否明确下一步行动".to_string(),
            ],
        }
    }
}

pub async fn generate_practice_script(
    llm: &dyn ChatModel,
    request: &GeneratePracticeScriptRequest,
) -> Result<Generated<PracticeScript>, AppError> {
    let task = PracticeScriptTask::new(request)?;
    generate(llm, &task)
        .await
        .map_err(|e| AppError::from_llm("Practice script generation failed", e))
}
