//! Shared generation pipeline used by every content endpoint.
//!
//! Flow: build prompt → one model call → extract JSON → deserialize into the
//! task's output type. Malformed output never fails the request: the task's
//! default payload is substituted and the result is flagged `degraded`.
//! Transport, rate-limit and quota failures are returned to the caller.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::llm_client::extract::extract_json;
use crate::llm_client::{ChatModel, LlmError};

/// One kind of content the model is asked to produce.
pub trait GenerationTask: Send + Sync {
    type Output: DeserializeOwned + Serialize + Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn system_prompt(&self) -> String;

    /// Fills the task's fixed template with caller data.
    fn build_prompt(&self) -> String;

    /// Hand-authored payload returned when the model output cannot be parsed.
    fn fallback(&self) -> Self::Output;
}

/// A generation result plus whether it came from the fallback.
#[derive(Debug, Clone)]
pub struct Generated<T> {
    pub value: T,
    pub degraded: bool,
}

/// Runs a task end to end against the model.
pub async fn generate<T: GenerationTask>(
    llm: &dyn ChatModel,
    task: &T,
) -> Result<Generated<T::Output>, LlmError> {
    let system = task.system_prompt();
    let prompt = task.build_prompt();

    let text = llm.complete(&system, &prompt).await?;

    match parse_output::<T::Output>(&text) {
        Ok(value) => {
            info!("{} generation parsed ({} chars)", task.name(), text.len());
            Ok(Generated {
                value,
                degraded: false,
            })
        }
        Err(reason) => {
            warn!(
                "{} generation returned unparsable output, using default: {} (preview: {:?})",
                task.name(),
                reason,
                text.chars().take(120).collect::<String>()
            );
            Ok(Generated {
                value: task.fallback(),
                degraded: true,
            })
        }
    }
}

fn parse_output<O: DeserializeOwned>(text: &str) -> Result<O, String> {
    let value = extract_json(text).map_err(|e| e.to_string())?;
    serde_json::from_value(value).map_err(|e| e.to_string())
}
