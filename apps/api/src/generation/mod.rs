// Content generation endpoints.
// All model calls go through llm_client via the shared pipeline in generator.rs.

pub mod courseware;
pub mod diagnosis;
pub mod document;
pub mod document_loader;
pub mod generator;
pub mod handlers;
pub mod practice_script;
pub mod prompts;
pub mod training_plan;
