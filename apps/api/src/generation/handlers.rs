//! Axum route handlers for the generation API.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::courseware::{generate_courseware, GenerateCoursewareRequest, OutlineSection};
use crate::generation::diagnosis::{diagnose_student, DiagnoseStudentRequest, Diagnosis};
use crate::generation::document::{parse_document, queue_parse_document, ParseDocumentRequest};
use crate::generation::practice_script::{
    generate_practice_script, GeneratePracticeScriptRequest, PracticeScript,
};
use crate::generation::training_plan::{
    generate_training_plan, GenerateTrainingPlanRequest, TrainingPlan,
};
use crate::models::courseware::CoursewareRow;
use crate::models::document::DocumentRow;
use crate::models::RecordStatus;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DiagnoseStudentResponse {
    pub success: bool,
    pub diagnosis: Diagnosis,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateCoursewareResponse {
    pub success: bool,
    pub outline: Vec<OutlineSection>,
    pub scripts: BTreeMap<String, String>,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseDocumentResponse {
    pub success: bool,
    pub summary: String,
    pub key_points: Vec<String>,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseQueuedResponse {
    pub success: bool,
    pub document_id: Uuid,
    pub status: RecordStatus,
}

#[derive(Debug, Serialize)]
pub struct PracticeScriptResponse {
    pub success: bool,
    pub script: PracticeScript,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
pub struct TrainingPlanResponse {
    pub success: bool,
    pub plan: TrainingPlan,
    pub degraded: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/diagnose-student
pub async fn handle_diagnose_student(
    State(state): State<AppState>,
    payload: Result<Json<DiagnoseStudentRequest>, JsonRejection>,
) -> Result<Json<DiagnoseStudentResponse>, AppError> {
    let Json(request) = payload?;
    let generated = diagnose_student(state.llm.as_ref(), &request).await?;

    Ok(Json(DiagnoseStudentResponse {
        success: true,
        diagnosis: generated.value,
        degraded: generated.degraded,
    }))
}

/// POST /api/v1/generate-courseware
///
/// Writes the outline and scripts onto the courseware record before responding.
pub async fn handle_generate_courseware(
    State(state): State<AppState>,
    payload: Result<Json<GenerateCoursewareRequest>, JsonRejection>,
) -> Result<Json<GenerateCoursewareResponse>, AppError> {
    let Json(request) = payload?;
    let generated =
        generate_courseware(state.llm.as_ref(), state.store.as_ref(), &request).await?;

    Ok(Json(GenerateCoursewareResponse {
        success: true,
        outline: generated.value.outline,
        scripts: generated.value.scripts,
        degraded: generated.degraded,
    }))
}

/// POST /api/v1/parse-document
pub async fn handle_parse_document(
    State(state): State<AppState>,
    payload: Result<Json<ParseDocumentRequest>, JsonRejection>,
) -> Result<Json<ParseDocumentResponse>, AppError> {
    let Json(request) = payload?;
    let generated = parse_document(
        state.llm.as_ref(),
        state.store.as_ref(),
        state.loader.as_ref(),
        &request,
    )
    .await?;

    Ok(Json(ParseDocumentResponse {
        success: true,
        summary: generated.value.summary,
        key_points: generated.value.key_points,
        degraded: generated.degraded,
    }))
}

/// POST /api/v1/documents/:id/parse
///
/// Same as parse-document, but returns 202 once the record is `processing` and
/// parses in the background. Poll GET /api/v1/documents/:id for the outcome.
pub async fn handle_queue_document_parse(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    payload: Result<Json<ParseDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ParseQueuedResponse>), AppError> {
    let Json(mut request) = payload?;
    request.document_id = Some(document_id);

    queue_parse_document(state, request).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ParseQueuedResponse {
            success: true,
            document_id,
            status: RecordStatus::Processing,
        }),
    ))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<DocumentRow>, AppError> {
    Ok(Json(state.store.get_document(document_id).await?))
}

/// GET /api/v1/coursewares/:id
pub async fn handle_get_courseware(
    State(state): State<AppState>,
    Path(courseware_id): Path<Uuid>,
) -> Result<Json<CoursewareRow>, AppError> {
    Ok(Json(state.store.get_courseware(courseware_id).await?))
}

/// POST /api/v1/generate-practice-script
pub async fn handle_generate_practice_script(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePracticeScriptRequest>, JsonRejection>,
) -> Result<Json<PracticeScriptResponse>, AppError> {
    let Json(request) = payload?;
    let generated = generate_practice_script(state.llm.as_ref(), &request).await?;

    Ok(Json(PracticeScriptResponse {
        success: true,
        script: generated.value,
        degraded: generated.degraded,
    }))
}

/// POST /api/v1/generate-training-plan
pub async fn handle_generate_training_plan(
    State(state): State<AppState>,
    payload: Result<Json<GenerateTrainingPlanRequest>, JsonRejection>,
) -> Result<Json<TrainingPlanResponse>, AppError> {
    let Json(request) = payload?;
    let generated = generate_training_plan(state.llm.as_ref(), &request).await?;

    Ok(Json(TrainingPlanResponse {
        success: true,
        plan: generated.value,
        degraded: generated.degraded,
    }))
}
