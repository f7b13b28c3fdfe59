//! Handlers for the `/avaliacoes` resource and its responses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use prisma_core::error::CoreError;
use prisma_core::maturity::validate_target_level;
use prisma_core::types::DbId;
use prisma_core::validation::require_non_empty;
use prisma_db::models::assessment::{Assessment, CreateAssessment};
use prisma_db::models::response::{ActivityResponse, UpsertActivityResponse};
use prisma_db::repositories::{AssessmentRepo, OrganizationRepo, ResponseRepo};
use prisma_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/avaliacoes
///
/// Assessments created by the caller, newest first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Assessment>>>> {
    let assessments = AssessmentRepo::list_by_creator(&state.pool, &user.email).await?;
    Ok(Json(DataResponse { data: assessments }))
}

/// POST /api/avaliacoes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<CreateAssessment>,
) -> AppResult<(StatusCode, Json<DataResponse<Assessment>>)> {
    require_non_empty("titulo", &input.title)?;
    validate_target_level(input.target_level)?;
    if !OrganizationRepo::exists(&state.pool, input.organization_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Órgão",
            id: input.organization_id,
        }));
    }

    let assessment = AssessmentRepo::create(&state.pool, &input, &user.email).await?;
    tracing::info!(
        assessment_id = assessment.id,
        organization_id = assessment.organization_id,
        target_level = assessment.target_level,
        created_by = %user.email,
        "Assessment created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: assessment })))
}

/// GET /api/avaliacoes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Assessment>>> {
    let assessment = find_assessment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: assessment }))
}

/// GET /api/avaliacoes/{id}/respostas
pub async fn list_responses(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ActivityResponse>>>> {
    find_assessment(&state.pool, id).await?;
    let responses = ResponseRepo::list_by_assessment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: responses }))
}

/// POST /api/avaliacoes/{id}/respostas
///
/// Insert or replace the response for one activity. Rejected with 409 once
/// the assessment is finalized.
pub async fn upsert_response(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpsertActivityResponse>,
) -> AppResult<Json<DataResponse<ActivityResponse>>> {
    require_non_empty("atividade_id", &input.activity_code)?;

    let assessment = find_assessment(&state.pool, id).await?;
    if assessment.status().is_finalized() {
        return Err(finalized_conflict(id));
    }

    let input = UpsertActivityResponse {
        activity_code: input.activity_code.trim().to_string(),
        ..input
    };
    // The repository re-checks the status inside its transaction.
    let response = ResponseRepo::upsert(&state.pool, id, &input)
        .await?
        .ok_or_else(|| finalized_conflict(id))?;

    tracing::debug!(
        assessment_id = id,
        activity = %response.activity_code,
        instituted = response.instituted,
        institutionalized = response.institutionalized,
        "Response saved"
    );
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/avaliacoes/{id}/finalizar
///
/// One-way transition to `finalizada`. Completeness is not checked.
pub async fn finalize(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Assessment>>> {
    find_assessment(&state.pool, id).await?;
    if !AssessmentRepo::finalize(&state.pool, id).await? {
        return Err(finalized_conflict(id));
    }
    tracing::info!(assessment_id = id, "Assessment finalized");

    let assessment = find_assessment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: assessment }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_assessment(pool: &DbPool, id: DbId) -> AppResult<Assessment> {
    AssessmentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Avaliação",
            id,
        }))
}

fn finalized_conflict(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!("Avaliação {id} já foi finalizada")))
}
