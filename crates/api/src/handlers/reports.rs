//! Report handlers: the caller's organization report, the consolidated
//! ranking, and their file exports.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use prisma_core::error::CoreError;
use prisma_core::validation::sanitize_filename;
use prisma_db::models::organization::Organization;
use prisma_db::repositories::OrganizationRepo;
use serde::Deserialize;

use crate::engine::report::{AdminReport, IndividualReport};
use crate::error::{AppError, AppResult};
use crate::export::{
    admin_document, export_filename, individual_document, ExportDocument, ExportFormat,
};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireGenerateReports, RequireViewGlobalReports};
use crate::response::DataResponse;
use crate::state::AppState;

/// Filename prefix of the consolidated export.
const ADMIN_EXPORT_PREFIX: &str = "relatorio_cge_mt";

/// Request body for the export endpoints.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(rename = "formato")]
    pub format: String,
}

// ---------------------------------------------------------------------------
// Individual report
// ---------------------------------------------------------------------------

/// GET /api/relatorio-individual
pub async fn individual(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<IndividualReport>>> {
    let organization = caller_organization(&state, &user).await?;
    let report = state.maturity.individual_report(&organization).await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/relatorio-individual/exportar
pub async fn export_individual(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<ExportRequest>,
) -> AppResult<Response> {
    let format = ExportFormat::from_str_value(&input.format)?;
    let organization = caller_organization(&state, &user).await?;
    let report = state.maturity.individual_report(&organization).await?;

    let generated_at = Utc::now();
    let prefix = format!("relatorio_{}", sanitize_filename(&organization.abbreviation));
    tracing::info!(
        organization_id = organization.id,
        format = format.as_str(),
        "Exporting individual report"
    );
    render_attachment(
        format,
        &individual_document(&report, generated_at),
        &export_filename(&prefix, generated_at, format.as_str()),
    )
}

// ---------------------------------------------------------------------------
// Consolidated report
// ---------------------------------------------------------------------------

/// GET /api/admin/relatorios
pub async fn admin(
    RequireGenerateReports(_user): RequireGenerateReports,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminReport>>> {
    let report = state.maturity.admin_report().await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/admin/relatorios/exportar
pub async fn export_admin(
    RequireViewGlobalReports(user): RequireViewGlobalReports,
    State(state): State<AppState>,
    AppJson(input): AppJson<ExportRequest>,
) -> AppResult<Response> {
    let format = ExportFormat::from_str_value(&input.format)?;
    let report = state.maturity.admin_report().await?;

    let generated_at = Utc::now();
    tracing::info!(user_id = user.id, format = format.as_str(), "Exporting consolidated report");
    render_attachment(
        format,
        &admin_document(&report, generated_at),
        &export_filename(ADMIN_EXPORT_PREFIX, generated_at, format.as_str()),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The organization the caller belongs to. 400 when the caller has none,
/// 404 when it no longer exists.
async fn caller_organization(state: &AppState, user: &AuthUser) -> AppResult<Organization> {
    let organization_id = user.organization_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Usuário não está vinculado a um órgão".into(),
        ))
    })?;
    OrganizationRepo::find_by_id(&state.pool, organization_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Órgão",
            id: organization_id,
        }))
}

fn render_attachment(
    format: ExportFormat,
    document: &ExportDocument,
    filename: &str,
) -> AppResult<Response> {
    let renderer = format.renderer();
    let bytes = renderer
        .render(document)
        .map_err(|e| AppError::InternalError(format!("Export error: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, renderer.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
