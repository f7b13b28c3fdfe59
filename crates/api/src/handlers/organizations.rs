//! Handlers for the `/orgaos` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use prisma_core::error::CoreError;
use prisma_core::types::DbId;
use prisma_core::validation::require_non_empty;
use prisma_db::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use prisma_db::repositories::OrganizationRepo;
use prisma_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireManageOrganizations;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/orgaos
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Organization>>>> {
    let organizations = OrganizationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: organizations,
    }))
}

/// POST /api/orgaos
pub async fn create(
    RequireManageOrganizations(user): RequireManageOrganizations,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateOrganization>,
) -> AppResult<(StatusCode, Json<DataResponse<Organization>>)> {
    require_non_empty("nome", &input.name)?;
    if let Some(parent_id) = input.parent_id {
        ensure_parent_exists(&state.pool, parent_id).await?;
    }

    let organization = OrganizationRepo::create(&state.pool, &input).await?;
    tracing::info!(
        organization_id = organization.id,
        created_by = user.id,
        "Organization created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: organization }),
    ))
}

/// PUT /api/orgaos/{id}
pub async fn update(
    RequireManageOrganizations(user): RequireManageOrganizations,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateOrganization>,
) -> AppResult<Json<DataResponse<Organization>>> {
    if let Some(name) = &input.name {
        require_non_empty("nome", name)?;
    }
    if let Some(Some(parent_id)) = input.parent_id {
        if parent_id == id {
            return Err(AppError::Core(CoreError::Validation(
                "Um órgão não pode ser superior a si mesmo".into(),
            )));
        }
        ensure_parent_exists(&state.pool, parent_id).await?;
    }

    let organization = OrganizationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Órgão",
            id,
        }))?;
    tracing::info!(organization_id = id, updated_by = user.id, "Organization updated");
    Ok(Json(DataResponse { data: organization }))
}

async fn ensure_parent_exists(pool: &DbPool, parent_id: DbId) -> AppResult<()> {
    if !OrganizationRepo::exists(pool, parent_id).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Órgão superior inexistente: {parent_id}"
        ))));
    }
    Ok(())
}
