//! Handlers for the `/usuarios` resource. Every route requires
//! `gerenciar_usuarios`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use prisma_core::error::CoreError;
use prisma_core::types::DbId;
use prisma_core::validation::validate_institutional_email;
use prisma_db::models::double_option;
use prisma_db::models::user::{CreateUser, UpdateUser, UserDetail};
use prisma_db::repositories::{OrganizationRepo, ProfileRepo, UserRepo};
use prisma_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireManageUsers;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /usuarios`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Campo obrigatório: nome"))]
    pub name: String,
    #[serde(rename = "perfil_id")]
    pub profile_id: DbId,
    #[serde(rename = "orgao_id", default)]
    pub organization_id: Option<DbId>,
    #[serde(rename = "senha")]
    #[validate(length(min = 6, message = "A senha deve ter pelo menos 6 caracteres"))]
    pub password: String,
}

/// Request body for `PUT /usuarios/{id}`. Absent fields are left unchanged;
/// `orgao_id: null` unlinks the user from their organization.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Campo obrigatório: nome"))]
    pub name: Option<String>,
    #[serde(rename = "perfil_id")]
    pub profile_id: Option<DbId>,
    #[serde(rename = "orgao_id", default, deserialize_with = "double_option")]
    pub organization_id: Option<Option<DbId>>,
    #[serde(rename = "ativo")]
    pub is_active: Option<bool>,
    #[serde(rename = "senha")]
    #[validate(length(min = 6, message = "A senha deve ter pelo menos 6 caracteres"))]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/usuarios
pub async fn list(
    RequireManageUsers(_admin): RequireManageUsers,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserDetail>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/usuarios
pub async fn create(
    RequireManageUsers(admin): RequireManageUsers,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserDetail>>)> {
    input.validate()?;
    let email = input.email.trim().to_string();
    validate_institutional_email(&email)?;
    ensure_profile_exists(&state.pool, input.profile_id).await?;
    if let Some(organization_id) = input.organization_id {
        ensure_organization_exists(&state.pool, organization_id).await?;
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            name: input.name.trim().to_string(),
            profile_id: input.profile_id,
            organization_id: input.organization_id,
            password_hash,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, created_by = admin.id, "User created");

    let detail = find_detail(&state.pool, user.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/usuarios/{id}
pub async fn update(
    RequireManageUsers(admin): RequireManageUsers,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserDetail>>> {
    input.validate()?;
    if let Some(profile_id) = input.profile_id {
        ensure_profile_exists(&state.pool, profile_id).await?;
    }
    if let Some(Some(organization_id)) = input.organization_id {
        ensure_organization_exists(&state.pool, organization_id).await?;
    }

    let password_hash = input
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let changes = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()),
        profile_id: input.profile_id,
        organization_id: input.organization_id,
        is_active: input.is_active,
        password_hash,
    };
    UserRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Usuário",
            id,
        }))?;
    tracing::info!(user_id = id, updated_by = admin.id, "User updated");

    let detail = find_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/usuarios/{id}
///
/// Deactivates the account; users are never removed.
pub async fn deactivate(
    RequireManageUsers(admin): RequireManageUsers,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if admin.id == id {
        return Err(AppError::Core(CoreError::Validation(
            "Não é possível desativar o próprio usuário".into(),
        )));
    }
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Usuário",
            id,
        }));
    }
    tracing::info!(user_id = id, deactivated_by = admin.id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_detail(pool: &DbPool, id: DbId) -> AppResult<UserDetail> {
    UserRepo::find_detail_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Usuário",
            id,
        }))
}

async fn ensure_profile_exists(pool: &DbPool, profile_id: DbId) -> AppResult<()> {
    if ProfileRepo::find_by_id(pool, profile_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Perfil inexistente: {profile_id}"
        ))));
    }
    Ok(())
}

async fn ensure_organization_exists(pool: &DbPool, organization_id: DbId) -> AppResult<()> {
    if !OrganizationRepo::exists(pool, organization_id).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Órgão inexistente: {organization_id}"
        ))));
    }
    Ok(())
}
