//! Handlers for the `/auth` resource (login, current user, password change).

use axum::extract::State;
use axum::Json;
use prisma_core::error::CoreError;
use prisma_core::permissions::PermissionSet;
use prisma_core::types::DbId;
use prisma_core::validation::{validate_institutional_email, validate_password_strength};
use prisma_db::models::user::UserDetail;
use prisma_db::repositories::{ProfileRepo, UserRepo};
use prisma_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "E-mail ou senha inválidos";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Request body for `POST /auth/alterar-senha`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "senha_atual")]
    pub current_password: String,
    #[serde(rename = "senha_nova")]
    pub new_password: String,
    #[serde(rename = "confirmar_senha")]
    pub confirmation: String,
}

/// A user together with the permissions of their profile.
#[derive(Debug, Serialize)]
pub struct CurrentUser {
    #[serde(flatten)]
    pub user: UserDetail,
    #[serde(rename = "permissoes")]
    pub permissions: PermissionSet,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Verify e-mail and password. The e-mail must be institutional.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<DataResponse<CurrentUser>>> {
    let email = input.email.trim();
    validate_institutional_email(email)?;

    let user = UserRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden("Usuário inativo".into())));
    }

    let Some(hash) = user.password_hash.as_deref() else {
        return Err(AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())));
    };
    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())));
    }

    UserRepo::touch_last_access(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    let current = load_current_user(&state.pool, user.id).await?;
    Ok(Json(DataResponse { data: current }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<CurrentUser>>> {
    let current = load_current_user(&state.pool, user.id).await?;
    Ok(Json(DataResponse { data: current }))
}

/// POST /api/auth/alterar-senha
///
/// Replace the caller's password after checking the current one.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<DataResponse<MessageResponse>>> {
    if input.new_password != input.confirmation {
        return Err(AppError::Core(CoreError::Validation(
            "A confirmação não confere com a nova senha".into(),
        )));
    }
    validate_password_strength(&input.new_password)?;

    let stored = UserRepo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Usuário",
            id: user.id,
        }))?;

    let current_valid = match stored.password_hash.as_deref() {
        Some(hash) => verify_password(&input.current_password, hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        None => false,
    };
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Senha atual incorreta".into(),
        )));
    }

    let hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password_hash(&state.pool, user.id, &hash).await?;
    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(DataResponse {
        data: MessageResponse {
            message: "Senha alterada com sucesso",
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_current_user(pool: &DbPool, user_id: DbId) -> AppResult<CurrentUser> {
    let user = UserRepo::find_detail_by_id(pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Usuário",
            id: user_id,
        }))?;
    let permissions = match user.profile_id {
        Some(profile_id) => ProfileRepo::permissions_for(pool, profile_id).await?,
        None => PermissionSet::default(),
    };
    Ok(CurrentUser { user, permissions })
}
