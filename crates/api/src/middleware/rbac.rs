//! Permission-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects with 403 Forbidden when the
//! caller's profile does not grant the named permission.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use prisma_core::error::CoreError;
use prisma_core::permissions::Permission;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Reject with 403 unless `user` holds `permission`.
pub fn ensure_permission(user: &AuthUser, permission: Permission) -> Result<(), AppError> {
    if user.can(permission) {
        return Ok(());
    }
    tracing::debug!(user_id = user.id, %permission, "Permission denied");
    Err(AppError::Core(CoreError::Forbidden(format!(
        "Permissão necessária: {permission}"
    ))))
}

async fn extract_with(
    parts: &mut Parts,
    state: &AppState,
    permission: Permission,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    ensure_permission(&user, permission)?;
    Ok(user)
}

/// Requires `gerenciar_usuarios`.
///
/// ```ignore
/// async fn list(RequireManageUsers(admin): RequireManageUsers) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManageUsers(pub AuthUser);

impl FromRequestParts<AppState> for RequireManageUsers {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_with(parts, state, Permission::ManageUsers)
            .await
            .map(RequireManageUsers)
    }
}

/// Requires `gerenciar_orgaos`.
pub struct RequireManageOrganizations(pub AuthUser);

impl FromRequestParts<AppState> for RequireManageOrganizations {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_with(parts, state, Permission::ManageOrganizations)
            .await
            .map(RequireManageOrganizations)
    }
}

/// Requires `gerar_relatorios`.
pub struct RequireGenerateReports(pub AuthUser);

impl FromRequestParts<AppState> for RequireGenerateReports {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_with(parts, state, Permission::GenerateReports)
            .await
            .map(RequireGenerateReports)
    }
}

/// Requires `visualizar_relatorios_gerais`.
pub struct RequireViewGlobalReports(pub AuthUser);

impl FromRequestParts<AppState> for RequireViewGlobalReports {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_with(parts, state, Permission::ViewGlobalReports)
            .await
            .map(RequireViewGlobalReports)
    }
}
