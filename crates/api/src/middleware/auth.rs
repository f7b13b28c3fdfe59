//! Header-based identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use prisma_core::error::CoreError;
use prisma_core::permissions::{Permission, PermissionSet};
use prisma_core::types::DbId;
use prisma_db::repositories::{ProfileRepo, UserRepo};

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's e-mail.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The caller, resolved from the `X-User-Email` header.
///
/// Rejects with 401 when the header is missing or blank, 404 when no user
/// has that e-mail and 403 when the user is deactivated.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.id, email = %user.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub profile_id: Option<DbId>,
    pub organization_id: Option<DbId>,
    pub permissions: PermissionSet,
}

impl AuthUser {
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.allows(permission)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Cabeçalho X-User-Email ausente".into(),
                ))
            })?;

        let user = UserRepo::find_by_email(&state.pool, email)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFoundByKey {
                    entity: "Usuário",
                    key: email.to_string(),
                })
            })?;

        if !user.is_active {
            return Err(AppError::Core(CoreError::Forbidden("Usuário inativo".into())));
        }

        let permissions = match user.profile_id {
            Some(profile_id) => ProfileRepo::permissions_for(&state.pool, profile_id).await?,
            None => PermissionSet::default(),
        };

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            name: user.name,
            profile_id: user.profile_id,
            organization_id: user.organization_id,
            permissions,
        })
    }
}
