//! Handlers for the `/perfis` resource.

use axum::extract::State;
use axum::Json;
use prisma_core::permissions::PermissionSet;
use prisma_db::models::profile::Profile;
use prisma_db::repositories::ProfileRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileWithPermissions {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(rename = "permissoes")]
    pub permissions: PermissionSet,
}

/// GET /api/perfis
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProfileWithPermissions>>>> {
    let profiles = ProfileRepo::list(&state.pool).await?;

    let mut data = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let permissions = ProfileRepo::permissions_for(&state.pool, profile.id).await?;
        data.push(ProfileWithPermissions {
            profile,
            permissions,
        });
    }
    Ok(Json(DataResponse { data }))
}
