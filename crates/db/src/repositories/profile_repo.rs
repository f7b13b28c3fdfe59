//! Repository for the `profiles` and `profile_permissions` tables.

use prisma_core::permissions::PermissionSet;
use prisma_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::profile::{Profile, ProfilePermission};

const COLUMNS: &str = "id, name, description, created_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// All profiles, ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY name ASC");
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = ?1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE name = ?1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Permission grants of a profile. Unknown profiles yield an empty set.
    pub async fn permissions_for(
        pool: &SqlitePool,
        profile_id: DbId,
    ) -> Result<PermissionSet, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProfilePermission>(
            "SELECT profile_id, permission, granted
             FROM profile_permissions
             WHERE profile_id = ?1
             ORDER BY permission ASC",
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await?;

        Ok(PermissionSet::from_grants(
            rows.into_iter().map(|row| (row.permission, row.granted)),
        ))
    }
}
