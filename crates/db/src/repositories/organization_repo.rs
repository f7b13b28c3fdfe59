//! Repository for the `organizations` table.

use prisma_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::organization::{CreateOrganization, Organization, UpdateOrganization};

/// Organization columns joined with the parent's name and abbreviation.
const SELECT_WITH_PARENT: &str = "\
    SELECT o.id, o.name, o.abbreviation, o.parent_id, \
           p.name AS parent_name, p.abbreviation AS parent_abbreviation, \
           o.created_at, o.updated_at \
    FROM organizations o \
    LEFT JOIN organizations p ON p.id = o.parent_id";

/// Provides create, read and update for organizations. Rows are never deleted.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO organizations (name, abbreviation, parent_id)
             VALUES (?1, ?2, ?3)
             RETURNING id",
        )
        .bind(input.name.trim())
        .bind(input.abbreviation.trim())
        .bind(input.parent_id)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("{SELECT_WITH_PARENT} WHERE o.id = ?1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All organizations, ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Organization>, sqlx::Error> {
        let query = format!("{SELECT_WITH_PARENT} ORDER BY o.name ASC, o.id ASC");
        sqlx::query_as::<_, Organization>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateOrganization,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE organizations SET
                name = COALESCE(?2, name),
                abbreviation = COALESCE(?3, abbreviation),
                parent_id = CASE WHEN ?4 THEN ?5 ELSE parent_id END,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1",
        )
        .bind(id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.abbreviation.as_deref().map(str::trim))
        .bind(input.parent_id.is_some())
        .bind(input.parent_id.flatten())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn exists(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM organizations WHERE id = ?1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
