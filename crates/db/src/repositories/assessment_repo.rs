//! Repository for the `assessments` table.

use prisma_core::maturity::{STATUS_FINALIZED, STATUS_IN_PROGRESS};
use prisma_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::assessment::{
    Assessment, CreateAssessment, OrganizationAssessmentStats, StatusCount,
};

/// Assessment columns joined with the organization's name and abbreviation.
const SELECT_WITH_ORGANIZATION: &str = "\
    SELECT a.id, a.title, a.organization_id, \
           o.name AS organization_name, o.abbreviation AS organization_abbreviation, \
           a.target_level, a.status, a.created_by, a.created_at, a.updated_at \
    FROM assessments a \
    LEFT JOIN organizations o ON o.id = a.organization_id";

/// Newest first; ties broken by the larger id.
const RECENCY_ORDER: &str = "ORDER BY a.created_at DESC, a.id DESC";

pub struct AssessmentRepo;

impl AssessmentRepo {
    /// Insert a new in-progress assessment, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateAssessment,
        created_by: &str,
    ) -> Result<Assessment, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO assessments (title, organization_id, target_level, status, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
        )
        .bind(input.title.trim())
        .bind(input.organization_id)
        .bind(input.target_level)
        .bind(STATUS_IN_PROGRESS)
        .bind(created_by)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<Assessment>, sqlx::Error> {
        let query = format!("{SELECT_WITH_ORGANIZATION} WHERE a.id = ?1");
        sqlx::query_as::<_, Assessment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Assessments created by a user, newest first.
    pub async fn list_by_creator(
        pool: &SqlitePool,
        created_by: &str,
    ) -> Result<Vec<Assessment>, sqlx::Error> {
        let query = format!("{SELECT_WITH_ORGANIZATION} WHERE a.created_by = ?1 {RECENCY_ORDER}");
        sqlx::query_as::<_, Assessment>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent assessments created by a user.
    pub async fn recent_by_creator(
        pool: &SqlitePool,
        created_by: &str,
        limit: i64,
    ) -> Result<Vec<Assessment>, sqlx::Error> {
        let query =
            format!("{SELECT_WITH_ORGANIZATION} WHERE a.created_by = ?1 {RECENCY_ORDER} LIMIT ?2");
        sqlx::query_as::<_, Assessment>(&query)
            .bind(created_by)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Every assessment in the system, newest first.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Assessment>, sqlx::Error> {
        let query = format!("{SELECT_WITH_ORGANIZATION} {RECENCY_ORDER}");
        sqlx::query_as::<_, Assessment>(&query).fetch_all(pool).await
    }

    /// Every assessment of an organization, newest first.
    pub async fn list_by_organization(
        pool: &SqlitePool,
        organization_id: DbId,
    ) -> Result<Vec<Assessment>, sqlx::Error> {
        let query =
            format!("{SELECT_WITH_ORGANIZATION} WHERE a.organization_id = ?1 {RECENCY_ORDER}");
        sqlx::query_as::<_, Assessment>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Move an in-progress assessment to finalized.
    ///
    /// Returns `false` when the assessment does not exist or is already
    /// finalized; the transition never runs backwards.
    pub async fn finalize(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assessments
             SET status = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND status = ?3",
        )
        .bind(id)
        .bind(STATUS_FINALIZED)
        .bind(STATUS_IN_PROGRESS)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assessment counts per status across the whole system.
    pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM assessments GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Assessment counts per status for one creator.
    pub async fn count_by_status_for_creator(
        pool: &SqlitePool,
        created_by: &str,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM assessments
             WHERE created_by = ?1
             GROUP BY status ORDER BY status",
        )
        .bind(created_by)
        .fetch_all(pool)
        .await
    }

    /// Per-organization assessment counts, including organizations with no
    /// assessments, ordered by organization name.
    pub async fn organization_stats(
        pool: &SqlitePool,
    ) -> Result<Vec<OrganizationAssessmentStats>, sqlx::Error> {
        sqlx::query_as::<_, OrganizationAssessmentStats>(
            "SELECT o.id AS organization_id, o.name, o.abbreviation,
                    COUNT(a.id) AS total,
                    COALESCE(SUM(CASE WHEN a.status = ?1 THEN 1 ELSE 0 END), 0) AS finalized,
                    COALESCE(SUM(CASE WHEN a.status = ?2 THEN 1 ELSE 0 END), 0) AS in_progress,
                    MAX(a.updated_at) AS last_activity
             FROM organizations o
             LEFT JOIN assessments a ON a.organization_id = o.id
             GROUP BY o.id, o.name, o.abbreviation
             ORDER BY o.name ASC",
        )
        .bind(STATUS_FINALIZED)
        .bind(STATUS_IN_PROGRESS)
        .fetch_all(pool)
        .await
    }
}
