//! Repository for the `responses` and `response_files` tables.

use std::collections::HashMap;

use prisma_core::maturity::STATUS_IN_PROGRESS;
use prisma_core::types::DbId;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::response::{
    ActivityResponse, FileReference, ResponseFileRow, ResponseFlagsRow, ResponseRow,
    UpsertActivityResponse, FILE_KIND_INSTITUTED, FILE_KIND_INSTITUTIONALIZED,
};

const COLUMNS: &str = "id, assessment_id, activity_code, instituted, institutionalized, \
     justification_instituted, justification_institutionalized, \
     evidence_instituted, evidence_institutionalized, created_at, updated_at";

const FILE_COLUMNS: &str = "f.response_id, f.kind, f.position, f.name, f.url, f.filename";

pub struct ResponseRepo;

impl ResponseRepo {
    /// Create or replace the response of one activity in an in-progress
    /// assessment.
    ///
    /// The row, its file references and the assessment's `updated_at` are
    /// written in one transaction. Returns `None` (and writes nothing) when
    /// the assessment does not exist or is finalized.
    pub async fn upsert(
        pool: &SqlitePool,
        assessment_id: DbId,
        input: &UpsertActivityResponse,
    ) -> Result<Option<ActivityResponse>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let touched = sqlx::query(
            "UPDATE assessments SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND status = ?2",
        )
        .bind(assessment_id)
        .bind(STATUS_IN_PROGRESS)
        .execute(&mut *tx)
        .await?;
        if touched.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO responses (
                assessment_id, activity_code, instituted, institutionalized,
                justification_instituted, justification_institutionalized,
                evidence_instituted, evidence_institutionalized)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (assessment_id, activity_code) DO UPDATE SET
                instituted = excluded.instituted,
                institutionalized = excluded.institutionalized,
                justification_instituted = excluded.justification_instituted,
                justification_institutionalized = excluded.justification_institutionalized,
                evidence_instituted = excluded.evidence_instituted,
                evidence_institutionalized = excluded.evidence_institutionalized,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ResponseRow>(&query)
            .bind(assessment_id)
            .bind(input.activity_code.trim())
            .bind(input.instituted)
            .bind(input.institutionalized)
            .bind(&input.justification_instituted)
            .bind(&input.justification_institutionalized)
            .bind(&input.evidence_instituted)
            .bind(&input.evidence_institutionalized)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM response_files WHERE response_id = ?1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_files(&mut tx, row.id, FILE_KIND_INSTITUTED, &input.files_instituted).await?;
        Self::insert_files(
            &mut tx,
            row.id,
            FILE_KIND_INSTITUTIONALIZED,
            &input.files_institutionalized,
        )
        .await?;

        let files = sqlx::query_as::<_, ResponseFileRow>(&format!(
            "SELECT {FILE_COLUMNS} FROM response_files f
             WHERE f.response_id = ?1
             ORDER BY f.kind, f.position"
        ))
        .bind(row.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(ActivityResponse::from_parts(row, files)))
    }

    async fn insert_files(
        tx: &mut Transaction<'_, Sqlite>,
        response_id: DbId,
        kind: &str,
        files: &[FileReference],
    ) -> Result<(), sqlx::Error> {
        for (position, file) in files.iter().enumerate() {
            sqlx::query(
                "INSERT INTO response_files (response_id, kind, position, name, url, filename)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(response_id)
            .bind(kind)
            .bind(position as i64)
            .bind(&file.name)
            .bind(&file.url)
            .bind(&file.filename)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// All responses of an assessment with their files, ordered by activity.
    pub async fn list_by_assessment(
        pool: &SqlitePool,
        assessment_id: DbId,
    ) -> Result<Vec<ActivityResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM responses WHERE assessment_id = ?1 ORDER BY activity_code, id"
        );
        let rows = sqlx::query_as::<_, ResponseRow>(&query)
            .bind(assessment_id)
            .fetch_all(pool)
            .await?;

        let file_rows = sqlx::query_as::<_, ResponseFileRow>(&format!(
            "SELECT {FILE_COLUMNS} FROM response_files f
             JOIN responses r ON r.id = f.response_id
             WHERE r.assessment_id = ?1
             ORDER BY f.response_id, f.kind, f.position"
        ))
        .bind(assessment_id)
        .fetch_all(pool)
        .await?;

        let mut files_by_response: HashMap<DbId, Vec<ResponseFileRow>> = HashMap::new();
        for file in file_rows {
            files_by_response.entry(file.response_id).or_default().push(file);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let files = files_by_response.remove(&row.id).unwrap_or_default();
                ActivityResponse::from_parts(row, files)
            })
            .collect())
    }

    /// Response flags of every assessment of an organization.
    pub async fn flags_for_organization(
        pool: &SqlitePool,
        organization_id: DbId,
    ) -> Result<Vec<ResponseFlagsRow>, sqlx::Error> {
        sqlx::query_as::<_, ResponseFlagsRow>(
            "SELECT r.assessment_id, r.activity_code, r.instituted, r.institutionalized
             FROM responses r
             JOIN assessments a ON a.id = r.assessment_id
             WHERE a.organization_id = ?1
             ORDER BY r.assessment_id, r.activity_code",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }
}
