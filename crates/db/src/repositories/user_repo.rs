//! Repository for the `users` table.

use prisma_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::user::{CreateUser, UpdateUser, User, UserDetail};

const COLUMNS: &str = "id, email, name, profile_id, organization_id, is_active, password_hash, \
     last_access_at, created_at, updated_at";

/// User columns joined with profile and organization names.
const SELECT_DETAIL: &str = "\
    SELECT u.id, u.email, u.name, u.is_active, u.last_access_at, u.created_at, \
           u.profile_id, p.name AS profile_name, \
           u.organization_id, o.name AS organization_name, \
           o.abbreviation AS organization_abbreviation \
    FROM users u \
    LEFT JOIN profiles p ON p.id = u.profile_id \
    LEFT JOIN organizations o ON o.id = u.organization_id";

/// Users are deactivated, never deleted.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new active user. A duplicate e-mail is a unique violation.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, profile_id, organization_id, password_hash)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.email.trim())
            .bind(input.name.trim())
            .bind(input.profile_id)
            .bind(input.organization_id)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact, case-sensitive e-mail lookup.
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<UserDetail>, sqlx::Error> {
        let query = format!("{SELECT_DETAIL} WHERE u.id = ?1");
        sqlx::query_as::<_, UserDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All users with profile and organization names, ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<UserDetail>, sqlx::Error> {
        let query = format!("{SELECT_DETAIL} ORDER BY u.name ASC, u.id ASC");
        sqlx::query_as::<_, UserDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE(?2, name),
                profile_id = COALESCE(?3, profile_id),
                organization_id = CASE WHEN ?4 THEN ?5 ELSE organization_id END,
                is_active = COALESCE(?6, is_active),
                password_hash = COALESCE(?7, password_hash),
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.profile_id)
            .bind(input.organization_id.is_some())
            .bind(input.organization_id.flatten())
            .bind(input.is_active)
            .bind(&input.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Mark a user inactive. Returns `true` if a row was found.
    pub async fn deactivate(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = 0, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_password_hash(
        pool: &SqlitePool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Users that have never had a password set.
    pub async fn list_without_password(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE password_hash IS NULL ORDER BY id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    pub async fn touch_last_access(pool: &SqlitePool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET last_access_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
