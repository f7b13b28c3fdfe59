//! Password provisioning for seeded accounts.
//!
//! Seed migrations cannot compute salted hashes, so seeded users start with
//! no password. At startup every such user receives the configured initial
//! password.

use prisma_db::repositories::UserRepo;
use prisma_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Set `initial_password` on every user without a password hash.
/// Returns the number of accounts updated.
pub async fn provision_initial_passwords(
    pool: &DbPool,
    initial_password: &str,
) -> AppResult<usize> {
    let pending = UserRepo::list_without_password(pool).await?;
    if pending.is_empty() {
        return Ok(0);
    }

    let hash = hash_password(initial_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    for user in &pending {
        UserRepo::set_password_hash(pool, user.id, &hash).await?;
        tracing::warn!(
            user_id = user.id,
            email = %user.email,
            "Initial password provisioned; change it after first login"
        );
    }
    Ok(pending.len())
}
