//! Access profile model.

use prisma_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "data_criacao")]
    pub created_at: Timestamp,
}

/// A row from the `profile_permissions` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfilePermission {
    pub profile_id: DbId,
    pub permission: String,
    pub granted: bool,
}
