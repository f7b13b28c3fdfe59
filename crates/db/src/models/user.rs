//! User entity model and DTOs.

use prisma_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "perfil_id")]
    pub profile_id: Option<DbId>,
    #[serde(rename = "orgao_id")]
    pub organization_id: Option<DbId>,
    #[serde(rename = "ativo")]
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(rename = "ultimo_acesso")]
    pub last_access_at: Option<Timestamp>,
    #[serde(rename = "data_criacao")]
    pub created_at: Timestamp,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: Timestamp,
}

/// A user joined with profile and organization names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserDetail {
    pub id: DbId,
    pub email: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "ativo")]
    pub is_active: bool,
    #[serde(rename = "ultimo_acesso")]
    pub last_access_at: Option<Timestamp>,
    #[serde(rename = "data_criacao")]
    pub created_at: Timestamp,
    #[serde(rename = "perfil_id")]
    pub profile_id: Option<DbId>,
    #[serde(rename = "perfil")]
    pub profile_name: Option<String>,
    #[serde(rename = "orgao_id")]
    pub organization_id: Option<DbId>,
    #[serde(rename = "orgao_nome")]
    pub organization_name: Option<String>,
    #[serde(rename = "orgao_sigla")]
    pub organization_abbreviation: Option<String>,
}

/// Insert DTO. The password is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub profile_id: DbId,
    pub organization_id: Option<DbId>,
    pub password_hash: String,
}

/// Partial update. `organization_id: Some(None)` clears the organization.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub profile_id: Option<DbId>,
    pub organization_id: Option<Option<DbId>>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}
