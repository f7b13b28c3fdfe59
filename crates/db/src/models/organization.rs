//! Organization entity model and DTOs.

use prisma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::double_option;

/// An organization row joined with its parent's name and abbreviation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "sigla")]
    pub abbreviation: String,
    #[serde(rename = "orgao_superior_id")]
    pub parent_id: Option<DbId>,
    #[serde(rename = "orgao_superior_nome")]
    pub parent_name: Option<String>,
    #[serde(rename = "orgao_superior_sigla")]
    pub parent_abbreviation: Option<String>,
    #[serde(rename = "data_criacao")]
    pub created_at: Timestamp,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: Timestamp,
}

/// DTO for creating an organization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganization {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "sigla", default)]
    pub abbreviation: String,
    #[serde(rename = "orgao_superior_id")]
    pub parent_id: Option<DbId>,
}

/// DTO for updating an organization. All fields are optional;
/// `orgao_superior_id: null` clears the parent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrganization {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "sigla")]
    pub abbreviation: Option<String>,
    #[serde(
        rename = "orgao_superior_id",
        default,
        deserialize_with = "double_option"
    )]
    pub parent_id: Option<Option<DbId>>,
}
