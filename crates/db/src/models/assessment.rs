//! Assessment entity model and DTOs.

use prisma_core::maturity::AssessmentStatus;
use prisma_core::ranking::OrganizationActivity;
use prisma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An assessment row joined with its organization's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assessment {
    pub id: DbId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "orgao_id")]
    pub organization_id: DbId,
    #[serde(rename = "orgao_nome")]
    pub organization_name: Option<String>,
    #[serde(rename = "orgao_sigla")]
    pub organization_abbreviation: Option<String>,
    #[serde(rename = "nivel_desejado")]
    pub target_level: i64,
    pub status: String,
    #[serde(rename = "usuario_email")]
    pub created_by: String,
    #[serde(rename = "data_criacao")]
    pub created_at: Timestamp,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: Timestamp,
}

impl Assessment {
    /// Parsed status. Unknown values are treated as in progress.
    pub fn status(&self) -> AssessmentStatus {
        AssessmentStatus::from_str_value(&self.status).unwrap_or(AssessmentStatus::InProgress)
    }
}

/// DTO for creating an assessment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssessment {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "orgao_id")]
    pub organization_id: DbId,
    #[serde(rename = "nivel_desejado")]
    pub target_level: i64,
}

/// Assessment counts and last change of one organization.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationAssessmentStats {
    pub organization_id: DbId,
    pub name: String,
    pub abbreviation: String,
    pub total: i64,
    pub finalized: i64,
    pub in_progress: i64,
    pub last_activity: Option<Timestamp>,
}

impl From<OrganizationAssessmentStats> for OrganizationActivity {
    fn from(row: OrganizationAssessmentStats) -> Self {
        Self {
            organization_id: row.organization_id,
            name: row.name,
            abbreviation: row.abbreviation,
            total: usize::try_from(row.total).unwrap_or(0),
            finalized: usize::try_from(row.finalized).unwrap_or(0),
            in_progress: usize::try_from(row.in_progress).unwrap_or(0),
            last_activity: row.last_activity,
        }
    }
}

/// Number of assessments with a given status.
#[derive(Debug, Clone, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}
