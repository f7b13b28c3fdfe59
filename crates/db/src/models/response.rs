//! Activity response model and DTOs.
//!
//! A response carries two independent flags for one activity of one
//! assessment, each with justification, evidence text and an ordered list
//! of uploaded files. File references live in `response_files`.

use prisma_core::maturity::ResponseFlags;
use prisma_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `response_files.kind` for files backing the *instituído* flag.
pub const FILE_KIND_INSTITUTED: &str = "instituido";
/// `response_files.kind` for files backing the *institucionalizado* flag.
pub const FILE_KIND_INSTITUTIONALIZED: &str = "institucionalizado";

/// A row from the `responses` table.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseRow {
    pub id: DbId,
    pub assessment_id: DbId,
    pub activity_code: String,
    pub instituted: bool,
    pub institutionalized: bool,
    pub justification_instituted: String,
    pub justification_institutionalized: String,
    pub evidence_instituted: String,
    pub evidence_institutionalized: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `response_files` table.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseFileRow {
    pub response_id: DbId,
    pub kind: String,
    pub position: i64,
    pub name: String,
    pub url: String,
    pub filename: String,
}

/// Reference to an uploaded evidence file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub filename: String,
}

/// A response with its file references, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityResponse {
    pub id: DbId,
    #[serde(rename = "avaliacao_id")]
    pub assessment_id: DbId,
    #[serde(rename = "atividade_id")]
    pub activity_code: String,
    #[serde(rename = "instituido")]
    pub instituted: bool,
    #[serde(rename = "institucionalizado")]
    pub institutionalized: bool,
    #[serde(rename = "justificativa_instituido")]
    pub justification_instituted: String,
    #[serde(rename = "justificativa_institucionalizado")]
    pub justification_institutionalized: String,
    #[serde(rename = "evidencias_instituido")]
    pub evidence_instituted: String,
    #[serde(rename = "evidencias_institucionalizado")]
    pub evidence_institutionalized: String,
    #[serde(rename = "arquivos_instituido")]
    pub files_instituted: Vec<FileReference>,
    #[serde(rename = "arquivos_institucionalizado")]
    pub files_institutionalized: Vec<FileReference>,
    #[serde(rename = "data_criacao")]
    pub created_at: Timestamp,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: Timestamp,
}

impl ActivityResponse {
    /// Assemble from a row and its file rows (already in position order).
    pub fn from_parts(row: ResponseRow, files: Vec<ResponseFileRow>) -> Self {
        let (instituted, institutionalized): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| f.kind == FILE_KIND_INSTITUTED);
        let to_refs = |rows: Vec<ResponseFileRow>| {
            rows.into_iter()
                .map(|f| FileReference {
                    name: f.name,
                    url: f.url,
                    filename: f.filename,
                })
                .collect()
        };

        Self {
            id: row.id,
            assessment_id: row.assessment_id,
            activity_code: row.activity_code,
            instituted: row.instituted,
            institutionalized: row.institutionalized,
            justification_instituted: row.justification_instituted,
            justification_institutionalized: row.justification_institutionalized,
            evidence_instituted: row.evidence_instituted,
            evidence_institutionalized: row.evidence_institutionalized,
            files_instituted: to_refs(instituted),
            files_institutionalized: to_refs(institutionalized),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for submitting a response. Missing flags default to `false`,
/// missing texts to empty, missing file lists to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertActivityResponse {
    #[serde(rename = "atividade_id")]
    pub activity_code: String,
    #[serde(rename = "instituido", default)]
    pub instituted: bool,
    #[serde(rename = "institucionalizado", default)]
    pub institutionalized: bool,
    #[serde(rename = "justificativa_instituido", default)]
    pub justification_instituted: String,
    #[serde(rename = "justificativa_institucionalizado", default)]
    pub justification_institutionalized: String,
    #[serde(rename = "evidencias_instituido", default)]
    pub evidence_instituted: String,
    #[serde(rename = "evidencias_institucionalizado", default)]
    pub evidence_institutionalized: String,
    #[serde(rename = "arquivos_instituido", default)]
    pub files_instituted: Vec<FileReference>,
    #[serde(rename = "arquivos_institucionalizado", default)]
    pub files_institutionalized: Vec<FileReference>,
}

/// Flags of one response, tagged with its assessment, for evidence loading.
#[derive(Debug, Clone, FromRow)]
pub struct ResponseFlagsRow {
    pub assessment_id: DbId,
    pub activity_code: String,
    pub instituted: bool,
    pub institutionalized: bool,
}

impl From<ResponseFlagsRow> for ResponseFlags {
    fn from(row: ResponseFlagsRow) -> Self {
        Self {
            activity_code: row.activity_code,
            instituted: row.instituted,
            institutionalized: row.institutionalized,
        }
    }
}
