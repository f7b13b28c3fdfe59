//! Organization ranking for the administrative report.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::maturity::{ClassificationStatus, MaturityClassification};
use crate::types::{DbId, Timestamp};

/// Multiplier from maturity level to the 0-100 "maturity mean" score.
pub const MATURITY_MEAN_FACTOR: u8 = 20;

pub const ACTIVITY_ACTIVE: &str = "ativo";
pub const ACTIVITY_INACTIVE: &str = "inativo";

/// Assessment counts and last activity of one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationActivity {
    pub organization_id: DbId,
    pub name: String,
    pub abbreviation: String,
    pub total: usize,
    pub finalized: usize,
    pub in_progress: usize,
    pub last_activity: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    #[serde(rename = "orgao_id")]
    pub organization_id: DbId,
    #[serde(rename = "orgao_nome")]
    pub name: String,
    #[serde(rename = "orgao_sigla")]
    pub abbreviation: String,
    #[serde(rename = "nivel_maturidade")]
    pub level: u8,
    #[serde(rename = "maturidade_media")]
    pub maturity_mean: u8,
    /// `YYYY-MM-DD` of the most recent assessment change.
    #[serde(rename = "ultima_avaliacao")]
    pub last_assessment: Option<String>,
    pub status: &'static str,
    #[serde(rename = "status_certificacao")]
    pub certification_status: ClassificationStatus,
    #[serde(rename = "descricao_maturidade")]
    pub maturity_description: String,
    #[serde(rename = "data_certificacao")]
    pub certified_at: Option<Timestamp>,
    #[serde(rename = "total_avaliacoes")]
    pub total_assessments: usize,
    #[serde(rename = "avaliacoes_finalizadas")]
    pub finalized_assessments: usize,
    #[serde(rename = "avaliacoes_andamento")]
    pub in_progress_assessments: usize,
    #[serde(rename = "criterios_atendidos")]
    pub criteria_met: bool,
}

impl RankingEntry {
    pub fn new(activity: OrganizationActivity, classification: MaturityClassification) -> Self {
        Self {
            organization_id: activity.organization_id,
            name: activity.name,
            abbreviation: activity.abbreviation,
            level: classification.level,
            maturity_mean: maturity_mean(classification.level),
            last_assessment: activity
                .last_activity
                .map(|ts| ts.format("%Y-%m-%d").to_string()),
            status: if activity.total > 0 {
                ACTIVITY_ACTIVE
            } else {
                ACTIVITY_INACTIVE
            },
            certification_status: classification.status,
            maturity_description: classification.description,
            certified_at: classification.certified_at,
            total_assessments: activity.total,
            finalized_assessments: activity.finalized,
            in_progress_assessments: activity.in_progress,
            criteria_met: classification.criteria_met,
        }
    }
}

pub fn maturity_mean(level: u8) -> u8 {
    level.saturating_mul(MATURITY_MEAN_FACTOR)
}

/// Level descending, then name ascending.
pub fn sort_ranking(entries: &mut [RankingEntry]) {
    entries.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.name.cmp(&b.name)));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralStats {
    #[serde(rename = "total_avaliacoes")]
    pub total_assessments: usize,
    #[serde(rename = "avaliacoes_finalizadas")]
    pub finalized_assessments: usize,
    #[serde(rename = "orgaos_participantes")]
    pub participating_organizations: usize,
    /// Mean of `maturidade_media` over ranked organizations, one decimal.
    #[serde(rename = "media_maturidade")]
    pub mean_maturity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedStats {
    #[serde(rename = "total_orgaos")]
    pub total_organizations: usize,
    #[serde(rename = "orgaos_certificados")]
    pub certified_organizations: usize,
    #[serde(rename = "orgaos_por_nivel")]
    pub organizations_by_level: BTreeMap<u8, usize>,
    #[serde(rename = "avaliacoes_por_status")]
    pub assessments_by_status: BTreeMap<String, usize>,
}

/// Summary over the ranked organizations. `status_counts` are the global
/// assessment counts per status string.
pub fn summarize(
    entries: &[RankingEntry],
    status_counts: &BTreeMap<String, usize>,
) -> (GeneralStats, DetailedStats) {
    let mut by_level: BTreeMap<u8, usize> = BTreeMap::new();
    for entry in entries {
        *by_level.entry(entry.level).or_default() += 1;
    }

    let mean_maturity = if entries.is_empty() {
        0.0
    } else {
        let sum: f64 = entries.iter().map(|e| f64::from(e.maturity_mean)).sum();
        (sum / entries.len() as f64 * 10.0).round() / 10.0
    };

    let general = GeneralStats {
        total_assessments: entries.iter().map(|e| e.total_assessments).sum(),
        finalized_assessments: entries.iter().map(|e| e.finalized_assessments).sum(),
        participating_organizations: entries.iter().filter(|e| e.total_assessments > 0).count(),
        mean_maturity,
    };
    let detailed = DetailedStats {
        total_organizations: entries.len(),
        certified_organizations: entries
            .iter()
            .filter(|e| e.certification_status == ClassificationStatus::Certified)
            .count(),
        organizations_by_level: by_level,
        assessments_by_status: status_counts.clone(),
    };
    (general, detailed)
}
