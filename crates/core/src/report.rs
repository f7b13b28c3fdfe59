//! Report aggregation over an organization's evidence.
//!
//! Every view groups responses by KPA code. Percentages are floored.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{kpa_code, ActivityCatalog};
use crate::maturity::{percentage, AssessmentEvidence, OrganizationEvidence, ResponseFlags};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// KPA tallies
// ---------------------------------------------------------------------------

/// Response counts for one KPA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KpaTally {
    pub total: usize,
    pub instituted: usize,
    pub institutionalized: usize,
}

impl KpaTally {
    pub fn record(&mut self, response: &ResponseFlags) {
        self.total += 1;
        if response.instituted {
            self.instituted += 1;
        }
        if response.institutionalized {
            self.institutionalized += 1;
        }
    }

    pub fn instituted_pct(&self) -> u8 {
        percentage(self.instituted, self.total)
    }

    pub fn institutionalized_pct(&self) -> u8 {
        percentage(self.institutionalized, self.total)
    }
}

/// Group responses by KPA code. Codes without a KPA prefix are skipped.
pub fn tally_by_kpa<'a>(
    responses: impl IntoIterator<Item = &'a ResponseFlags>,
) -> BTreeMap<String, KpaTally> {
    let mut tallies: BTreeMap<String, KpaTally> = BTreeMap::new();
    for response in responses {
        if let Some(kpa) = kpa_code(&response.activity_code) {
            tallies.entry(kpa.to_string()).or_default().record(response);
        }
    }
    tallies
}

fn tally_all(responses: &[ResponseFlags]) -> KpaTally {
    responses.iter().fold(KpaTally::default(), |mut tally, r| {
        tally.record(r);
        tally
    })
}

// ---------------------------------------------------------------------------
// Per-KPA maturity
// ---------------------------------------------------------------------------

/// Maturity of one KPA over the responses it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpaMaturity {
    #[serde(rename = "kpa_codigo")]
    pub kpa_code: String,
    #[serde(rename = "area_modelo")]
    pub area: String,
    #[serde(rename = "total_atividades")]
    pub total: usize,
    #[serde(rename = "instituidas")]
    pub instituted: usize,
    #[serde(rename = "institucionalizadas")]
    pub institutionalized: usize,
    #[serde(rename = "percentual_instituidas")]
    pub instituted_pct: u8,
    #[serde(rename = "percentual_institucionalizadas")]
    pub institutionalized_pct: u8,
}

/// Per-KPA maturity across the authoritative finalized assessment of
/// every level, sorted by KPA code.
pub fn maturity_by_kpa(
    catalog: &ActivityCatalog,
    evidence: &OrganizationEvidence,
) -> Vec<KpaMaturity> {
    let tallies = tally_by_kpa(evidence.finalized().flat_map(|a| a.responses.iter()));
    tallies
        .into_iter()
        .map(|(kpa, tally)| KpaMaturity {
            area: catalog.area_name(&kpa),
            kpa_code: kpa,
            total: tally.total,
            instituted: tally.instituted,
            institutionalized: tally.institutionalized,
            instituted_pct: tally.instituted_pct(),
            institutionalized_pct: tally.institutionalized_pct(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Temporal evolution
// ---------------------------------------------------------------------------

/// One point of the maturity timeline: a level's authoritative assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvolutionPoint {
    #[serde(rename = "data_avaliacao")]
    pub assessed_at: Timestamp,
    #[serde(rename = "titulo_avaliacao")]
    pub title: String,
    #[serde(rename = "nivel")]
    pub level: u8,
    /// Institutionalized percentage over responses received.
    #[serde(rename = "maturidade_geral")]
    pub overall_pct: u8,
    #[serde(rename = "total_atividades")]
    pub total: usize,
    #[serde(rename = "instituidas")]
    pub instituted: usize,
    #[serde(rename = "institucionalizadas")]
    pub institutionalized: usize,
}

/// One point per level with a finalized assessment, ascending by level.
/// Assessments finalized without any response are left out.
pub fn temporal_evolution(evidence: &OrganizationEvidence) -> Vec<EvolutionPoint> {
    evidence
        .finalized()
        .filter(|assessment| !assessment.responses.is_empty())
        .map(|assessment| {
            let tally = tally_all(&assessment.responses);
            EvolutionPoint {
                assessed_at: assessment.created_at,
                title: assessment.title.clone(),
                level: assessment.level,
                overall_pct: tally.institutionalized_pct(),
                total: tally.total,
                instituted: tally.instituted,
                institutionalized: tally.institutionalized,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    #[serde(rename = "crescimento")]
    Growth,
    #[serde(rename = "estavel")]
    Stable,
    #[serde(rename = "declinio")]
    Decline,
}

/// Change in institutionalized percentage between the first and last
/// evolution points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trend {
    #[serde(rename = "variacao")]
    pub delta: i16,
    #[serde(rename = "direcao")]
    pub direction: TrendDirection,
}

/// `None` with fewer than two points.
pub fn trend(points: &[EvolutionPoint]) -> Option<Trend> {
    if points.len() < 2 {
        return None;
    }
    let first = points.first()?;
    let last = points.last()?;
    let delta = i16::from(last.overall_pct) - i16::from(first.overall_pct);
    let direction = match delta {
        d if d > 0 => TrendDirection::Growth,
        0 => TrendDirection::Stable,
        _ => TrendDirection::Decline,
    };
    Some(Trend { delta, direction })
}

// ---------------------------------------------------------------------------
// Detailed KPA breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KpaStatus {
    #[serde(rename = "Institucionalizado")]
    Institutionalized,
    #[serde(rename = "Instituído")]
    Instituted,
    #[serde(rename = "Parcial")]
    Partial,
}

impl KpaStatus {
    /// Three-way status of a KPA: every response institutionalized, every
    /// response instituted, or anything less.
    pub fn from_tally(tally: &KpaTally) -> Self {
        if tally.total > 0 && tally.institutionalized == tally.total {
            Self::Institutionalized
        } else if tally.total > 0 && tally.instituted == tally.total {
            Self::Instituted
        } else {
            Self::Partial
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Institutionalized => "Institucionalizado",
            Self::Instituted => "Instituído",
            Self::Partial => "Parcial",
        }
    }

    /// Display color hint for front ends.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Institutionalized => "success",
            Self::Instituted => "warning",
            Self::Partial => "danger",
        }
    }
}

/// Breakdown row for a KPA of a finalized assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedKpaDetail {
    #[serde(rename = "kpa_codigo")]
    pub kpa_code: String,
    #[serde(rename = "area_modelo")]
    pub area: String,
    #[serde(rename = "nivel")]
    pub level: u8,
    #[serde(rename = "avaliacao_id")]
    pub assessment_id: DbId,
    #[serde(rename = "titulo_avaliacao")]
    pub title: String,
    #[serde(rename = "data_avaliacao")]
    pub assessed_at: Timestamp,
    #[serde(rename = "total_atividades")]
    pub total: usize,
    #[serde(rename = "instituidas")]
    pub instituted: usize,
    #[serde(rename = "institucionalizadas")]
    pub institutionalized: usize,
    pub status: KpaStatus,
    #[serde(rename = "cor_status")]
    pub color: &'static str,
}

/// Breakdown row for a catalog KPA of an in-progress assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InProgressKpaDetail {
    #[serde(rename = "kpa_codigo")]
    pub kpa_code: String,
    #[serde(rename = "area_modelo")]
    pub area: String,
    #[serde(rename = "nivel")]
    pub level: u8,
    #[serde(rename = "avaliacao_id")]
    pub assessment_id: DbId,
    #[serde(rename = "titulo_avaliacao")]
    pub title: String,
    #[serde(rename = "data_avaliacao")]
    pub assessed_at: Timestamp,
    /// Responses received over catalog activities for the whole level.
    #[serde(rename = "percentual_preenchimento")]
    pub fill_pct: u8,
    #[serde(rename = "kpa_preenchido")]
    pub kpa_answered: bool,
    pub status: &'static str,
    #[serde(rename = "cor_status")]
    pub color: &'static str,
}

pub const IN_PROGRESS_LABEL: &str = "Em Andamento";
pub const IN_PROGRESS_COLOR: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tipo")]
pub enum KpaDetail {
    #[serde(rename = "finalizada")]
    Finalized(FinalizedKpaDetail),
    #[serde(rename = "em_andamento")]
    InProgress(InProgressKpaDetail),
}

impl KpaDetail {
    fn sort_key(&self) -> (u8, &str) {
        match self {
            Self::Finalized(d) => (d.level, d.kpa_code.as_str()),
            Self::InProgress(d) => (d.level, d.kpa_code.as_str()),
        }
    }
}

fn finalized_rows(catalog: &ActivityCatalog, assessment: &AssessmentEvidence) -> Vec<KpaDetail> {
    tally_by_kpa(&assessment.responses)
        .into_iter()
        .map(|(kpa, tally)| {
            let status = KpaStatus::from_tally(&tally);
            KpaDetail::Finalized(FinalizedKpaDetail {
                area: catalog.area_name(&kpa),
                kpa_code: kpa,
                level: assessment.level,
                assessment_id: assessment.id,
                title: assessment.title.clone(),
                assessed_at: assessment.created_at,
                total: tally.total,
                instituted: tally.instituted,
                institutionalized: tally.institutionalized,
                status,
                color: status.color(),
            })
        })
        .collect()
}

fn in_progress_rows(catalog: &ActivityCatalog, assessment: &AssessmentEvidence) -> Vec<KpaDetail> {
    let answered = tally_by_kpa(&assessment.responses);
    let fill_pct = percentage(
        assessment.responses.len(),
        catalog.expected_count(assessment.level),
    );

    catalog
        .kpas(assessment.level)
        .iter()
        .map(|kpa| {
            KpaDetail::InProgress(InProgressKpaDetail {
                kpa_code: kpa.code.clone(),
                area: catalog.area_name(&kpa.code),
                level: assessment.level,
                assessment_id: assessment.id,
                title: assessment.title.clone(),
                assessed_at: assessment.created_at,
                fill_pct,
                kpa_answered: answered.contains_key(&kpa.code),
                status: IN_PROGRESS_LABEL,
                color: IN_PROGRESS_COLOR,
            })
        })
        .collect()
}

/// Per-KPA rows for every level's authoritative finalized assessment and
/// every level's newest in-progress assessment, sorted by (level, KPA).
/// Finalized rows precede in-progress rows with the same key.
pub fn kpa_breakdown(catalog: &ActivityCatalog, evidence: &OrganizationEvidence) -> Vec<KpaDetail> {
    let mut rows: Vec<KpaDetail> = evidence
        .finalized()
        .flat_map(|a| finalized_rows(catalog, a))
        .collect();
    rows.extend(
        evidence
            .latest_in_progress_by_level()
            .into_iter()
            .flat_map(|a| in_progress_rows(catalog, a)),
    );
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    rows
}
