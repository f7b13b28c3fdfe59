//! Assessment lifecycle, level completeness and certification.
//!
//! Certification works on an [`OrganizationEvidence`] snapshot: every
//! assessment of one organization with its response flags, loaded once by
//! the caller. Evaluation is then pure, so the same stored data always
//! yields the same classification.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::ActivityCatalog;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_IN_PROGRESS: &str = "em_andamento";
pub const STATUS_FINALIZED: &str = "finalizada";

/// All valid assessment status strings.
pub const VALID_ASSESSMENT_STATUSES: &[&str] = &[STATUS_IN_PROGRESS, STATUS_FINALIZED];

/// Level reported when nothing can be certified.
pub const BASELINE_LEVEL: u8 = 1;

/// Lowest level an assessment can target.
pub const MIN_TARGET_LEVEL: u8 = 2;

/// Highest maturity level.
pub const MAX_LEVEL: u8 = 5;

// ---------------------------------------------------------------------------
// Assessment status
// ---------------------------------------------------------------------------

/// Lifecycle of an assessment. `InProgress -> Finalized` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStatus {
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "finalizada")]
    Finalized,
}

impl AssessmentStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_FINALIZED => Ok(Self::Finalized),
            _ => Err(format!(
                "Invalid assessment status '{s}'. Must be one of: {}",
                VALID_ASSESSMENT_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Finalized => STATUS_FINALIZED,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

/// Validate an assessment target level (2 to 5).
pub fn validate_target_level(level: i64) -> Result<u8, CoreError> {
    u8::try_from(level)
        .ok()
        .filter(|l| (MIN_TARGET_LEVEL..=MAX_LEVEL).contains(l))
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Nível alvo deve estar entre {MIN_TARGET_LEVEL} e {MAX_LEVEL} (recebido {level})"
            ))
        })
}

/// Floor of `part / whole * 100`. Zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part.min(whole) * 100 / whole) as u8
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// The two flags recorded for one activity of one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFlags {
    pub activity_code: String,
    pub instituted: bool,
    pub institutionalized: bool,
}

/// One assessment with the flags of every response it received.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentEvidence {
    pub id: DbId,
    pub title: String,
    pub level: u8,
    pub status: AssessmentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub responses: Vec<ResponseFlags>,
}

impl AssessmentEvidence {
    /// Recency key: most recently created first, ties broken by larger id.
    fn recency(&self) -> (Timestamp, DbId) {
        (self.created_at, self.id)
    }
}

/// All assessments of one organization, indexed for certification.
///
/// Only the most recent finalized assessment of each level is retained as
/// authoritative; older finalized ones are ignored. In-progress
/// assessments are kept newest first.
#[derive(Debug, Clone, Default)]
pub struct OrganizationEvidence {
    finalized: BTreeMap<u8, AssessmentEvidence>,
    in_progress: Vec<AssessmentEvidence>,
}

impl OrganizationEvidence {
    pub fn from_assessments(assessments: impl IntoIterator<Item = AssessmentEvidence>) -> Self {
        let mut finalized: BTreeMap<u8, AssessmentEvidence> = BTreeMap::new();
        let mut in_progress = Vec::new();

        for assessment in assessments {
            match assessment.status {
                AssessmentStatus::Finalized => {
                    let newer = finalized
                        .get(&assessment.level)
                        .map_or(true, |current| assessment.recency() > current.recency());
                    if newer {
                        finalized.insert(assessment.level, assessment);
                    }
                }
                AssessmentStatus::InProgress => in_progress.push(assessment),
            }
        }

        in_progress.sort_by(|a, b| b.recency().cmp(&a.recency()));
        Self {
            finalized,
            in_progress,
        }
    }

    /// The authoritative finalized assessment of a level.
    pub fn authoritative(&self, level: u8) -> Option<&AssessmentEvidence> {
        self.finalized.get(&level)
    }

    /// Authoritative finalized assessments, ascending by level.
    pub fn finalized(&self) -> impl Iterator<Item = &AssessmentEvidence> {
        self.finalized.values()
    }

    /// In-progress assessments, newest first.
    pub fn in_progress(&self) -> &[AssessmentEvidence] {
        &self.in_progress
    }

    /// Newest in-progress assessment of each level, ascending by level.
    pub fn latest_in_progress_by_level(&self) -> Vec<&AssessmentEvidence> {
        let mut latest: BTreeMap<u8, &AssessmentEvidence> = BTreeMap::new();
        for assessment in &self.in_progress {
            latest.entry(assessment.level).or_insert(assessment);
        }
        latest.into_values().collect()
    }

    pub fn has_finalized(&self) -> bool {
        !self.finalized.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Level completeness
// ---------------------------------------------------------------------------

/// Why a level is not complete. When several apply, the first in
/// declaration order is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncompleteReason {
    #[serde(rename = "sem_avaliacao_finalizada")]
    NoFinalizedAssessment,
    #[serde(rename = "catalogo_vazio")]
    EmptyCatalog,
    #[serde(rename = "atividades_faltantes")]
    MissingActivities,
    #[serde(rename = "atividades_nao_institucionalizadas")]
    NotInstitutionalized,
}

/// Result of checking one level against its authoritative assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCompleteness {
    #[serde(rename = "nivel")]
    pub level: u8,
    #[serde(rename = "completo")]
    pub complete: bool,
    #[serde(rename = "motivo")]
    pub reason: Option<IncompleteReason>,
    #[serde(rename = "avaliacao_id")]
    pub assessment_id: Option<DbId>,
    #[serde(rename = "total_esperado")]
    pub expected: usize,
    #[serde(rename = "total_respondido")]
    pub answered: usize,
    #[serde(rename = "total_institucionalizado")]
    pub institutionalized: usize,
    #[serde(rename = "percentual_completude")]
    pub completion_pct: u8,
    #[serde(rename = "percentual_institucionalizacao")]
    pub institutionalization_pct: u8,
    #[serde(rename = "atividades_faltantes")]
    pub missing: Vec<String>,
    #[serde(rename = "atividades_nao_institucionalizadas")]
    pub not_institutionalized: Vec<String>,
}

impl LevelCompleteness {
    fn incomplete(level: u8, reason: IncompleteReason, assessment_id: Option<DbId>) -> Self {
        Self {
            level,
            complete: false,
            reason: Some(reason),
            assessment_id,
            expected: 0,
            answered: 0,
            institutionalized: 0,
            completion_pct: 0,
            institutionalization_pct: 0,
            missing: Vec::new(),
            not_institutionalized: Vec::new(),
        }
    }
}

/// Check a level against the given authoritative assessment.
///
/// Complete iff every catalog activity of the level has a response and
/// every such response is institutionalized. Responses for codes outside
/// the catalog are ignored.
pub fn check_level(
    catalog: &ActivityCatalog,
    level: u8,
    assessment: Option<&AssessmentEvidence>,
) -> LevelCompleteness {
    let Some(assessment) = assessment else {
        return LevelCompleteness::incomplete(level, IncompleteReason::NoFinalizedAssessment, None);
    };

    let expected = catalog.activity_codes(level);
    if expected.is_empty() {
        return LevelCompleteness::incomplete(
            level,
            IncompleteReason::EmptyCatalog,
            Some(assessment.id),
        );
    }

    let by_code: HashMap<&str, &ResponseFlags> = assessment
        .responses
        .iter()
        .map(|r| (r.activity_code.as_str(), r))
        .collect();

    let mut missing = Vec::new();
    let mut not_institutionalized = Vec::new();
    for code in &expected {
        match by_code.get(code) {
            None => missing.push((*code).to_string()),
            Some(response) if !response.institutionalized => {
                not_institutionalized.push((*code).to_string())
            }
            Some(_) => {}
        }
    }

    let total = expected.len();
    let answered = total - missing.len();
    let institutionalized = answered - not_institutionalized.len();
    let reason = if !missing.is_empty() {
        Some(IncompleteReason::MissingActivities)
    } else if !not_institutionalized.is_empty() {
        Some(IncompleteReason::NotInstitutionalized)
    } else {
        None
    };

    LevelCompleteness {
        level,
        complete: reason.is_none(),
        reason,
        assessment_id: Some(assessment.id),
        expected: total,
        answered,
        institutionalized,
        completion_pct: percentage(answered, total),
        institutionalization_pct: percentage(institutionalized, total),
        missing,
        not_institutionalized,
    }
}

/// Completeness of every certifiable level (2 to 5), ascending.
pub fn level_overview(
    catalog: &ActivityCatalog,
    evidence: &OrganizationEvidence,
) -> Vec<LevelCompleteness> {
    (MIN_TARGET_LEVEL..=MAX_LEVEL)
        .map(|level| check_level(catalog, level, evidence.authoritative(level)))
        .collect()
}

// ---------------------------------------------------------------------------
// Certification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassificationStatus {
    #[serde(rename = "certificado")]
    Certified,
    #[serde(rename = "inicial")]
    Initial,
    #[serde(rename = "erro")]
    Error,
}

impl ClassificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Certified => "Certificado",
            Self::Initial => "Inicial",
            Self::Error => "Erro",
        }
    }
}

/// Derived maturity classification of an organization. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaturityClassification {
    #[serde(rename = "nivel_maturidade")]
    pub level: u8,
    pub status: ClassificationStatus,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "data_certificacao")]
    pub certified_at: Option<Timestamp>,
    #[serde(rename = "criterios_atendidos")]
    pub criteria_met: bool,
    #[serde(rename = "detalhes")]
    pub details: String,
}

impl MaturityClassification {
    pub fn certified(level: u8, certified_at: Option<Timestamp>) -> Self {
        Self {
            level,
            status: ClassificationStatus::Certified,
            description: format!("Nível {level} de Maturidade em Gestão de Riscos"),
            certified_at,
            criteria_met: true,
            details: format!(
                "Todas as atividades dos níveis {MIN_TARGET_LEVEL} a {level} estão institucionalizadas"
            ),
        }
    }

    pub fn initial() -> Self {
        Self {
            level: BASELINE_LEVEL,
            status: ClassificationStatus::Initial,
            description: "Nível Inicial - Critérios de certificação não atendidos".to_string(),
            certified_at: None,
            criteria_met: false,
            details: "Nem todas as atividades dos níveis estão institucionalizadas ou avaliações não finalizadas"
                .to_string(),
        }
    }

    /// Classification reported when evidence could not be loaded or
    /// evaluated. Never grants a level.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            level: BASELINE_LEVEL,
            status: ClassificationStatus::Error,
            description: "Erro ao calcular nível de maturidade".to_string(),
            certified_at: None,
            criteria_met: false,
            details: format!("Erro: {message}"),
        }
    }

    pub fn is_certified(&self) -> bool {
        self.status == ClassificationStatus::Certified
    }
}

/// Highest level L in 5..=2 such that a finalized assessment exists for L
/// and every level 2..=L is complete against its own authoritative
/// assessment. Falls back to the initial classification.
///
/// The certification date is the latest `updated_at` among the
/// authoritative assessments of the certified chain.
pub fn certify(
    catalog: &ActivityCatalog,
    evidence: &OrganizationEvidence,
) -> MaturityClassification {
    for candidate in (MIN_TARGET_LEVEL..=MAX_LEVEL).rev() {
        if evidence.authoritative(candidate).is_none() {
            continue;
        }

        let chain_complete = (MIN_TARGET_LEVEL..=candidate)
            .all(|level| check_level(catalog, level, evidence.authoritative(level)).complete);

        if chain_complete {
            let certified_at = (MIN_TARGET_LEVEL..=candidate)
                .filter_map(|level| evidence.authoritative(level))
                .map(|a| a.updated_at)
                .max();
            return MaturityClassification::certified(candidate, certified_at);
        }
    }

    MaturityClassification::initial()
}

#[cfg(test)]
pub(crate) mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    pub(crate) fn at(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    pub(crate) fn flags(code: &str, instituted: bool, institutionalized: bool) -> ResponseFlags {
        ResponseFlags {
            activity_code: code.to_string(),
            instituted,
            institutionalized,
        }
    }

    /// Every catalog activity of a level, institutionalized.
    pub(crate) fn full_level(catalog: &ActivityCatalog, level: u8) -> Vec<ResponseFlags> {
        catalog
            .activity_codes(level)
            .into_iter()
            .map(|code| flags(code, true, true))
            .collect()
    }

    pub(crate) fn assessment(
        id: DbId,
        level: u8,
        status: AssessmentStatus,
        created: i64,
        responses: Vec<ResponseFlags>,
    ) -> AssessmentEvidence {
        AssessmentEvidence {
            id,
            title: format!("Avaliação {id}"),
            level,
            status,
            created_at: at(created),
            updated_at: at(created + 30),
            responses,
        }
    }

    fn finalized(
        id: DbId,
        level: u8,
        created: i64,
        responses: Vec<ResponseFlags>,
    ) -> AssessmentEvidence {
        assessment(id, level, AssessmentStatus::Finalized, created, responses)
    }

    // -- AssessmentStatus ----------------------------------------------------

    #[test]
    fn status_round_trips_through_str() {
        for status in [AssessmentStatus::InProgress, AssessmentStatus::Finalized] {
            assert_eq!(AssessmentStatus::from_str_value(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown_value() {
        let err = AssessmentStatus::from_str_value("cancelada").unwrap_err();
        assert!(err.contains("Invalid assessment status"));
    }

    #[test]
    fn target_level_bounds() {
        assert_eq!(validate_target_level(2).unwrap(), 2);
        assert_eq!(validate_target_level(5).unwrap(), 5);
        assert_matches!(validate_target_level(1), Err(CoreError::Validation(_)));
        assert_matches!(validate_target_level(6), Err(CoreError::Validation(_)));
        assert_matches!(validate_target_level(-3), Err(CoreError::Validation(_)));
        assert_matches!(validate_target_level(1_000), Err(CoreError::Validation(_)));
    }

    #[test]
    fn percentage_floors() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(28, 29), 96);
        assert_eq!(percentage(29, 29), 100);
    }

    // -- OrganizationEvidence ------------------------------------------------

    #[test]
    fn most_recent_finalized_assessment_is_authoritative() {
        let evidence = OrganizationEvidence::from_assessments(vec![
            finalized(1, 2, 0, vec![]),
            finalized(2, 2, 10, vec![]),
            finalized(3, 2, 5, vec![]),
        ]);
        assert_eq!(evidence.authoritative(2).unwrap().id, 2);
    }

    #[test]
    fn creation_tie_is_broken_by_larger_id() {
        let evidence = OrganizationEvidence::from_assessments(vec![
            finalized(7, 3, 0, vec![]),
            finalized(4, 3, 0, vec![]),
        ]);
        assert_eq!(evidence.authoritative(3).unwrap().id, 7);
    }

    #[test]
    fn in_progress_assessments_are_not_authoritative() {
        let evidence = OrganizationEvidence::from_assessments(vec![assessment(
            1,
            2,
            AssessmentStatus::InProgress,
            0,
            vec![],
        )]);
        assert!(evidence.authoritative(2).is_none());
        assert!(!evidence.has_finalized());
        assert_eq!(evidence.in_progress().len(), 1);
    }

    #[test]
    fn latest_in_progress_per_level() {
        let evidence = OrganizationEvidence::from_assessments(vec![
            assessment(1, 3, AssessmentStatus::InProgress, 0, vec![]),
            assessment(2, 3, AssessmentStatus::InProgress, 20, vec![]),
            assessment(3, 2, AssessmentStatus::InProgress, 10, vec![]),
        ]);
        let ids: Vec<DbId> = evidence
            .latest_in_progress_by_level()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    // -- check_level ---------------------------------------------------------

    #[test]
    fn level_without_assessment_is_incomplete() {
        let catalog = ActivityCatalog::fallback();
        let result = check_level(&catalog, 2, None);
        assert!(!result.complete);
        assert_eq!(result.reason, Some(IncompleteReason::NoFinalizedAssessment));
    }

    #[test]
    fn level_missing_from_catalog_is_incomplete() {
        let catalog = ActivityCatalog::fallback();
        let a = finalized(1, 6, 0, vec![flags("6.1.1", true, true)]);
        let result = check_level(&catalog, 6, Some(&a));
        assert_eq!(result.reason, Some(IncompleteReason::EmptyCatalog));
    }

    #[test]
    fn fully_institutionalized_level_is_complete() {
        let catalog = ActivityCatalog::fallback();
        let a = finalized(1, 2, 0, full_level(&catalog, 2));
        let result = check_level(&catalog, 2, Some(&a));
        assert!(result.complete);
        assert_eq!(result.expected, 30);
        assert_eq!(result.answered, 30);
        assert_eq!(result.institutionalization_pct, 100);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn missing_and_uninstitutionalized_codes_are_listed() {
        let catalog = ActivityCatalog::fallback();
        let mut responses = full_level(&catalog, 2);
        responses.retain(|r| r.activity_code != "2.1.1");
        for r in responses.iter_mut().filter(|r| r.activity_code == "2.3.2") {
            r.institutionalized = false;
        }
        let a = finalized(1, 2, 0, responses);

        let result = check_level(&catalog, 2, Some(&a));
        assert!(!result.complete);
        assert_eq!(result.reason, Some(IncompleteReason::MissingActivities));
        assert_eq!(result.missing, vec!["2.1.1"]);
        assert_eq!(result.not_institutionalized, vec!["2.3.2"]);
        assert_eq!(result.answered, 29);
        assert_eq!(result.institutionalized, 28);
        assert_eq!(result.completion_pct, 96);
    }

    #[test]
    fn stray_codes_are_ignored() {
        let catalog = ActivityCatalog::fallback();
        let mut responses = full_level(&catalog, 2);
        responses.push(flags("2.9.9", false, false));
        let a = finalized(1, 2, 0, responses);
        assert!(check_level(&catalog, 2, Some(&a)).complete);
    }

    #[test]
    fn institutionalized_without_instituted_counts() {
        let catalog = ActivityCatalog::fallback();
        let responses = catalog
            .activity_codes(2)
            .into_iter()
            .map(|c| flags(c, false, true))
            .collect();
        let a = finalized(1, 2, 0, responses);
        assert!(check_level(&catalog, 2, Some(&a)).complete);
    }

    // -- certify -------------------------------------------------------------

    #[test]
    fn no_finalized_assessments_is_initial() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::default();
        let result = certify(&catalog, &evidence);
        assert_eq!(result.level, 1);
        assert_eq!(result.status, ClassificationStatus::Initial);
        assert!(!result.criteria_met);
        assert!(result.certified_at.is_none());
    }

    #[test]
    fn complete_level_two_certifies_level_two() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::from_assessments(vec![finalized(
            1,
            2,
            0,
            full_level(&catalog, 2),
        )]);
        let result = certify(&catalog, &evidence);
        assert_eq!(result.level, 2);
        assert_eq!(result.status, ClassificationStatus::Certified);
        assert!(result.criteria_met);
        assert_eq!(result.certified_at, Some(at(30)));
    }

    #[test]
    fn incomplete_higher_level_falls_back_to_lower_chain() {
        let catalog = ActivityCatalog::fallback();
        let mut level_three = full_level(&catalog, 3);
        level_three.pop();
        let evidence = OrganizationEvidence::from_assessments(vec![
            finalized(1, 2, 0, full_level(&catalog, 2)),
            finalized(2, 3, 10, level_three),
        ]);
        let result = certify(&catalog, &evidence);
        assert_eq!(result.level, 2);
        assert!(result.is_certified());
    }

    #[test]
    fn gap_in_chain_blocks_higher_levels() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::from_assessments(vec![
            finalized(1, 2, 0, full_level(&catalog, 2)),
            finalized(2, 4, 10, full_level(&catalog, 4)),
        ]);
        let result = certify(&catalog, &evidence);
        assert_eq!(result.level, 2);
    }

    #[test]
    fn complete_upper_level_without_level_two_is_initial() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::from_assessments(vec![finalized(
            1,
            3,
            0,
            full_level(&catalog, 3),
        )]);
        assert_eq!(certify(&catalog, &evidence).status, ClassificationStatus::Initial);
    }

    #[test]
    fn newer_incomplete_assessment_replaces_older_complete_one() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::from_assessments(vec![
            finalized(1, 2, 0, full_level(&catalog, 2)),
            finalized(2, 2, 60, vec![flags("2.1.1", true, true)]),
        ]);
        assert_eq!(certify(&catalog, &evidence).level, 1);
    }

    #[test]
    fn full_chain_certifies_level_five() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::from_assessments(
            (2..=5).map(|level| {
                finalized(level as DbId, level, level as i64 * 10, full_level(&catalog, level))
            }),
        );
        let result = certify(&catalog, &evidence);
        assert_eq!(result.level, 5);
        assert_eq!(result.certified_at, Some(at(80)));
    }

    #[test]
    fn certification_is_idempotent() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::from_assessments(vec![
            finalized(1, 2, 0, full_level(&catalog, 2)),
            finalized(2, 3, 10, full_level(&catalog, 3)),
        ]);
        assert_eq!(certify(&catalog, &evidence), certify(&catalog, &evidence));
    }

    #[test]
    fn certified_level_implies_complete_chain() {
        let catalog = ActivityCatalog::fallback();
        let evidence = OrganizationEvidence::from_assessments(vec![
            finalized(1, 2, 0, full_level(&catalog, 2)),
            finalized(2, 3, 10, full_level(&catalog, 3)),
            finalized(3, 4, 20, vec![]),
        ]);
        let result = certify(&catalog, &evidence);
        assert_eq!(result.level, 3);
        for level in MIN_TARGET_LEVEL..=result.level {
            assert!(check_level(&catalog, level, evidence.authoritative(level)).complete);
        }
    }

    #[test]
    fn error_classification_never_grants_a_level() {
        let result = MaturityClassification::error("database is locked");
        assert_eq!(result.level, BASELINE_LEVEL);
        assert_eq!(result.status, ClassificationStatus::Error);
        assert!(!result.criteria_met);
        assert!(result.details.contains("database is locked"));
    }

    #[test]
    fn classification_serializes_wire_names() {
        let json = serde_json::to_value(MaturityClassification::initial()).unwrap();
        assert_eq!(json["nivel_maturidade"], 1);
        assert_eq!(json["status"], "inicial");
        assert_eq!(json["criterios_atendidos"], false);
        assert!(json["data_certificacao"].is_null());
    }
}
