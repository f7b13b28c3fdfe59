//! Individual and administrative report assembly.

use std::collections::BTreeMap;

use prisma_core::catalog::ActivityCatalog;
use prisma_core::maturity::{
    certify, level_overview, LevelCompleteness, MaturityClassification, OrganizationEvidence,
};
use prisma_core::ranking::{
    sort_ranking, summarize, DetailedStats, GeneralStats, OrganizationActivity, RankingEntry,
};
use prisma_core::recommendation::{generate, Recommendation, RecommendationContext};
use prisma_core::report::{
    kpa_breakdown, maturity_by_kpa, temporal_evolution, trend, EvolutionPoint, KpaDetail,
    KpaMaturity, Trend,
};
use prisma_core::seal::MaturitySeal;
use prisma_core::types::{DbId, Timestamp};
use prisma_db::models::assessment::Assessment;
use prisma_db::models::organization::Organization;
use prisma_db::repositories::AssessmentRepo;
use serde::Serialize;

use super::MaturityService;

// ---------------------------------------------------------------------------
// Individual report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationSummary {
    pub id: DbId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "sigla")]
    pub abbreviation: String,
}

impl From<&Organization> for OrganizationSummary {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id,
            name: org.name.clone(),
            abbreviation: org.abbreviation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub id: DbId,
    #[serde(rename = "titulo")]
    pub title: String,
    pub status: String,
    #[serde(rename = "data_criacao")]
    pub created_at: Timestamp,
    #[serde(rename = "nivel_desejado")]
    pub target_level: i64,
}

impl From<&Assessment> for AssessmentSummary {
    fn from(a: &Assessment) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            status: a.status.clone(),
            created_at: a.created_at,
            target_level: a.target_level,
        }
    }
}

/// Everything the individual maturity report shows for one organization.
#[derive(Debug, Clone, Serialize)]
pub struct IndividualReport {
    #[serde(rename = "orgao")]
    pub organization: OrganizationSummary,
    #[serde(rename = "avaliacoes")]
    pub assessments: Vec<AssessmentSummary>,
    #[serde(rename = "niveis")]
    pub levels: Vec<LevelCompleteness>,
    #[serde(rename = "maturidade_por_kpa")]
    pub kpa_maturity: Vec<KpaMaturity>,
    #[serde(rename = "evolucao_temporal")]
    pub evolution: Vec<EvolutionPoint>,
    #[serde(rename = "tendencia")]
    pub trend: Option<Trend>,
    #[serde(rename = "detalhamento_kpas")]
    pub kpa_details: Vec<KpaDetail>,
    #[serde(rename = "recomendacoes")]
    pub recommendations: Vec<Recommendation>,
    #[serde(rename = "classificacao_maturidade")]
    pub classification: MaturityClassification,
    #[serde(rename = "selo_maturidade")]
    pub seal: MaturitySeal,
}

/// Assemble the individual report from already loaded data.
pub fn assemble_individual_report(
    catalog: &ActivityCatalog,
    organization: OrganizationSummary,
    assessments: &[Assessment],
    evidence: &OrganizationEvidence,
) -> IndividualReport {
    let classification = certify(catalog, evidence);
    let kpa_maturity = maturity_by_kpa(catalog, evidence);
    let evolution = temporal_evolution(evidence);
    let trend = trend(&evolution);

    let recommendations = generate(&RecommendationContext {
        kpas: &kpa_maturity,
        in_progress: evidence.in_progress(),
        trend: trend.as_ref(),
        classification: &classification,
    });

    IndividualReport {
        organization,
        assessments: assessments.iter().map(AssessmentSummary::from).collect(),
        levels: level_overview(catalog, evidence),
        kpa_details: kpa_breakdown(catalog, evidence),
        seal: MaturitySeal::for_classification(&classification),
        kpa_maturity,
        evolution,
        trend,
        recommendations,
        classification,
    }
}

// ---------------------------------------------------------------------------
// Administrative report
// ---------------------------------------------------------------------------

/// Organization ranking with global statistics.
#[derive(Debug, Clone, Serialize)]
pub struct AdminReport {
    #[serde(rename = "ranking_maturidade")]
    pub ranking: Vec<RankingEntry>,
    #[serde(rename = "estatisticas_gerais")]
    pub general: GeneralStats,
    #[serde(rename = "estatisticas_detalhadas")]
    pub detailed: DetailedStats,
}

/// Rank classified organizations and summarize them.
///
/// Every organization is ranked, including those whose classification is
/// `erro`.
pub fn assemble_admin_report(
    classified: impl IntoIterator<Item = (OrganizationActivity, MaturityClassification)>,
    status_counts: &BTreeMap<String, usize>,
) -> AdminReport {
    let mut ranking: Vec<RankingEntry> = classified
        .into_iter()
        .map(|(activity, classification)| RankingEntry::new(activity, classification))
        .collect();
    sort_ranking(&mut ranking);

    let (general, detailed) = summarize(&ranking, status_counts);
    AdminReport {
        ranking,
        general,
        detailed,
    }
}

impl MaturityService {
    /// Full individual report for one organization.
    pub async fn individual_report(
        &self,
        organization: &Organization,
    ) -> Result<IndividualReport, sqlx::Error> {
        let assessments = AssessmentRepo::list_by_organization(self.pool(), organization.id).await?;
        let evidence = self.load_evidence(organization.id).await?;
        Ok(assemble_individual_report(
            self.catalog(),
            organization.into(),
            &assessments,
            &evidence,
        ))
    }

    /// Ranking of every organization by certified level.
    ///
    /// An organization whose evidence cannot be loaded is ranked with the
    /// `erro` classification.
    pub async fn admin_report(&self) -> Result<AdminReport, sqlx::Error> {
        let stats = AssessmentRepo::organization_stats(self.pool()).await?;

        let mut classified = Vec::with_capacity(stats.len());
        for row in stats {
            let classification = self.classify(row.organization_id).await;
            classified.push((OrganizationActivity::from(row), classification));
        }

        let status_counts: BTreeMap<String, usize> = AssessmentRepo::count_by_status(self.pool())
            .await?
            .into_iter()
            .map(|c| (c.status, usize::try_from(c.count).unwrap_or(0)))
            .collect();

        Ok(assemble_admin_report(classified, &status_counts))
    }
}
