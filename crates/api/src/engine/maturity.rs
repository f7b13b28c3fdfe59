//! Database-backed certification service.

use std::collections::HashMap;
use std::sync::Arc;

use prisma_core::catalog::ActivityCatalog;
use prisma_core::maturity::{
    certify, check_level, AssessmentEvidence, LevelCompleteness, MaturityClassification,
    OrganizationEvidence, ResponseFlags,
};
use prisma_core::types::DbId;
use prisma_db::models::assessment::Assessment;
use prisma_db::models::response::ResponseFlagsRow;
use prisma_db::repositories::{AssessmentRepo, ResponseRepo};
use prisma_db::DbPool;

/// Certification engine bound to a pool and the process-wide catalog.
///
/// Built once at startup and shared through `AppState`.
pub struct MaturityService {
    pool: DbPool,
    catalog: Arc<ActivityCatalog>,
}

impl MaturityService {
    pub fn new(pool: DbPool, catalog: Arc<ActivityCatalog>) -> Self {
        Self { pool, catalog }
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Load every assessment of an organization with its response flags.
    pub async fn load_evidence(
        &self,
        organization_id: DbId,
    ) -> Result<OrganizationEvidence, sqlx::Error> {
        let assessments = AssessmentRepo::list_by_organization(&self.pool, organization_id).await?;
        let flags = ResponseRepo::flags_for_organization(&self.pool, organization_id).await?;
        Ok(OrganizationEvidence::from_assessments(build_evidence(
            assessments,
            flags,
        )))
    }

    /// Completeness of one level against its authoritative assessment.
    pub async fn is_level_complete(
        &self,
        organization_id: DbId,
        level: u8,
    ) -> Result<LevelCompleteness, sqlx::Error> {
        let evidence = self.load_evidence(organization_id).await?;
        Ok(check_level(&self.catalog, level, evidence.authoritative(level)))
    }

    /// Certified classification of an organization.
    ///
    /// Never fails: storage errors yield the `erro` classification at
    /// level 1.
    pub async fn classify(&self, organization_id: DbId) -> MaturityClassification {
        match self.load_evidence(organization_id).await {
            Ok(evidence) => certify(&self.catalog, &evidence),
            Err(e) => {
                tracing::warn!(organization_id, error = %e, "Certification failed");
                MaturityClassification::error(e)
            }
        }
    }
}

/// Attach response flags to their assessments.
///
/// Assessments whose stored level does not fit a maturity level are
/// skipped.
pub fn build_evidence(
    assessments: Vec<Assessment>,
    flags: Vec<ResponseFlagsRow>,
) -> Vec<AssessmentEvidence> {
    let mut by_assessment: HashMap<DbId, Vec<ResponseFlags>> = HashMap::new();
    for row in flags {
        by_assessment
            .entry(row.assessment_id)
            .or_default()
            .push(row.into());
    }

    assessments
        .into_iter()
        .filter_map(|assessment| {
            let Ok(level) = u8::try_from(assessment.target_level) else {
                tracing::warn!(
                    assessment_id = assessment.id,
                    target_level = assessment.target_level,
                    "Skipping assessment with invalid level"
                );
                return None;
            };
            Some(AssessmentEvidence {
                id: assessment.id,
                status: assessment.status(),
                responses: by_assessment.remove(&assessment.id).unwrap_or_default(),
                title: assessment.title,
                level,
                created_at: assessment.created_at,
                updated_at: assessment.updated_at,
            })
        })
        .collect()
}
