//! Integration tests for the maturity engine over a real database.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use prisma_api::engine::MaturityService;
use prisma_core::catalog::ActivityCatalog;
use prisma_core::maturity::{ClassificationStatus, IncompleteReason};
use prisma_core::types::DbId;
use prisma_db::models::assessment::CreateAssessment;
use prisma_db::models::response::UpsertActivityResponse;
use prisma_db::repositories::{AssessmentRepo, ResponseRepo};
use sqlx::SqlitePool;

fn service(pool: &SqlitePool) -> MaturityService {
    MaturityService::new(pool.clone(), Arc::new(ActivityCatalog::fallback()))
}

/// Create a finalized assessment for `level` answering `codes`, all
/// institutionalized.
async fn finalized_assessment(
    pool: &SqlitePool,
    organization_id: DbId,
    level: u8,
    codes: &[&str],
) -> DbId {
    let input = CreateAssessment {
        title: format!("Nível {level}"),
        organization_id,
        target_level: i64::from(level),
    };
    let assessment = AssessmentRepo::create(pool, &input, common::ADMIN_EMAIL)
        .await
        .unwrap();
    for code in codes {
        let answer = UpsertActivityResponse {
            activity_code: code.to_string(),
            instituted: true,
            institutionalized: true,
            ..Default::default()
        };
        ResponseRepo::upsert(pool, assessment.id, &answer)
            .await
            .unwrap()
            .unwrap();
    }
    assert!(AssessmentRepo::finalize(pool, assessment.id).await.unwrap());
    assessment.id
}

fn all_codes(catalog: &ActivityCatalog, level: u8) -> Vec<String> {
    catalog
        .activity_codes(level)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_organization_without_assessments_is_initial(pool: SqlitePool) {
    let cge = common::organization_id(&pool, "CGE").await;
    let engine = service(&pool);

    let classification = engine.classify(cge).await;
    assert_eq!(classification.level, 1);
    assert_eq!(classification.status, ClassificationStatus::Initial);

    let level = engine.is_level_complete(cge, 2).await.unwrap();
    assert!(!level.complete);
    assert_matches!(level.reason, Some(IncompleteReason::NoFinalizedAssessment));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_complete_level_two_is_certified(pool: SqlitePool) {
    let cge = common::organization_id(&pool, "CGE").await;
    let engine = service(&pool);
    let codes = all_codes(engine.catalog(), 2);
    assert_eq!(codes.len(), 30);

    let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
    finalized_assessment(&pool, cge, 2, &refs).await;

    assert!(engine.is_level_complete(cge, 2).await.unwrap().complete);

    let classification = engine.classify(cge).await;
    assert_eq!(classification.level, 2);
    assert_eq!(classification.status, ClassificationStatus::Certified);
    assert!(classification.certified_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_incomplete_higher_level_falls_back(pool: SqlitePool) {
    let cge = common::organization_id(&pool, "CGE").await;
    let engine = service(&pool);

    let level_two = all_codes(engine.catalog(), 2);
    let refs: Vec<&str> = level_two.iter().map(String::as_str).collect();
    finalized_assessment(&pool, cge, 2, &refs).await;

    // Level 3 is finalized with one activity missing.
    let level_three = all_codes(engine.catalog(), 3);
    let partial: Vec<&str> = level_three.iter().skip(1).map(String::as_str).collect();
    finalized_assessment(&pool, cge, 3, &partial).await;

    let level = engine.is_level_complete(cge, 3).await.unwrap();
    assert_matches!(level.reason, Some(IncompleteReason::MissingActivities));
    assert_eq!(level.missing, vec![level_three[0].clone()]);

    let classification = engine.classify(cge).await;
    assert_eq!(classification.level, 2);
    assert_eq!(classification.status, ClassificationStatus::Certified);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_storage_failure_yields_error_classification(pool: SqlitePool) {
    let cge = common::organization_id(&pool, "CGE").await;
    let engine = service(&pool);
    pool.close().await;

    let classification = engine.classify(cge).await;
    assert_eq!(classification.level, 1);
    assert_eq!(classification.status, ClassificationStatus::Error);
    assert!(!classification.criteria_met);
}
