use prisma_core::permissions::{Permission, ADMIN_PROFILE_NAME};
use prisma_db::repositories::{OrganizationRepo, ProfileRepo, UserRepo};
use sqlx::SqlitePool;

/// Full bootstrap test: migrate, verify schema and reference data.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: SqlitePool) {
    prisma_db::health_check(&pool).await.unwrap();

    let tables = [
        "organizations",
        "profiles",
        "profile_permissions",
        "users",
    ];
    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }

    for table in ["assessments", "responses", "response_files"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seeded_organizations(pool: SqlitePool) {
    let orgs = OrganizationRepo::list(&pool).await.unwrap();
    assert_eq!(orgs.len(), 7);

    let sigla: Vec<&str> = orgs.iter().map(|o| o.abbreviation.as_str()).collect();
    assert!(sigla.contains(&"CGE"));
    assert!(sigla.contains(&"SEFAZ"));
    assert!(orgs.iter().all(|o| o.parent_id.is_none()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seeded_profiles_and_permissions(pool: SqlitePool) {
    let profiles = ProfileRepo::list(&pool).await.unwrap();
    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Administrador CGE",
            "Avaliador do Órgão",
            "Consultor Externo",
            "Visualizador"
        ]
    );

    let admin = ProfileRepo::find_by_name(&pool, ADMIN_PROFILE_NAME)
        .await
        .unwrap()
        .expect("admin profile seeded");
    let perms = ProfileRepo::permissions_for(&pool, admin.id).await.unwrap();
    assert!(Permission::ALL.iter().all(|p| perms.allows(*p)));

    let viewer = ProfileRepo::find_by_name(&pool, "Visualizador")
        .await
        .unwrap()
        .unwrap();
    let perms = ProfileRepo::permissions_for(&pool, viewer.id).await.unwrap();
    assert!(perms.allows(Permission::GenerateReports));
    assert!(!perms.allows(Permission::CreateAssessments));
    assert!(!perms.allows(Permission::ManageUsers));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seeded_admin_awaits_password(pool: SqlitePool) {
    let admin = UserRepo::find_by_email(&pool, "admin@cge.mt.gov.br")
        .await
        .unwrap()
        .expect("admin user seeded");
    assert!(admin.is_active);
    assert!(admin.password_hash.is_none());

    let pending = UserRepo::list_without_password(&pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, admin.id);

    let detail = UserRepo::find_detail_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert_eq!(detail.profile_name.as_deref(), Some(ADMIN_PROFILE_NAME));
    assert_eq!(detail.organization_abbreviation.as_deref(), Some("CGE"));
}
