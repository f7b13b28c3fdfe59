//! Integration tests for organization and user repositories.

use assert_matches::assert_matches;
use prisma_db::models::organization::{CreateOrganization, UpdateOrganization};
use prisma_db::models::user::{CreateUser, UpdateUser};
use prisma_db::repositories::{OrganizationRepo, ProfileRepo, UserRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_org(name: &str, abbreviation: &str, parent_id: Option<i64>) -> CreateOrganization {
    CreateOrganization {
        name: name.to_string(),
        abbreviation: abbreviation.to_string(),
        parent_id,
    }
}

async fn profile_id(pool: &SqlitePool, name: &str) -> i64 {
    ProfileRepo::find_by_name(pool, name).await.unwrap().unwrap().id
}

fn new_user(email: &str, profile_id: i64, organization_id: Option<i64>) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        name: "Fulano de Tal".to_string(),
        profile_id,
        organization_id,
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

// -- Organizations -----------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_organization_with_parent(pool: SqlitePool) {
    let parent = OrganizationRepo::create(
        &pool,
        &new_org("Secretaria de Planejamento", "SEPLAG", None),
    )
    .await
    .unwrap();
    let child = OrganizationRepo::create(
        &pool,
        &new_org("  Superintendência de Orçamento ", "SOR", Some(parent.id)),
    )
    .await
    .unwrap();

    assert_eq!(child.name, "Superintendência de Orçamento");
    assert_eq!(child.parent_id, Some(parent.id));
    assert_eq!(child.parent_name.as_deref(), Some("Secretaria de Planejamento"));
    assert_eq!(child.parent_abbreviation.as_deref(), Some("SEPLAG"));
    assert!(OrganizationRepo::exists(&pool, child.id).await.unwrap());
    assert!(!OrganizationRepo::exists(&pool, 9_999).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn organization_parent_must_exist(pool: SqlitePool) {
    let result = OrganizationRepo::create(&pool, &new_org("Órfão", "ORF", Some(9_999))).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_organization_partially(pool: SqlitePool) {
    let parent = OrganizationRepo::create(&pool, &new_org("Pai", "PAI", None)).await.unwrap();
    let org = OrganizationRepo::create(&pool, &new_org("Filho", "FIL", Some(parent.id)))
        .await
        .unwrap();

    // Absent fields stay unchanged.
    let updated = OrganizationRepo::update(
        &pool,
        org.id,
        &UpdateOrganization {
            name: Some("Filho Renomeado".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Filho Renomeado");
    assert_eq!(updated.abbreviation, "FIL");
    assert_eq!(updated.parent_id, Some(parent.id));

    // An explicit null clears the parent.
    let cleared = OrganizationRepo::update(
        &pool,
        org.id,
        &UpdateOrganization {
            parent_id: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.parent_id, None);
    assert_eq!(cleared.parent_name, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_organization_returns_none(pool: SqlitePool) {
    let result = OrganizationRepo::update(&pool, 9_999, &UpdateOrganization::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn update_organization_deserializes_presence() {
    let absent: UpdateOrganization = serde_json::from_str(r#"{"nome": "X"}"#).unwrap();
    assert_eq!(absent.parent_id, None);

    let null: UpdateOrganization =
        serde_json::from_str(r#"{"orgao_superior_id": null}"#).unwrap();
    assert_eq!(null.parent_id, Some(None));

    let value: UpdateOrganization = serde_json::from_str(r#"{"orgao_superior_id": 3}"#).unwrap();
    assert_eq!(value.parent_id, Some(Some(3)));
}

// -- Users -------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_list_users(pool: SqlitePool) {
    let profile = profile_id(&pool, "Avaliador do Órgão").await;
    let org = OrganizationRepo::create(&pool, &new_org("Secretaria X", "SX", None))
        .await
        .unwrap();

    let user = UserRepo::create(&pool, &new_user("fulano@sx.mt.gov.br", profile, Some(org.id)))
        .await
        .unwrap();
    assert!(user.is_active);
    assert!(user.last_access_at.is_none());

    let users = UserRepo::list(&pool).await.unwrap();
    let listed = users.iter().find(|u| u.id == user.id).unwrap();
    assert_eq!(listed.profile_name.as_deref(), Some("Avaliador do Órgão"));
    assert_eq!(listed.organization_abbreviation.as_deref(), Some("SX"));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_email_is_unique_violation(pool: SqlitePool) {
    let profile = profile_id(&pool, "Visualizador").await;
    UserRepo::create(&pool, &new_user("dup@cge.mt.gov.br", profile, None))
        .await
        .unwrap();

    let err = UserRepo::create(&pool, &new_user("dup@cge.mt.gov.br", profile, None))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.is_unique_violation());
}

#[sqlx::test(migrations = "./migrations")]
async fn partial_user_update_and_deactivate(pool: SqlitePool) {
    let profile = profile_id(&pool, "Visualizador").await;
    let other_profile = profile_id(&pool, "Consultor Externo").await;
    let org = OrganizationRepo::list(&pool).await.unwrap()[0].id;
    let user = UserRepo::create(&pool, &new_user("ciclano@cge.mt.gov.br", profile, Some(org)))
        .await
        .unwrap();

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            profile_id: Some(other_profile),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.profile_id, Some(other_profile));
    assert_eq!(updated.organization_id, Some(org));
    assert_eq!(updated.name, "Fulano de Tal");

    let cleared = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            organization_id: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.organization_id, None);

    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!reloaded.is_active);
    assert!(!UserRepo::deactivate(&pool, 9_999).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn password_and_last_access(pool: SqlitePool) {
    let admin = UserRepo::find_by_email(&pool, "admin@cge.mt.gov.br")
        .await
        .unwrap()
        .unwrap();

    assert!(UserRepo::set_password_hash(&pool, admin.id, "$argon2id$new").await.unwrap());
    UserRepo::touch_last_access(&pool, admin.id).await.unwrap();

    let reloaded = UserRepo::find_by_id(&pool, admin.id).await.unwrap().unwrap();
    assert_eq!(reloaded.password_hash.as_deref(), Some("$argon2id$new"));
    assert!(reloaded.last_access_at.is_some());
    assert!(UserRepo::list_without_password(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn email_lookup_is_exact(pool: SqlitePool) {
    let found = UserRepo::find_by_email(&pool, "ADMIN@cge.mt.gov.br").await.unwrap();
    assert!(found.is_none());
}
