//! Integration tests for user, profile and organization management.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_as, get, get_as, post_json_as, put_json_as, ADMIN_EMAIL};
use prisma_db::repositories::UserRepo;
use serde_json::json;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_and_lists_users(pool: SqlitePool) {
    let profile_id = common::profile_id(&pool, "Avaliador do Órgão").await;
    let sefaz = common::organization_id(&pool, "SEFAZ").await;
    let app = common::build_test_app(pool).await;

    let body = json!({
        "email": "avaliador@sefaz.mt.gov.br",
        "nome": "Avaliadora Sefaz",
        "perfil_id": profile_id,
        "orgao_id": sefaz,
        "senha": "segredo1",
    });
    let response = post_json_as(app.clone(), "/api/usuarios", ADMIN_EMAIL, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["data"]["email"], "avaliador@sefaz.mt.gov.br");
    assert_eq!(created["data"]["perfil"], "Avaliador do Órgão");
    assert_eq!(created["data"]["orgao_sigla"], "SEFAZ");
    assert_eq!(created["data"]["ativo"], true);

    let response = get_as(app, "/api/usuarios", ADMIN_EMAIL).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_user_validation(pool: SqlitePool) {
    let profile_id = common::profile_id(&pool, "Visualizador").await;
    let app = common::build_test_app(pool).await;

    let bad_email = json!({
        "email": "sem-arroba",
        "nome": "X",
        "perfil_id": profile_id,
        "senha": "segredo1",
    });
    let response = post_json_as(app.clone(), "/api/usuarios", ADMIN_EMAIL, bad_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let short_password = json!({
        "email": "novo@ses.mt.gov.br",
        "nome": "Novo",
        "perfil_id": profile_id,
        "senha": "123",
    });
    let response = post_json_as(app.clone(), "/api/usuarios", ADMIN_EMAIL, short_password).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unknown_profile = json!({
        "email": "novo@ses.mt.gov.br",
        "nome": "Novo",
        "perfil_id": 9999,
        "senha": "segredo1",
    });
    let response = post_json_as(app, "/api/usuarios", ADMIN_EMAIL, unknown_profile).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_email_conflicts(pool: SqlitePool) {
    let profile_id = common::profile_id(&pool, "Visualizador").await;
    let app = common::build_test_app(pool).await;

    let body = json!({
        "email": ADMIN_EMAIL,
        "nome": "Outro admin",
        "perfil_id": profile_id,
        "senha": "segredo1",
    });
    let response = post_json_as(app, "/api/usuarios", ADMIN_EMAIL, body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_management_requires_permission(pool: SqlitePool) {
    common::create_user(&pool, "avaliador@pge.mt.gov.br", "Avaliador do Órgão", Some("PGE")).await;
    let app = common::build_test_app(pool).await;

    let response = get_as(app.clone(), "/api/usuarios", "avaliador@pge.mt.gov.br").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    let response = get(app, "/api/usuarios").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_partial_update_and_unlink_organization(pool: SqlitePool) {
    let user = common::create_user(
        &pool,
        "parcial@seduc.mt.gov.br",
        "Visualizador",
        Some("SEDUC"),
    )
    .await;
    let consultant = common::profile_id(&pool, "Consultor Externo").await;
    let app = common::build_test_app(pool.clone()).await;
    let uri = format!("/api/usuarios/{}", user.id);

    let response = put_json_as(
        app.clone(),
        &uri,
        ADMIN_EMAIL,
        json!({ "perfil_id": consultant }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["perfil"], "Consultor Externo");
    assert_eq!(json["data"]["orgao_sigla"], "SEDUC");
    assert_eq!(json["data"]["nome"], user.name);

    let response = put_json_as(app.clone(), &uri, ADMIN_EMAIL, json!({ "orgao_id": null })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["orgao_id"].is_null());

    let response = put_json_as(
        app,
        "/api/usuarios/9999",
        ADMIN_EMAIL,
        json!({ "nome": "X" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deactivate_user(pool: SqlitePool) {
    let user = common::create_user(&pool, "sai@sesp.mt.gov.br", "Visualizador", Some("SESP")).await;
    let admin = UserRepo::find_by_email(&pool, ADMIN_EMAIL).await.unwrap().unwrap();
    let app = common::build_test_app(pool.clone()).await;

    let response = delete_as(app.clone(), &format!("/api/usuarios/{}", user.id), ADMIN_EMAIL).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!stored.is_active);

    let response = delete_as(
        app.clone(),
        &format!("/api/usuarios/{}", admin.id),
        ADMIN_EMAIL,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_as(app, "/api/usuarios/9999", ADMIN_EMAIL).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_profiles_with_permissions(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;

    let response = get(app, "/api/perfis").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let profiles = json["data"].as_array().unwrap();
    assert_eq!(profiles.len(), 4);
    assert_eq!(profiles[0]["nome"], "Administrador CGE");
    assert_eq!(profiles[0]["permissoes"]["exportar_dados"], true);
    assert_eq!(profiles[3]["nome"], "Visualizador");
    assert_eq!(profiles[3]["permissoes"]["criar_avaliacoes"], false);
}

// ---------------------------------------------------------------------------
// Organizations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_organizations_is_public(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;

    let response = get(app, "/api/orgaos").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 7);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_organization_with_parent(pool: SqlitePool) {
    let sefaz = common::organization_id(&pool, "SEFAZ").await;
    let app = common::build_test_app(pool).await;

    let body = json!({
        "nome": "Secretaria Adjunta da Receita",
        "sigla": "SARP",
        "orgao_superior_id": sefaz,
    });
    let response = post_json_as(app.clone(), "/api/orgaos", ADMIN_EMAIL, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["sigla"], "SARP");
    assert_eq!(json["data"]["orgao_superior_id"], sefaz);
    assert_eq!(json["data"]["orgao_superior_sigla"], "SEFAZ");

    let orphan = json!({ "nome": "Órfão", "orgao_superior_id": 9999 });
    let response = post_json_as(app.clone(), "/api/orgaos", ADMIN_EMAIL, orphan).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let blank = json!({ "nome": "  " });
    let response = post_json_as(app, "/api/orgaos", ADMIN_EMAIL, blank).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_organization_management_requires_permission(pool: SqlitePool) {
    common::create_user(&pool, "leitor@cge.mt.gov.br", "Visualizador", Some("CGE")).await;
    let app = common::build_test_app(pool).await;

    let body = json!({ "nome": "Novo Órgão", "sigla": "NOVO" });
    let response = post_json_as(app, "/api/orgaos", "leitor@cge.mt.gov.br", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_organization(pool: SqlitePool) {
    let ses = common::organization_id(&pool, "SES").await;
    let cge = common::organization_id(&pool, "CGE").await;
    let app = common::build_test_app(pool).await;
    let uri = format!("/api/orgaos/{ses}");

    let response = put_json_as(
        app.clone(),
        &uri,
        ADMIN_EMAIL,
        json!({ "orgao_superior_id": cge }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["orgao_superior_id"], cge);
    assert_eq!(json["data"]["sigla"], "SES");

    let response = put_json_as(
        app.clone(),
        &uri,
        ADMIN_EMAIL,
        json!({ "orgao_superior_id": ses }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_as(
        app.clone(),
        &uri,
        ADMIN_EMAIL,
        json!({ "orgao_superior_id": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["orgao_superior_id"].is_null());

    let response = put_json_as(
        app,
        "/api/orgaos/9999",
        ADMIN_EMAIL,
        json!({ "nome": "Nada" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
