pub mod assessments;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod organizations;
pub mod profiles;
pub mod reports;
pub mod uploads;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/me                             current user
/// /auth/alterar-senha                  change own password
///
/// /usuarios                            list, create (gerenciar_usuarios)
/// /usuarios/{id}                       update, deactivate
///
/// /perfis                              list profiles
///
/// /orgaos                              list, create (create: gerenciar_orgaos)
/// /orgaos/{id}                         update (gerenciar_orgaos)
///
/// /avaliacoes                          list own, create
/// /avaliacoes/{id}                     get
/// /avaliacoes/{id}/respostas           list, upsert one
/// /avaliacoes/{id}/finalizar           finalize (POST)
///
/// /upload                              evidence upload (multipart)
///
/// /relatorio-individual                caller's organization report
/// /relatorio-individual/exportar       export as pdf, xlsx or csv (POST)
/// /admin/relatorios                    ranking (gerar_relatorios)
/// /admin/relatorios/exportar           export (visualizar_relatorios_gerais)
///
/// /dashboard                           own counts and recent assessments
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/usuarios", users::router())
        .nest("/perfis", profiles::router())
        .nest("/orgaos", organizations::router())
        .nest("/avaliacoes", assessments::router())
        .merge(uploads::router())
        .merge(reports::router())
        .merge(dashboard::router())
}
