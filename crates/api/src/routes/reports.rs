//! Route definitions for the individual and consolidated reports.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Report routes, merged at the `/api` level.
///
/// ```text
/// GET    /relatorio-individual              -> individual
/// POST   /relatorio-individual/exportar     -> export_individual
/// GET    /admin/relatorios                  -> admin (gerar_relatorios)
/// POST   /admin/relatorios/exportar         -> export_admin (visualizar_relatorios_gerais)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/relatorio-individual", get(reports::individual))
        .route("/relatorio-individual/exportar", post(reports::export_individual))
        .route("/admin/relatorios", get(reports::admin))
        .route("/admin/relatorios/exportar", post(reports::export_admin))
}
