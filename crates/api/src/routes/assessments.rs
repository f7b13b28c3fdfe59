//! Route definitions for `/avaliacoes`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assessments;
use crate::state::AppState;

/// Routes mounted at `/avaliacoes`.
///
/// ```text
/// GET    /                  -> list (own)
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// GET    /{id}/respostas    -> list_responses
/// POST   /{id}/respostas    -> upsert_response
/// POST   /{id}/finalizar    -> finalize
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assessments::list).post(assessments::create))
        .route("/{id}", get(assessments::get_by_id))
        .route(
            "/{id}/respostas",
            get(assessments::list_responses).post(assessments::upsert_response),
        )
        .route("/{id}/finalizar", post(assessments::finalize))
}
