//! Route definitions for `/orgaos`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::organizations;
use crate::state::AppState;

/// Routes mounted at `/orgaos`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create (gerenciar_orgaos)
/// PUT    /{id}     -> update (gerenciar_orgaos)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(organizations::list).post(organizations::create))
        .route("/{id}", put(organizations::update))
}
