//! Route definitions for `/usuarios`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/usuarios`. All require `gerenciar_usuarios`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create
/// PUT    /{id}     -> update
/// DELETE /{id}     -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{id}", put(users::update).delete(users::deactivate))
}
