use axum::routing::get;
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/perfis`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(profiles::list))
}
