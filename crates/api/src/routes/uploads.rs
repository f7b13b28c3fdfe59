use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// `POST /upload`. Stored files are served by the root router under
/// `/uploads`.
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(uploads::upload))
}
