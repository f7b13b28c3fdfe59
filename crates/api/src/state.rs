use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::MaturityService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: prisma_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Certification and reporting engine over the shared activity catalog.
    pub maturity: Arc<MaturityService>,
}
