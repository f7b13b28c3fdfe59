//! Handler for the caller's dashboard.

use axum::extract::State;
use axum::Json;
use prisma_core::maturity::{STATUS_FINALIZED, STATUS_IN_PROGRESS};
use prisma_db::models::assessment::Assessment;
use prisma_db::repositories::AssessmentRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many recent assessments the dashboard lists.
const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Default, Serialize)]
pub struct StatusTotals {
    pub em_andamento: i64,
    pub finalizada: i64,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    #[serde(rename = "estatisticas")]
    pub stats: StatusTotals,
    #[serde(rename = "avaliacoes_recentes")]
    pub recent: Vec<Assessment>,
    #[serde(rename = "total_avaliacoes")]
    pub total: i64,
}

/// GET /api/dashboard
///
/// The caller's own assessment counts and most recent assessments.
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let counts = AssessmentRepo::count_by_status_for_creator(&state.pool, &user.email).await?;

    let mut stats = StatusTotals::default();
    for c in &counts {
        match c.status.as_str() {
            STATUS_IN_PROGRESS => stats.em_andamento = c.count,
            STATUS_FINALIZED => stats.finalizada = c.count,
            other => tracing::warn!(status = other, "Unknown assessment status"),
        }
    }

    let recent = AssessmentRepo::recent_by_creator(&state.pool, &user.email, RECENT_LIMIT).await?;
    Ok(Json(DataResponse {
        data: Dashboard {
            total: stats.em_andamento + stats.finalizada,
            stats,
            recent,
        },
    }))
}
