//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use recover_core::{today_local, DashboardSummary};

/// GET /api/dashboard - Headline totals, progress and status counts
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardSummary>, AppError> {
    let today = today_local();
    let summary = state
        .tracker
        .with_store(|store| DashboardSummary::compute(store, today))?;
    Ok(Json(summary))
}
