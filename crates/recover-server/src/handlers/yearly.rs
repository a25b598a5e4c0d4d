//! Year-wise outstanding handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, SuccessResponse};
use recover_core::{Quarter, YearlyOutstanding, YearlySummary};

/// Request body for editing one quarter
#[derive(Debug, Deserialize)]
pub struct UpdateYearlyRequest {
    pub quarter: String,
    /// Raw text; non-numeric values are kept and count as zero in totals
    pub value: String,
}

/// GET /api/yearly - The nine fiscal-year rows, newest first
pub async fn list_yearly(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<YearlyOutstanding>>, AppError> {
    let rows = state.tracker.with_store(|store| store.yearly().to_vec())?;
    Ok(Json(rows))
}

/// PATCH /api/yearly/:id - Replace one quarter's value
pub async fn update_yearly(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateYearlyRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let quarter: Quarter = req
        .quarter
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;

    let applied = state
        .tracker
        .with_store_mut(|store| store.update_yearly(&id, quarter, req.value))?;

    Ok(Json(SuccessResponse {
        success: true,
        applied,
    }))
}

/// GET /api/yearly/summary - Row totals, grand total and progress
pub async fn yearly_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<YearlySummary>, AppError> {
    let summary = state
        .tracker
        .with_store(|store| YearlySummary::compute(store.yearly()))?;
    Ok(Json(summary))
}
