//! Commitment ledger handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, SuccessResponse};
use recover_core::{
    due_today as priority_list, today_local, ClassifyOutcome, Commitment, CommitmentEdit,
};

/// A commitment plus whether its transcript is being classified right now
#[derive(Debug, Serialize)]
pub struct CommitmentView {
    #[serde(flatten)]
    pub commitment: Commitment,
    pub classifying: bool,
}

/// Request body for a single-field edit
#[derive(Debug, Deserialize)]
pub struct UpdateCommitmentRequest {
    pub field: String,
    pub value: String,
}

/// GET /api/commitments - The ledger, most recent first
pub async fn list_commitments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CommitmentView>>, AppError> {
    let views = state.tracker.inspect(|store, in_flight| {
        store
            .commitments()
            .iter()
            .map(|c| CommitmentView {
                classifying: in_flight.contains(&c.id),
                commitment: c.clone(),
            })
            .collect::<Vec<_>>()
    })?;
    Ok(Json(views))
}

/// POST /api/commitments - Add a blank PENDING commitment at the top
pub async fn add_commitment(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Commitment>, AppError> {
    let commitment = state
        .tracker
        .with_store_mut(|store| store.add_commitment().clone())?;
    Ok(Json(commitment))
}

/// PATCH /api/commitments/:id - Replace one field
pub async fn update_commitment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCommitmentRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let edit = CommitmentEdit::parse(&req.field, &req.value)
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    let applied = state
        .tracker
        .with_store_mut(|store| store.update_commitment(&id, edit))?;

    Ok(Json(SuccessResponse {
        success: true,
        applied,
    }))
}

/// DELETE /api/commitments/:id - Remove a commitment (idempotent)
pub async fn delete_commitment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let applied = state
        .tracker
        .with_store_mut(|store| store.delete_commitment(&id))?;

    Ok(Json(SuccessResponse {
        success: true,
        applied,
    }))
}

/// POST /api/commitments/:id/classify - Classify the transcript and merge the result
///
/// A blank transcript returns the `skipped` outcome without calling the
/// classifier. The merged record is returned alongside the reasoning.
pub async fn classify_commitment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ClassifyOutcome>, AppError> {
    match state.tracker.classify_commitment(&id).await? {
        ClassifyOutcome::NotFound => Err(AppError::not_found("Commitment not found")),
        ClassifyOutcome::AlreadyInFlight => Err(AppError::conflict(
            "Classification already in progress for this commitment",
        )),
        outcome => Ok(Json(outcome)),
    }
}

/// GET /api/commitments/today - Read-only list of today's follow-ups
pub async fn due_today(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Commitment>>, AppError> {
    let today = today_local();
    let rows = state.tracker.with_store(|store| {
        priority_list(store.commitments(), today)
            .iter()
            .cloned()
            .collect::<Vec<_>>()
    })?;
    Ok(Json(rows))
}
