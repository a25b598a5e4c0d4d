//! Health and classifier handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use recover_core::{ClassifierBackend, ClassifierInfo};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub classifier: &'static str,
}

/// GET /api/health - Liveness check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        classifier: state.tracker.classifier().backend_name(),
    })
}

/// Classifier configuration plus a live reachability probe
#[derive(Serialize)]
pub struct ClassifierStatus {
    #[serde(flatten)]
    pub info: ClassifierInfo,
    pub healthy: bool,
}

/// GET /api/classifier - Which backend answers classification requests
pub async fn classifier_info(State(state): State<Arc<AppState>>) -> Json<ClassifierStatus> {
    let client = state.tracker.classifier();
    Json(ClassifierStatus {
        info: client.info(),
        healthy: client.health_check().await,
    })
}
