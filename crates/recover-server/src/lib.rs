//! RecoverPro Web Server
//!
//! Axum-based REST API over the shared tracker state.
//!
//! Security features:
//! - Restrictive CORS policy (same-origin unless origins are configured)
//! - Security headers (nosniff, frame denial, CSP)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use recover_core::{ClassifierBackend, ClassifierClient, Tracker};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub tracker: Tracker,
    pub config: ServerConfig,
}

/// Success response for mutations
///
/// `applied` is false when the target record did not exist.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub applied: bool,
}

/// Create the application router
pub fn create_router(tracker: Tracker, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        tracker,
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/classifier", get(handlers::classifier_info))
        // Commitment ledger
        .route(
            "/commitments",
            get(handlers::list_commitments).post(handlers::add_commitment),
        )
        .route("/commitments/today", get(handlers::due_today))
        .route(
            "/commitments/:id",
            patch(handlers::update_commitment).delete(handlers::delete_commitment),
        )
        .route("/commitments/:id/classify", post(handlers::classify_commitment))
        // Year-wise outstanding
        .route("/yearly", get(handlers::list_yearly))
        .route("/yearly/summary", get(handlers::yearly_summary))
        .route("/yearly/:id", patch(handlers::update_yearly))
        // Dashboard
        .route("/dashboard", get(handlers::dashboard));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve a built UI if a directory is provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with the classifier configured from the environment
pub async fn serve(
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let classifier = ClassifierClient::from_env();
    check_classifier(&classifier).await;

    let app = create_router(Tracker::new(classifier), static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log classifier configuration and reachability
async fn check_classifier(client: &ClassifierClient) {
    if !client.is_configured() {
        info!("ℹ️  Classifier not configured (set GEMINI_API_KEY to enable transcript analysis)");
        return;
    }

    if client.health_check().await {
        info!(
            "✅ Classifier connected: {} ({}, model: {})",
            client.backend_name(),
            client.host(),
            client.model()
        );
    } else {
        warn!(
            "⚠️  Classifier configured but not responding: {} (model: {})",
            client.host(),
            client.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}
