//! HTTP server - dashboard page and JSON API over the session store

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::ledger::{LedgerView, SubmitOutcome};
use crate::scenario::{MetricMode, ScenarioInput};
use crate::session::{SessionId, SessionStore};

pub struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<DashboardError>() {
            Some(DashboardError::UnknownSession(_)) => StatusCode::NOT_FOUND,
            Some(DashboardError::InvalidMode(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = format!("Dashboard Error: {}", self.0);
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for ServerError where E: Into<anyhow::Error> {
    fn from(err: E) -> Self { Self(err.into()) }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub sessions: Arc<SessionStore>,
    pub start_local: String,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let sessions = Arc::new(SessionStore::new(config.max_sessions));
        Self {
            config: Arc::new(config),
            sessions,
            start_local: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    fn resolve_mode(&self, requested: Option<&str>) -> Result<MetricMode, DashboardError> {
        match requested {
            Some(mode) => mode.parse(),
            None => Ok(self.config.default_mode),
        }
    }
}

#[derive(Deserialize)]
struct ModeQuery {
    mode: Option<String>,
}

#[derive(Deserialize)]
struct CreateSessionRequest {
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Deserialize)]
struct SubmitRequest {
    trigger_count: u64,
    input: ScenarioInput,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(new_dashboard))
        .route("/health", get(|| async { "OK" }))
        .route("/sessions/{id}", get(dashboard))
        .route("/api/defaults", get(defaults))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}/scenarios", get(list_scenarios).post(submit_scenario))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: DashboardConfig) -> Result<()> {
    let addr = config.bind_addr();
    info!("Default metric mode: {}, session limit: {}", config.default_mode, config.max_sessions);
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🚀 RFID ROI dashboard listening at http://{}", addr);
    axum::serve(listener, app).await.context("Server terminated")?;

    Ok(())
}

async fn new_dashboard(
    State(state): State<AppState>,
    Query(query): Query<ModeQuery>,
) -> Result<Redirect, ServerError> {
    let mode = state.resolve_mode(query.mode.as_deref())?;
    let id = state.sessions.create(mode).await;
    Ok(Redirect::to(&format!("/sessions/{}", id)))
}

async fn dashboard(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Html<String>, ServerError> {
    let ledger = state.sessions.get(id).await?;
    let (view, clicks) = {
        let ledger = ledger.lock().await;
        (ledger.view(), ledger.len())
    };
    Ok(Html(crate::page::render(id, &view, clicks, &state.start_local)?))
}

async fn defaults() -> Json<ScenarioInput> {
    Json(ScenarioInput::default())
}

async fn create_session(
    State(state): State<AppState>,
    req: Option<Json<CreateSessionRequest>>,
) -> Result<impl IntoResponse, ServerError> {
    let requested = req.as_ref().and_then(|Json(r)| r.mode.as_deref());
    let mode = state.resolve_mode(requested)?;
    let id = state.sessions.create(mode).await;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "session_id": id, "mode": mode })),
    ))
}

async fn list_scenarios(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<LedgerView>, ServerError> {
    let ledger = state.sessions.get(id).await?;
    let view = ledger.lock().await.view();
    Ok(Json(view))
}

async fn submit_scenario(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitOutcome>, ServerError> {
    let ledger = state.sessions.get(id).await?;
    let outcome = ledger.lock().await.submit(req.trigger_count, &req.input);
    Ok(Json(outcome))
}
