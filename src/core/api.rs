//! HTTP + WebSocket API for Minesight
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /tick - Feed one observation, returns the render model
//! - GET /state - Current render model
//! - GET /suggestions - Ranked and exclusion suggestions
//! - GET /stats - Popup stats
//! - GET|PUT /settings - Display settings
//! - PUT /recovery/goal - Change recovery gem goal
//! - POST /recovery/calculate - One-off recovery bet sizing
//! - POST /reset - Reset session or analysis
//! - WS /ws - Live render models; inbound text frames are observations

use axum::{
    extract::{State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

use crate::core::recovery::split_warning;
use crate::core::{RecoveryCalculator, RoundTracker};
use crate::types::{
    ExclusionAdvice, Observation, PopupStats, RecoveryPlan, RenderModel, Settings, SuggestionSummary,
};

/// App state
pub struct AppState {
    pub tracker: RwLock<RoundTracker>,
    pub update_tx: broadcast::Sender<RenderModel>,
}

/// Health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub phase: String,
    pub ticks: u64,
}

/// Both suggestion panels
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub ranked: SuggestionSummary,
    pub exclusion: ExclusionAdvice,
}

/// Gem goal request / response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GemGoalBody {
    pub gem_goal: u32,
}

/// One-off recovery calculation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRequest {
    pub cumulative_loss: f64,
    pub mine_count: u32,
    pub gem_goal: u32,
    #[serde(default)]
    pub bankroll: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResponse {
    #[serde(flatten)]
    pub plan: RecoveryPlan,
    pub expected_win: f64,
    pub split_warning: Option<String>,
}

/// What `POST /reset` clears
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetScope {
    #[default]
    Session,
    Analysis,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub scope: ResetScope,
}

/// Create the API router around a tracker
pub fn create_router(tracker: RoundTracker) -> Router {
    let (tx, _) = broadcast::channel(100);
    let state = Arc::new(AppState {
        tracker: RwLock::new(tracker),
        update_tx: tx,
    });

    Router::new()
        .route("/health", get(health))
        .route("/tick", post(tick))
        .route("/state", get(current_state))
        .route("/suggestions", get(suggestions))
        .route("/stats", get(stats))
        .route("/settings", get(get_settings).put(put_settings))
        .route("/recovery/goal", put(set_gem_goal))
        .route("/recovery/calculate", post(calculate_recovery))
        .route("/reset", post(reset))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let tracker = state.tracker.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        phase: tracker.phase().to_string(),
        ticks: tracker.tick_count(),
    })
}

/// Run a tracker mutation on the blocking pool
///
/// Mutations may save through the repository, which does file I/O.
async fn with_tracker<T, F>(state: &Arc<AppState>, f: F) -> Result<T, StatusCode>
where
    T: Send + 'static,
    F: FnOnce(&mut RoundTracker) -> T + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || {
        let mut tracker = state.tracker.blocking_write();
        f(&mut tracker)
    })
    .await
    .map_err(|err| {
        error!(error = %err, "tracker task failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Apply one observation and broadcast the result
async fn apply_tick(state: &Arc<AppState>, obs: Observation) -> Result<RenderModel, StatusCode> {
    let model = with_tracker(state, move |tracker| tracker.on_tick(&obs)).await?;
    let _ = state.update_tx.send(model.clone());
    Ok(model)
}

/// Feed one observation
async fn tick(
    State(state): State<Arc<AppState>>,
    Json(obs): Json<Observation>,
) -> Result<Json<RenderModel>, StatusCode> {
    apply_tick(&state, obs).await.map(Json)
}

/// Current render model without ticking
async fn current_state(State(state): State<Arc<AppState>>) -> Json<RenderModel> {
    Json(state.tracker.read().await.render())
}

async fn suggestions(State(state): State<Arc<AppState>>) -> Json<SuggestionsResponse> {
    let tracker = state.tracker.read().await;
    Json(SuggestionsResponse {
        ranked: tracker.suggestions().clone(),
        exclusion: tracker.engine().exclusion_advice(tracker.store(), &tracker.context().history),
    })
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<PopupStats> {
    Json(state.tracker.read().await.popup_stats())
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.tracker.read().await.settings().clone())
}

async fn put_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, StatusCode> {
    with_tracker(&state, move |tracker| {
        tracker.set_settings(settings);
        tracker.settings().clone()
    })
    .await
    .map(Json)
}

/// Change gem goal, responds with the clamped value
async fn set_gem_goal(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GemGoalBody>,
) -> Result<Json<GemGoalBody>, StatusCode> {
    let gem_goal = with_tracker(&state, move |tracker| tracker.set_gem_goal(body.gem_goal)).await?;
    Ok(Json(GemGoalBody { gem_goal }))
}

/// Recovery sizing without touching the session
async fn calculate_recovery(
    Json(req): Json<RecoveryRequest>,
) -> Result<Json<RecoveryResponse>, StatusCode> {
    if !req.cumulative_loss.is_finite() || req.cumulative_loss < 0.0 || !req.bankroll.is_finite() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let plan = RecoveryCalculator::new().compute(req.cumulative_loss, req.mine_count, req.gem_goal, req.bankroll);
    Ok(Json(RecoveryResponse {
        plan,
        expected_win: plan.expected_win(),
        split_warning: split_warning(&plan),
    }))
}

/// Reset session counters, or everything learned
async fn reset(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ResetRequest>>,
) -> Result<Json<RenderModel>, StatusCode> {
    let scope = body.map(|Json(req)| req.scope).unwrap_or_default();
    let model = with_tracker(&state, move |tracker| {
        match scope {
            ResetScope::Session => tracker.reset_session(),
            ResetScope::Analysis => tracker.reset_analysis(),
        }
        tracker.render()
    })
    .await?;
    let _ = state.update_tx.send(model.clone());
    Ok(Json(model))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = state.update_tx.subscribe();
    ws.on_upgrade(move |socket| handle_websocket(socket, state, rx))
}

/// Forward broadcasts out, treat inbound text frames as observations
async fn handle_websocket(socket: WebSocket, state: Arc<AppState>, mut rx: broadcast::Receiver<RenderModel>) {
    let (mut sender, mut receiver) = socket.split();

    let mut forward = tokio::spawn(async move {
        while let Ok(model) = rx.recv().await {
            let json = serde_json::to_string(&model).unwrap_or_default();
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let inbound_state = state.clone();
    let mut inbound = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => match serde_json::from_str::<Observation>(&text) {
                    Ok(obs) => {
                        if apply_tick(&inbound_state, obs).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(error = %err, "ignoring malformed observation frame"),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut forward => inbound.abort(),
        _ = &mut inbound => forward.abort(),
    }
    debug!("websocket closed");
}

/// Run the API server
pub async fn run_server(addr: &str, tracker: RoundTracker) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(tracker);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "minesight API listening");
    println!("💎 Minesight API running on {}", addr);
    println!("  POST /tick                - Feed one observation");
    println!("  GET  /state               - Current render model");
    println!("  GET  /suggestions         - Ranked + exclusion suggestions");
    println!("  GET  /stats               - Popup stats");
    println!("  GET  /settings            - Display settings (PUT to change)");
    println!("  PUT  /recovery/goal       - Set recovery gem goal");
    println!("  POST /recovery/calculate  - One-off recovery sizing");
    println!("  POST /reset               - Reset session or analysis");
    println!("  WS   /ws                  - Live updates");
    println!("  GET  /health              - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
