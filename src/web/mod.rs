mod assets;

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{info, warn};

use crate::{
    config::FarmConfig,
    error::FarmError,
    farm::ClickOutcome,
    runtime::{FarmClient, FarmRuntime},
    snapshot::FarmSnapshot,
};

struct AppState {
    farm: FarmClient,
}

pub struct WebServerConfig {
    pub farm: FarmConfig,
    pub host: String,
    pub port: u16,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig { farm, host, port } = config;

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let handle = FarmRuntime::mount(&farm);
    let state = Arc::new(AppState {
        farm: handle.client(),
    });

    info!(farm = %farm.name, "Farmo UI live at http://{addr} (Ctrl+C to stop)");

    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    handle.unmount().await;
    served.context("web server failed")?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/state", get(latest_state))
        .route("/api/plots/:x/:y/click", post(click_plot))
        .route("/api/events", get(stream_events))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
    }
    info!("shutting down web UI");
}

struct ApiError(FarmError);

impl From<FarmError> for ApiError {
    fn from(value: FarmError) -> Self {
        ApiError(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            FarmError::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
            FarmError::Unmounted => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        assets::APP_JS,
    )
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Result<Json<FarmSnapshot>, ApiError> {
    Ok(Json(state.farm.snapshot().await?))
}

#[derive(Serialize)]
struct ClickResponse {
    outcome: ClickOutcome,
    snapshot: FarmSnapshot,
}

async fn click_plot(
    State(state): State<Arc<AppState>>,
    Path((x, y)): Path<(u32, u32)>,
) -> Result<Json<ClickResponse>, ApiError> {
    let (outcome, snapshot) = state.farm.click_with_snapshot(x, y).await?;
    Ok(Json(ClickResponse { outcome, snapshot }))
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.farm.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(snapshot) => serde_json::to_string(&snapshot)
            .ok()
            .map(|payload| Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
