// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_repository::HttpAnalyticsRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_page, get_layout, get_section, health_check, page_load, post_layout_events,
    render_chart, retry_section, set_timeframe, stream_dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpAnalyticsRepository::new(
        config.endpoint_urls(),
        config.api.timeout_secs,
    )?);

    // Create services (application layer)
    let dashboard = Arc::new(DashboardService::new(repository, config.theme));
    let streaming_service = StreamingDashboardService::new(dashboard.clone());

    // Create application state
    let state = Arc::new(AppState {
        dashboard,
        streaming_service,
    });

    // Build router (presentation layer)
    // Responses are compressed by our own builders, so no CompressionLayer here.
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/", get(page_load))
        .route("/dashboard", get(dashboard_page))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/layout", get(get_layout))
        .route("/layout/events", post(post_layout_events))
        .route("/sections/:id", get(get_section))
        .route("/sections/:id/retry", post(retry_section))
        .route("/timeframe/:key", post(set_timeframe))
        .route("/charts/render", post(render_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!(%addr, api = %config.api.base_url, "starting misinfo-dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
