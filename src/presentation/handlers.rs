// HTTP request handlers
use crate::application::dashboard_service::SectionView;
use crate::domain::charts::ChartSpec;
use crate::domain::layout::DragEvent;
use crate::domain::section::{SectionId, SectionKind, Timeframe};
use crate::domain::theme::{Theme, ThemeName};
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{
    HTML, SVG, accepts_brotli, encoded_response, json_response,
};
use crate::infrastructure::page::render_page;
use crate::infrastructure::svg::render_svg;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RetryQuery {
    pub then: Option<String>,
}

#[derive(Deserialize)]
pub struct ThemeQuery {
    pub theme: Option<String>,
}

#[derive(Serialize)]
struct SectionResponse {
    section: SectionView,
    charts: Vec<String>,
}

fn section_kind(id: &str) -> Result<SectionKind, StatusCode> {
    SectionKind::from_id(&SectionId::new(id)).ok_or(StatusCode::NOT_FOUND)
}

fn into_response(result: Result<Response, StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Page load: resets the layout and reloads every section
pub async fn page_load(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let model = state.dashboard.page_load().await;
    into_response(encoded_response(render_page(&model).into_bytes(), HTML, accepts_brotli(&headers)).await)
}

/// Re-render the current page without touching layout or data
pub async fn dashboard_page(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let model = state.dashboard.page().await;
    into_response(encoded_response(render_page(&model).into_bytes(), HTML, accepts_brotli(&headers)).await)
}

pub async fn get_layout(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.dashboard.layout_view().await;
    into_response(json_response(&view, accepts_brotli(&headers)).await)
}

/// Apply an ordered batch of drag events
pub async fn post_layout_events(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(events): Json<Vec<DragEvent>>,
) -> impl IntoResponse {
    tracing::debug!(count = events.len(), "applying drag events");
    let result = state.dashboard.apply_events(events).await;
    into_response(json_response(&result, accepts_brotli(&headers)).await)
}

pub async fn get_section(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let kind = match section_kind(&id) {
        Ok(kind) => kind,
        Err(status) => return status.into_response(),
    };
    let theme = Theme::get(state.dashboard.theme());
    let response = SectionResponse {
        section: state.dashboard.section(kind).await,
        charts: state
            .dashboard
            .section_drawings(kind)
            .await
            .iter()
            .map(|d| render_svg(d, theme))
            .collect(),
    };
    into_response(json_response(&response, accepts_brotli(&headers)).await)
}

/// Re-fetch one section. `?then=page` waits for it and returns to the page.
pub async fn retry_section(
    Path(id): Path<String>,
    Query(query): Query<RetryQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let kind = match section_kind(&id) {
        Ok(kind) => kind,
        Err(status) => return status.into_response(),
    };
    let settled = state.dashboard.retry(kind).await;
    if query.then.as_deref() == Some("page") {
        if !settled.wait().await {
            tracing::debug!(section = %id, "retry did not settle");
        }
        return Redirect::to("/dashboard").into_response();
    }
    let view = state.dashboard.section(kind).await;
    match json_response(&view, accepts_brotli(&headers)).await {
        Ok(mut response) => {
            *response.status_mut() = StatusCode::ACCEPTED;
            response
        }
        Err(status) => status.into_response(),
    }
}

pub async fn set_timeframe(Path(key): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let Some(timeframe) = Timeframe::parse(&key) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    state.dashboard.set_timeframe(timeframe).await;
    Redirect::to("/dashboard").into_response()
}

/// Render any tagged chart spec to SVG
pub async fn render_chart(
    Query(query): Query<ThemeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(spec): Json<ChartSpec>,
) -> impl IntoResponse {
    let theme_name = query
        .theme
        .as_deref()
        .and_then(ThemeName::parse)
        .unwrap_or(state.dashboard.theme());
    let spec = spec.normalized();
    let drawing = spec.render();
    tracing::debug!(kind = spec.kind(), shapes = drawing.shapes.len(), "rendered chart");
    let svg = render_svg(&drawing, Theme::get(theme_name));
    into_response(encoded_response(svg.into_bytes(), SVG, accepts_brotli(&headers)).await)
}

/// Progressive dashboard stream
pub async fn stream_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rx = state.streaming_service.stream_dashboard().await;
    stream_from_receiver(rx, accepts_brotli(&headers)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_lookup() {
        assert_eq!(section_kind("radar"), Ok(SectionKind::Radar));
        assert_eq!(section_kind("nope"), Err(StatusCode::NOT_FOUND));
    }
}
