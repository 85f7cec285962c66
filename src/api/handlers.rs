use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;
use std::time::Instant;

use crate::client::HttpBackend;
use crate::panel::{RecordingSurface, SearchPanel, UiState};
use crate::render::{PanelView, render, to_html_string};

use super::AppState;
use super::models::{PanelFragment, SearchParams};
use super::page::SearchPage;

struct CycleResult {
    state: UiState,
    view: PanelView,
    alerts: Vec<String>,
}

/// One SearchPanel cycle for this request. A missing `query` parameter means
/// the user has not searched yet, so the panel stays idle.
async fn run_cycle(app: &AppState, query: Option<&str>) -> CycleResult {
    let Some(query) = query else {
        return CycleResult {
            state: UiState::Idle,
            view: render(&UiState::Idle),
            alerts: Vec::new(),
        };
    };

    let start = Instant::now();
    let backend = HttpBackend::new(app.client.clone(), app.endpoint.clone());
    let panel = SearchPanel::new(backend, RecordingSurface::new());
    let outcome = panel.submit_search(query).await;

    let state = panel.state().await;
    tracing::info!(
        ?outcome,
        state = state.label(),
        elapsed_ms = start.elapsed().as_millis(),
        "search cycle finished"
    );

    CycleResult {
        view: render(&state),
        state,
        alerts: panel.surface().alerts(),
    }
}

pub async fn page_handler(
    State(app): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let result = run_cycle(&app, params.query.as_deref()).await;
    let page = SearchPage {
        query: params.query.as_deref().unwrap_or("").trim(),
        alerts: &result.alerts,
        view: &result.view,
    };
    Html(to_html_string(&page))
}

pub async fn panel_handler(
    State(app): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<PanelFragment> {
    let result = run_cycle(&app, params.query.as_deref()).await;
    Json(PanelFragment {
        query: params.query,
        state: result.state.label(),
        alerts: result.alerts,
        html: result.view.to_html(),
    })
}
