use std::sync::{Mutex as StdMutex, PoisonError};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::client::SearchBackend;
use crate::data_models::{NO_RESULTS_MESSAGE, ProductResult, SearchQuery, SearchResponse};
use crate::error::{PanelError, SearchError};
use crate::render::{PanelView, render};

/// The UI element handles a panel paints into.
pub trait Surface: Send + Sync {
    /// Replace everything the panel shows with `view`.
    fn paint(&self, view: &PanelView);
    /// Blocking user-facing warning.
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    Products {
        products: Vec<ProductResult>,
        best_product: Option<ProductResult>,
    },
    /// Nothing matched; the text goes in the placeholder row.
    Empty { message: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading {
        query: SearchQuery,
    },
    ResultsShown(ResultSet),
    ErrorShown {
        message: String,
    },
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading { .. } => "loading",
            UiState::ResultsShown(_) => "results",
            UiState::ErrorShown { .. } => "error",
        }
    }

    /// Terminal state for a decoded response, plus the alert it raises.
    pub fn from_response(response: SearchResponse) -> (UiState, Option<PanelError>) {
        match response {
            SearchResponse::Error(error) => {
                let alert = PanelError::Application(error.clone());
                (UiState::ErrorShown { message: error }, Some(alert))
            }
            SearchResponse::Message(message) => {
                (UiState::ResultsShown(ResultSet::Empty { message }), None)
            }
            SearchResponse::Products { products, .. } | SearchResponse::List(products)
                if products.is_empty() =>
            {
                let message = NO_RESULTS_MESSAGE.to_string();
                (UiState::ResultsShown(ResultSet::Empty { message }), None)
            }
            SearchResponse::Products {
                products,
                best_product,
            } => (
                UiState::ResultsShown(ResultSet::Products {
                    products,
                    best_product,
                }),
                None,
            ),
            SearchResponse::List(products) => (
                UiState::ResultsShown(ResultSet::Products {
                    products,
                    best_product: None,
                }),
                None,
            ),
        }
    }

    fn from_transport_error(error: SearchError) -> (UiState, Option<PanelError>) {
        let alert = PanelError::Transport(error);
        let state = UiState::ErrorShown {
            message: alert.to_string(),
        };
        (state, Some(alert))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing was sent.
    Rejected,
    /// The response (or failure) was rendered.
    Applied,
    /// A newer submission replaced this one before it finished.
    Superseded,
}

struct PanelInner {
    state: UiState,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

/// Runs one request/response cycle per submitted search and renders the result.
///
/// A non-empty submission made while another is loading cancels the older
/// request; any response that still arrives for it is dropped.
pub struct SearchPanel<B, S> {
    backend: B,
    surface: S,
    inner: Mutex<PanelInner>,
}

impl<B, S> SearchPanel<B, S>
where
    B: SearchBackend,
    S: Surface,
{
    pub fn new(backend: B, surface: S) -> Self {
        Self {
            backend,
            surface,
            inner: Mutex::new(PanelInner {
                state: UiState::Idle,
                generation: 0,
                in_flight: None,
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub async fn state(&self) -> UiState {
        self.inner.lock().await.state.clone()
    }

    pub async fn view(&self) -> PanelView {
        render(&self.inner.lock().await.state)
    }

    pub async fn submit_search(&self, raw_input: &str) -> SubmitOutcome {
        let Some(query) = SearchQuery::parse(raw_input) else {
            tracing::debug!("rejecting blank search input");
            self.surface.alert(&PanelError::EmptyQuery.to_string());
            return SubmitOutcome::Rejected;
        };

        let (generation, token) = self.begin(&query).await;

        let response = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(%query, generation, "search superseded while in flight");
                return SubmitOutcome::Superseded;
            }
            response = self.backend.search(&query) => response,
        };

        self.finish(generation, &query, response).await
    }

    async fn begin(&self, query: &SearchQuery) -> (u64, CancellationToken) {
        let mut inner = self.inner.lock().await;
        if let Some(previous) = inner.in_flight.take() {
            previous.cancel();
        }
        inner.generation += 1;
        let token = CancellationToken::new();
        inner.in_flight = Some(token.clone());
        inner.state = UiState::Loading {
            query: query.clone(),
        };
        self.surface.paint(&render(&inner.state));
        (inner.generation, token)
    }

    async fn finish(
        &self,
        generation: u64,
        query: &SearchQuery,
        response: Result<SearchResponse, SearchError>,
    ) -> SubmitOutcome {
        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            tracing::debug!(%query, generation, "discarding stale search response");
            return SubmitOutcome::Superseded;
        }
        inner.in_flight = None;

        let (state, alert) = match response {
            Ok(response) => UiState::from_response(response),
            Err(e) => {
                tracing::error!(%query, error = %e, "error fetching search results");
                UiState::from_transport_error(e)
            }
        };
        inner.state = state;
        self.surface.paint(&render(&inner.state));
        if let Some(alert) = alert {
            self.surface.alert(&alert.to_string());
        }
        SubmitOutcome::Applied
    }
}

/// Surface that keeps what it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    views: StdMutex<Vec<PanelView>>,
    alerts: StdMutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<PanelView> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_view(&self) -> Option<PanelView> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Surface for RecordingSurface {
    fn paint(&self, view: &PanelView) {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view.clone());
    }

    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

impl<T: Surface + ?Sized> Surface for std::sync::Arc<T> {
    fn paint(&self, view: &PanelView) {
        (**self).paint(view)
    }

    fn alert(&self, message: &str) {
        (**self).alert(message)
    }
}

#[test]
fn test_from_response_classifies_shapes() {
    let (state, alert) = UiState::from_response(SearchResponse::Error("db down".into()));
    assert_eq!(
        state,
        UiState::ErrorShown {
            message: "db down".into()
        }
    );
    assert_eq!(alert.unwrap().to_string(), "Error: db down");

    let (state, alert) = UiState::from_response(SearchResponse::List(vec![]));
    assert_eq!(
        state,
        UiState::ResultsShown(ResultSet::Empty {
            message: NO_RESULTS_MESSAGE.into()
        })
    );
    assert!(alert.is_none());

    let (state, _) = UiState::from_response(SearchResponse::Message("Keyword is not given".into()));
    assert_eq!(
        state,
        UiState::ResultsShown(ResultSet::Empty {
            message: "Keyword is not given".into()
        })
    );
}
