#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use product_hunt::client::SearchBackend;
use product_hunt::data_models::{SearchQuery, SearchResponse};
use product_hunt::error::SearchError;

pub fn product_json(name: &str, website: &str, price: Value, reviews: Value, score: Value) -> Value {
    json!({
        "name": name,
        "website": { "name": website },
        "price": price,
        "reviews": reviews,
        "sentiment_score": score,
    })
}

/// The `"shoes"` scenario product: A / W1 / 10 / 5 / 0.8.
pub fn shoe_product() -> Value {
    product_json("A", "W1", json!(10), json!(5), json!(0.8))
}

pub fn decode(value: Value) -> SearchResponse {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// In-process backends
// =============================================================================

/// What a scripted backend hands back for every call.
#[derive(Clone)]
pub enum Reply {
    Response(SearchResponse),
    /// Fails the way an undecodable body does.
    MalformedBody(String),
}

pub struct ScriptedBackend {
    reply: Reply,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn responding(value: Value) -> Self {
        Self::new(Reply::Response(decode(value)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl SearchBackend for ScriptedBackend {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::MalformedBody(body) => Err(SearchError::Decode(
                serde_json::from_str::<Value>(body).unwrap_err(),
            )),
        }
    }
}

/// Holds the query `"slow"` until released; answers everything else at once.
pub struct GatedBackend {
    pub started: Notify,
    pub release: Notify,
    slow: SearchResponse,
    fast: SearchResponse,
}

impl GatedBackend {
    pub fn new(slow: SearchResponse, fast: SearchResponse) -> Self {
        Self {
            started: Notify::new(),
            release: Notify::new(),
            slow,
            fast,
        }
    }
}

impl SearchBackend for GatedBackend {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        if query.as_str() == "slow" {
            self.started.notify_one();
            self.release.notified().await;
            return Ok(self.slow.clone());
        }
        Ok(self.fast.clone())
    }
}

// =============================================================================
// Fake HTTP backend
// =============================================================================

#[derive(Clone)]
struct FakeReply {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

pub struct FakeServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeServer {
    /// Query parameters of every request received so far.
    pub fn seen(&self) -> Vec<HashMap<String, String>> {
        self.seen.lock().unwrap().clone()
    }
}

async fn respond(
    State(reply): State<FakeReply>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    reply.seen.lock().unwrap().push(params);
    (
        reply.status,
        [(CONTENT_TYPE, "application/json")],
        reply.body.clone(),
    )
}

/// Serves `body` with `status` on `path` from an ephemeral local port.
pub async fn spawn_fake_backend(path: &str, status: StatusCode, body: String) -> Result<FakeServer> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reply = FakeReply {
        status,
        body,
        seen: seen.clone(),
    };
    let router = Router::new().route(path, get(respond)).with_state(reply);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(FakeServer {
        base_url: format!("http://{addr}"),
        seen,
    })
}

/// Base url of a port nothing listens on.
pub async fn closed_port_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
