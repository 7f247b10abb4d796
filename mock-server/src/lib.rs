use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info};

pub const MAX_BATCH_NAMES: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub country_id: String,
    pub probability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub name: String,
    pub country: Vec<Country>,
}

/// Behaviour knobs for the mock service.
#[derive(Clone, Debug)]
pub struct MockConfig {
    /// When set, requests must carry this `apikey`.
    pub api_key: Option<String>,
    /// Names that may be predicted before the server answers 429.
    pub rate_limit: u64,
    /// Value sent in `X-Rate-Reset`.
    pub reset_seconds: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            rate_limit: 1000,
            reset_seconds: 86_400,
        }
    }
}

struct AppState {
    config: MockConfig,
    used: AtomicU64,
    known: HashMap<&'static str, Vec<Country>>,
}

type SharedState = Arc<AppState>;

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let state: SharedState = Arc::new(AppState {
        config,
        used: AtomicU64::new(0),
        known: known_names(),
    });
    Router::new().route("/", get(predict)).with_state(state)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(
            %addr,
            api_key = config.api_key.is_some(),
            limit = config.rate_limit,
            "mock nationalize listening"
        );
    }
    axum::serve(listener, app_with(config)).await
}

fn known_names() -> HashMap<&'static str, Vec<Country>> {
    let entry = |pairs: &[(&str, f64)]| {
        pairs
            .iter()
            .map(|(id, p)| Country {
                country_id: id.to_string(),
                probability: *p,
            })
            .collect::<Vec<_>>()
    };
    HashMap::from([
        (
            "michael",
            entry(&[
                ("US", 0.08986482266532715),
                ("AU", 0.05976757527083082),
                ("NZ", 0.04666974820852911),
            ]),
        ),
        (
            "matthew",
            entry(&[("IE", 0.1103), ("AU", 0.0987), ("GB", 0.0891)]),
        ),
        ("jane", entry(&[("JM", 0.0772), ("GB", 0.0651)])),
        ("kenji", entry(&[("JP", 0.9124)])),
    ])
}

async fn predict(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let param = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
    let batch: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "name[]")
        .map(|(_, v)| v.as_str())
        .collect();

    if let Some(expected) = &state.config.api_key {
        if param("apikey") != Some(expected.as_str()) {
            return state.reply(StatusCode::UNAUTHORIZED, error("Invalid API key"));
        }
    }

    let (names, is_batch) = if !batch.is_empty() {
        if batch.len() > MAX_BATCH_NAMES {
            return state.reply(
                StatusCode::UNPROCESSABLE_ENTITY,
                error("Invalid 'name[]' parameter"),
            );
        }
        (batch, true)
    } else if let Some(name) = param("name") {
        (vec![name], false)
    } else {
        return state.reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            error("Missing 'name' parameter"),
        );
    };

    if !state.consume(names.len() as u64) {
        return state.reply(StatusCode::TOO_MANY_REQUESTS, error("Request limit reached"));
    }
    debug!(count = names.len(), is_batch, "serving prediction");

    let predictions: Vec<Prediction> = names.iter().map(|name| state.lookup(name)).collect();
    let body = if is_batch {
        json!(predictions)
    } else {
        json!(predictions[0])
    };
    state.reply(StatusCode::OK, body)
}

fn error(message: &str) -> serde_json::Value {
    json!({ "error": message })
}

impl AppState {
    /// Reserve `cost` names of quota; false when that would exceed the limit.
    fn consume(&self, cost: u64) -> bool {
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                let next = used + cost;
                (next <= self.config.rate_limit).then_some(next)
            })
            .is_ok()
    }

    fn lookup(&self, name: &str) -> Prediction {
        Prediction {
            name: name.to_string(),
            country: self
                .known
                .get(name.to_lowercase().as_str())
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn reply(&self, status: StatusCode, body: serde_json::Value) -> Response {
        let remaining = self
            .config
            .rate_limit
            .saturating_sub(self.used.load(Ordering::SeqCst));
        let headers = [
            ("X-Rate-Limit-Limit", self.config.rate_limit.to_string()),
            ("X-Rate-Limit-Remaining", remaining.to_string()),
            ("X-Rate-Reset", self.config.reset_seconds.to_string()),
        ];
        (status, headers, Json(body)).into_response()
    }
}
