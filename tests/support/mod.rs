// Stub upstream API for integration tests: scripted responses per route, and a
// record of every request the client sent.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_client::domain::{ApiConfig, ExecutionContext};
use api_client::interface_adapters::cookies::MemoryCookieJar;
use api_client::interface_adapters::navigation::ChannelNavigator;
use api_client::{ApiClient, TokenStore};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    // Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("expected JSON request body")
    }
}

#[derive(Debug, Clone)]
struct StubResponse {
    status: u16,
    body: String,
    delay: Duration,
}

type RouteKey = (String, String);

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    // The last scripted response for a route keeps being served.
    routes: Arc<Mutex<HashMap<RouteKey, VecDeque<StubResponse>>>>,
}

pub struct StubUpstream {
    pub base_url: String,
    state: StubState,
}

impl StubUpstream {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        // Bind to an ephemeral port to avoid collisions with local services.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.push(method, path, status, body.to_string(), Duration::ZERO);
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.push(method, path, status, body.to_string(), Duration::ZERO);
    }

    pub fn respond_slowly(&self, method: &str, path: &str, delay: Duration, body: Value) {
        self.push(method, path, 200, body.to_string(), delay);
    }

    fn push(&self, method: &str, path: &str, status: u16, body: String, delay: Duration) {
        let mut routes = self.state.routes.lock().expect("routes mutex poisoned");
        routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(StubResponse {
                status,
                body,
                delay,
            });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("requests mutex poisoned")
            .clone()
    }

    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|req| req.method == method && req.path == path)
            .count()
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect(),
        body: body.to_vec(),
    };
    state
        .requests
        .lock()
        .expect("requests mutex poisoned")
        .push(recorded);

    let scripted = {
        let mut routes = state.routes.lock().expect("routes mutex poisoned");
        routes
            .get_mut(&(method.to_string(), uri.path().to_string()))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
    };

    let Some(stub) = scripted else {
        return (StatusCode::NOT_FOUND, r#"{"message":"no stub"}"#).into_response();
    };
    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }
    let status = StatusCode::from_u16(stub.status).expect("valid stub status");
    (status, [(header::CONTENT_TYPE, "application/json")], stub.body).into_response()
}

// Client wired to the stub with in-memory cookies and a channel navigator.
pub struct TestClient {
    pub api: ApiClient,
    pub jar: Arc<MemoryCookieJar>,
    pub tokens: Arc<TokenStore>,
    pub navigations: mpsc::UnboundedReceiver<String>,
}

pub fn test_client(
    stub: &StubUpstream,
    configure: impl FnOnce(&mut ApiConfig),
    context: ExecutionContext,
    cookies: &[(&str, &str)],
) -> TestClient {
    use api_client::domain::CookieJar;

    let mut config = ApiConfig::new(stub.base_url.clone());
    // Keep retries fast in tests unless a test asks otherwise.
    config.retry_delay_ms = 10;
    configure(&mut config);

    let jar = Arc::new(MemoryCookieJar::new());
    for (name, value) in cookies {
        jar.set(name, value).expect("seed cookie");
    }
    let tokens = Arc::new(TokenStore::new(jar.clone(), config.token_key.clone()));
    let (navigator, navigations) = ChannelNavigator::new();
    let api = ApiClient::new(Arc::new(config), tokens.clone(), context, Arc::new(navigator))
        .expect("build api client");

    TestClient {
        api,
        jar,
        tokens,
        navigations,
    }
}

/// Address nothing listens on, for transport failure tests.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}
