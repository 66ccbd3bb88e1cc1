#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use once_cell::sync::Lazy;
use quality_compute::services::RedisSessionStore;
use quality_compute::{RedisPool, Settings};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::redis::Redis;

/// Global Docker client (reused across all tests)
static DOCKER: Lazy<Cli> = Lazy::new(Cli::default);

/// Test context with automatic Redis container management
///
/// `REDIS_URL` or `USE_LOCAL_REDIS` point the tests at an existing server,
/// otherwise a throwaway container is started and dropped with the context.
pub struct TestContext {
    pub redis: RedisPool,
    pub settings: Settings,
    _container: Option<Container<'static, Redis>>,
}

impl TestContext {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (container, host, port) = if let Ok(redis_url) = std::env::var("REDIS_URL") {
            // Format: redis://host:port
            let url_parts: Vec<&str> = redis_url
                .strip_prefix("redis://")
                .unwrap_or(&redis_url)
                .split(':')
                .collect();
            let host = url_parts.first().unwrap_or(&"127.0.0.1").to_string();
            let port = url_parts
                .get(1)
                .and_then(|p| p.trim_end_matches(|c: char| !c.is_ascii_digit()).parse().ok())
                .unwrap_or(6379);
            (None, host, port)
        } else if std::env::var("USE_LOCAL_REDIS").is_ok() {
            (None, "127.0.0.1".to_string(), 6379)
        } else {
            let container = DOCKER.run(Redis);
            let port = container.get_host_port_ipv4(6379);
            (Some(container), "127.0.0.1".to_string(), port)
        };

        let mut settings = Settings::new()?;
        settings.redis.host = host;
        settings.redis.port = port;
        settings.redis.password = None;

        let redis = RedisPool::new(&settings)?;
        redis.ping().await?;

        Ok(TestContext {
            redis,
            settings,
            _container: container,
        })
    }

    /// Session store under a prefix unique to the calling test
    pub fn session_store(&self, prefix: &str, ttl_seconds: Option<u64>) -> RedisSessionStore {
        RedisSessionStore::new(self.redis.clone(), prefix, ttl_seconds)
    }
}

/// Request captured by the fake API server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Canned reply for one path; `Value::Null` sends an empty body
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl CannedResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body,
        }
    }
}

#[derive(Clone)]
struct FakeState {
    routes: Arc<HashMap<String, CannedResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn handle(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let path = uri.path().to_string();
    state
        .requests
        .lock()
        .expect("request log poisoned")
        .push(RecordedRequest {
            path: path.clone(),
            authorization: header_text(header::AUTHORIZATION),
            content_type: header_text(header::CONTENT_TYPE),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });

    match state.routes.get(&path) {
        Some(canned) if canned.body.is_null() => canned.status.into_response(),
        Some(canned) => (canned.status, Json(canned.body.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Not found" })),
        )
            .into_response(),
    }
}

/// In-process stand-in for the backend API
pub struct FakeApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeApi {
    /// Serve canned replies on an ephemeral loopback port
    pub async fn start(routes: Vec<(&str, CannedResponse)>) -> Self {
        let routes: HashMap<String, CannedResponse> = routes
            .into_iter()
            .map(|(path, response)| (path.to_string(), response))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback(handle).with_state(FakeState {
            routes: Arc::new(routes),
            requests: requests.clone(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API listener");
        let addr = listener.local_addr().expect("listener address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake API server");
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("fake API received no requests")
    }
}
