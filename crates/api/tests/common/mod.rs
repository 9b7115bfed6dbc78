#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use parkgate_api::auth::jwt::{generate_access_token, JwtConfig};
use parkgate_api::config::ServerConfig;
use parkgate_api::router::build_app_router;
use parkgate_api::state::AppState;
use parkgate_coord::{EntryCoordinator, ExitCoordinator, SpotResolver};
use parkgate_core::protocol::ProtocolConfig;
use parkgate_store::seed::seed_lot;
use parkgate_store::{DocumentStore, MemoryStore};
use parkgate_triggers::{BarrierCloser, ConsistencyTrigger};

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        spot_count: 3,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        protocol: ProtocolConfig::default(),
    }
}

/// A fully wired application over a fresh seeded in-memory store, with the
/// change-stream consumers running.
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub config: ServerConfig,
}

/// Build the full application router with all middleware layers over a
/// fresh in-memory store.
///
/// This mirrors the wiring in `main.rs` (same router builder, same trigger
/// set) so integration tests exercise the production stack.
pub async fn test_app() -> TestApp {
    let config = test_config();

    let store = Arc::new(MemoryStore::new());
    seed_lot(store.as_ref(), config.spot_count)
        .await
        .expect("seeding should succeed");

    let dyn_store: Arc<dyn DocumentStore> = store.clone();

    let consistency = ConsistencyTrigger::new(Arc::clone(&dyn_store));
    tokio::spawn(consistency.run(dyn_store.subscribe()));

    let closer = BarrierCloser::new(Arc::clone(&dyn_store), config.protocol.barrier_close_delay);
    tokio::spawn(closer.run(dyn_store.subscribe()));

    let state = AppState {
        store: Arc::clone(&dyn_store),
        config: Arc::new(config.clone()),
        entry: Arc::new(EntryCoordinator::new(
            Arc::clone(&dyn_store),
            config.protocol.clone(),
        )),
        exit: Arc::new(ExitCoordinator::new(
            Arc::clone(&dyn_store),
            config.protocol.clone(),
        )),
        resolver: Arc::new(SpotResolver::new(Arc::clone(&dyn_store))),
    };

    TestApp {
        app: build_app_router(state, &config),
        store,
        config,
    }
}

/// Mint a valid access token for `user_id`.
pub fn bearer(user_id: &str) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    };
    generate_access_token(user_id, &config).expect("token generation should succeed")
}

/// Issue one request against the app, returning status and parsed JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
