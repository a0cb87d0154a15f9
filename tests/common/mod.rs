// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: an in-process fake of the remote user API.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use employwise::config::Config;
use employwise::models::User;
use employwise::services::{MemoryTokenStore, Notification, TokenStore};
use employwise::AppState;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub const VALID_EMAIL: &str = "eve.holt@reqres.in";
pub const VALID_PASSWORD: &str = "cityslicka";
pub const TEST_TOKEN: &str = "QpwL5tke4Pnpja7X4";
pub const PER_PAGE: usize = 6;

const SEED: [(&str, &str); 12] = [
    ("George", "Bluth"),
    ("Janet", "Weaver"),
    ("Emma", "Wong"),
    ("Eve", "Holt"),
    ("Charles", "Morris"),
    ("Tracey", "Ramos"),
    ("Michael", "Lawson"),
    ("Lindsay", "Ferguson"),
    ("Tobias", "Funke"),
    ("Byron", "Fields"),
    ("George", "Edwards"),
    ("Rachel", "Howell"),
];

/// The first `count` users of the demo data set.
#[allow(dead_code)]
pub fn seed_users(count: usize) -> Vec<User> {
    SEED.iter()
        .take(count)
        .enumerate()
        .map(|(i, (first, last))| {
            let id = i as u64 + 1;
            User {
                id,
                email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
                first_name: first.to_string(),
                last_name: last.to_string(),
                avatar: format!("https://reqres.in/img/faces/{}-image.jpg", id),
            }
        })
        .collect()
}

/// Mutable knobs and counters behind the fake API.
#[derive(Default)]
pub struct FakeState {
    users: Mutex<Vec<User>>,
    failing: AtomicBool,
    page_delays: Mutex<HashMap<u32, Duration>>,
    update_delay: Mutex<Option<Duration>>,
    requests: AtomicUsize,
    last_authorization: Mutex<Option<String>>,
    last_api_key: Mutex<Option<String>>,
    last_update_body: Mutex<Option<serde_json::Value>>,
    /// Uppercase first names in update echoes, like a normalizing server would.
    shout_echo: AtomicBool,
}

/// A running fake API server.
pub struct FakeApi {
    pub base_url: String,
    pub state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeApi {
    /// Start with the full 12-user data set (two pages of six).
    pub async fn start() -> Self {
        Self::with_users(seed_users(SEED.len())).await
    }

    pub async fn with_users(users: Vec<User>) -> Self {
        let state = Arc::new(FakeState {
            users: Mutex::new(users),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/users", get(list_users))
            .route(
                "/api/users/{id}",
                get(get_user).put(update_user).delete(delete_user),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Make every users endpoint answer 500.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold the listing response for `page` for `delay`.
    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.state.page_delays.lock().unwrap().insert(page, delay);
    }

    /// Hold every update response for `delay`.
    pub fn delay_updates(&self, delay: Duration) {
        *self.state.update_delay.lock().unwrap() = Some(delay);
    }

    pub fn shout_echo(&self) {
        self.state.shout_echo.store(true, Ordering::SeqCst);
    }

    /// Number of requests the fake has served.
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().unwrap().clone()
    }

    pub fn last_update_body(&self) -> Option<serde_json::Value> {
        self.state.last_update_body.lock().unwrap().clone()
    }

    /// Config pointing at this server with no loading delay.
    pub fn config(&self) -> Config {
        Config {
            api_url: self.base_url.clone(),
            ..Config::default()
        }
    }
}

/// Build the application against `api` with the given token store.
#[allow(dead_code)]
pub fn create_test_app(
    api: &FakeApi,
    store: Arc<dyn TokenStore>,
) -> (AppState, UnboundedReceiver<Notification>) {
    create_test_app_with_config(api.config(), store)
}

#[allow(dead_code)]
pub fn create_test_app_with_config(
    config: Config,
    store: Arc<dyn TokenStore>,
) -> (AppState, UnboundedReceiver<Notification>) {
    let (notifier, rx) = employwise::services::ChannelNotifier::new();
    let state = AppState::new(config, store, Arc::new(notifier)).expect("Failed to build app");
    (state, rx)
}

/// App whose session was restored from an earlier login.
#[allow(dead_code)]
pub fn logged_in_app(api: &FakeApi) -> (AppState, UnboundedReceiver<Notification>) {
    create_test_app(api, Arc::new(MemoryTokenStore::with_token(TEST_TOKEN)))
}

/// Everything notified so far.
#[allow(dead_code)]
pub fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

async fn login(State(state): State<Arc<FakeState>>, Json(body): Json<LoginBody>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let password = body.password.unwrap_or_default();
    if password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing password" })),
        )
            .into_response();
    }

    match body.email.as_deref() {
        Some(VALID_EMAIL) if password == VALID_PASSWORD => {
            Json(json!({ "token": TEST_TOKEN })).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "user not found" })),
        )
            .into_response(),
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn record(state: &FakeState, headers: &HeaderMap) -> bool {
    state.requests.fetch_add(1, Ordering::SeqCst);
    *state.last_authorization.lock().unwrap() = header(headers, "authorization");
    *state.last_api_key.lock().unwrap() = header(headers, "x-api-key");
    state.failing.load(Ordering::SeqCst)
}

async fn list_users(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if record(&state, &headers) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    let delay = state.page_delays.lock().unwrap().get(&page).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let users = state.users.lock().unwrap().clone();
    let total = users.len();
    let total_pages = total.div_ceil(PER_PAGE);
    let data: Vec<User> = users
        .into_iter()
        .skip((page.max(1) as usize - 1) * PER_PAGE)
        .take(PER_PAGE)
        .collect();

    Json(json!({
        "page": page,
        "per_page": PER_PAGE,
        "total": total,
        "total_pages": total_pages,
        "data": data,
    }))
    .into_response()
}

async fn get_user(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if record(&state, &headers) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let found = state
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.id == id)
        .cloned();
    match found {
        Some(user) => Json(json!({ "data": user })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn update_user(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(_id): Path<u64>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if record(&state, &headers) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    *state.last_update_body.lock().unwrap() = Some(body.clone());

    let delay = *state.update_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    // Like the real demo API: echo the body, persist nothing.
    let mut echo = body;
    if state.shout_echo.load(Ordering::SeqCst) {
        let shouted = echo
            .get("first_name")
            .and_then(|v| v.as_str())
            .map(str::to_uppercase);
        if let Some(first) = shouted {
            echo["first_name"] = json!(first);
        }
    }
    echo["updatedAt"] = json!("2026-10-19T12:00:00.000Z");
    Json(echo).into_response()
}

async fn delete_user(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(_id): Path<u64>,
) -> Response {
    if record(&state, &headers) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
