//! Scripted in-memory backend for driving `ApiClient` without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stockdesk_client::session::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use stockdesk_client::{
    is_public_path, ApiClient, ClientResult, Cookie, HttpMethod, HttpRequest, HttpResponse,
    MemorySessionStore, RequestBody, Session, SessionState, Transport,
};

pub const OLD_ACCESS: &str = "access-1";
pub const OLD_REFRESH: &str = "refresh-1";
pub const NEW_ACCESS: &str = "access-2";
pub const NEW_REFRESH: &str = "refresh-2";

pub struct FakeBackend {
    accepted_token: Mutex<Option<String>>,
    reject_all: bool,
    rejection: (u16, String),
    refresh_succeeds: bool,
    refresh_delay: std::time::Duration,
    routes: Mutex<HashMap<String, HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeBackend {
    /// Accepts only `NEW_ACCESS`; a refresh issues `NEW_ACCESS`/`NEW_REFRESH`.
    pub fn new() -> Self {
        FakeBackend {
            accepted_token: Mutex::new(Some(NEW_ACCESS.to_string())),
            reject_all: false,
            rejection: (401, "Unauthorized".to_string()),
            refresh_succeeds: true,
            refresh_delay: std::time::Duration::ZERO,
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(self, token: &str) -> Self {
        *self.accepted_token.lock().unwrap() = Some(token.to_string());
        self
    }

    pub fn rejecting_all(mut self) -> Self {
        self.reject_all = true;
        self
    }

    pub fn rejecting_with(mut self, status: u16, message: &str) -> Self {
        self.rejection = (status, message.to_string());
        self
    }

    pub fn refresh_fails(mut self) -> Self {
        self.refresh_succeeds = false;
        self
    }

    pub fn refresh_delay(mut self, delay: std::time::Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn route(self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(route_key(method, path), HttpResponse::json(status, &body));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }

    fn refresh_response(&self) -> HttpResponse {
        if !self.refresh_succeeds {
            return HttpResponse::json(401, &json!({ "message": "Invalid refresh token" }));
        }
        *self.accepted_token.lock().unwrap() = Some(NEW_ACCESS.to_string());
        HttpResponse::json(200, &auth_body(NEW_ACCESS, NEW_REFRESH))
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn execute(&self, request: &HttpRequest) -> ClientResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if request.path == "/auth/refresh" {
            if !self.refresh_delay.is_zero() {
                tokio::time::sleep(self.refresh_delay).await;
            }
            return Ok(self.refresh_response());
        }

        if !is_public_path(&request.path) {
            let accepted = self.accepted_token.lock().unwrap().clone();
            if self.reject_all || request.bearer.is_none() || request.bearer != accepted {
                let (status, message) = &self.rejection;
                return Ok(HttpResponse::json(*status, &json!({ "message": message })));
            }
        }

        let key = route_key(request.method, &request.path);
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| HttpResponse::json(404, &json!({ "message": "Not Found" }))))
    }
}

fn route_key(method: HttpMethod, path: &str) -> String {
    format!("{} {}", method, path)
}

pub fn auth_body(access: &str, refresh: &str) -> Value {
    json!({
        "message": "ok",
        "data": {
            "accessToken": access,
            "refreshToken": refresh,
            "refreshTokenExpires": (Utc::now() + Duration::days(7)).to_rfc3339(),
        }
    })
}

/// Session holding the given cookies, both live.
pub fn session_with(access: Option<&str>, refresh: Option<&str>) -> Session {
    let expires = Utc::now() + Duration::minutes(15);
    let state = SessionState {
        access_token: access.map(|value| Cookie::new(ACCESS_TOKEN_COOKIE, value, expires, false)),
        refresh_token: refresh
            .map(|value| Cookie::new(REFRESH_TOKEN_COOKIE, value, expires + Duration::days(7), false)),
        redirect_after_login: None,
    };
    Session::with_settings(
        Arc::new(MemorySessionStore::with_state(state)),
        Duration::minutes(15),
        false,
    )
}

pub fn client_for(backend: &Arc<FakeBackend>, session: Session) -> ApiClient {
    ApiClient::with_transport(backend.clone(), session)
}

/// Records every logout notification.
pub fn record_logouts(client: &ApiClient) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    client.set_logout_hook(move |location: &str| sink.lock().unwrap().push(location.to_string()));
    seen
}

pub fn json_body(request: &HttpRequest) -> Option<&Value> {
    match &request.body {
        RequestBody::Json(value) => Some(value),
        _ => None,
    }
}

pub fn product_json(id: &str) -> Value {
    json!({ "id": id, "sku": "SKU-1", "name": "Cola 330ml", "sellingPrice": "1.50" })
}
