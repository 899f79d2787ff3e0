//! In-process fake of the BunnyCDN API.
//!
//! Keeps pull zones as raw JSON, records every request it receives and can be
//! told to fail or stall specific calls.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use terraform_provider_bunnycdn::api::BunnyCdn;

pub const API_KEY: &str = "test-access-key";

/// Id handed to the first pull zone created.
pub const FIRST_PULLZONE_ID: i64 = 42;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct FakeState {
    pub pullzones: BTreeMap<i64, Value>,
    pub next_pullzone_id: i64,
    pub next_hostname_id: i64,
    pub requests: Vec<RecordedRequest>,
    failures: Vec<(Method, String, StatusCode, String)>,
    stalls: Vec<(Method, String)>,
    body_stalls: Vec<(Method, String, StatusCode)>,
}

#[derive(Clone)]
pub struct FakeBunny {
    pub base_url: String,
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeBunny {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(FakeState {
            next_pullzone_id: FIRST_PULLZONE_ID,
            next_hostname_id: 1000,
            ..FakeState::default()
        }));

        let app = Router::new()
            .fallback(dispatch)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> Arc<BunnyCdn> {
        Arc::new(BunnyCdn::with_base_url(API_KEY, &self.base_url).unwrap())
    }

    /// Seeds a pull zone directly and returns its id.
    pub fn insert_pullzone(&self, name: &str, hostnames: Vec<Value>) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_pullzone_id;
        state.next_pullzone_id += 1;
        state.pullzones.insert(
            id,
            json!({
                "Id": id,
                "Name": name,
                "OriginType": 0,
                "OriginUrl": "http://origin.example.com",
                "EnableSmartCache": true,
                "DisableCookies": false,
                "ErrorPageEnableCustomCode": false,
                "Hostnames": hostnames,
            }),
        );
        id
    }

    pub fn remove_pullzone(&self, id: i64) {
        self.state.lock().unwrap().pullzones.remove(&id);
    }

    pub fn pullzone(&self, id: i64) -> Option<Value> {
        self.state.lock().unwrap().pullzones.get(&id).cloned()
    }

    pub fn hostname_entry(&self, pullzone_id: i64, name: &str) -> Option<Value> {
        self.pullzone(pullzone_id).and_then(|pz| {
            pz["Hostnames"]
                .as_array()
                .and_then(|list| list.iter().find(|h| h["Value"] == name).cloned())
        })
    }

    /// Makes every `method path` call answer with `status` and `body`.
    pub fn fail(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.state.lock().unwrap().failures.push((
            method,
            path.to_string(),
            status,
            body.to_string(),
        ));
    }

    /// Makes every `method path` call hang for a long time.
    pub fn stall(&self, method: Method, path: &str) {
        self.state
            .lock()
            .unwrap()
            .stalls
            .push((method, path.to_string()));
    }

    /// Makes every `method path` call send its headers with `status` and
    /// then never finish the body.
    pub fn stall_body(&self, method: Method, path: &str, status: StatusCode) {
        self.state
            .lock()
            .unwrap()
            .body_stalls
            .push((method, path.to_string(), status));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Recorded `(method, path)` pairs, in arrival order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method.to_string(), r.path))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }
}

async fn dispatch(
    State(state): State<Arc<Mutex<FakeState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let (stalled, body_stalled) = {
        let mut guard = state.lock().unwrap();
        guard.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            body: body.clone(),
        });
        (
            guard.stalls.iter().any(|(m, p)| *m == method && *p == path),
            guard
                .body_stalls
                .iter()
                .find(|(m, p, _)| *m == method && *p == path)
                .map(|(_, _, status)| *status),
        )
    };

    if stalled {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }

    if let Some(status) = body_stalled {
        let never = futures::stream::pending::<Result<Bytes, std::io::Error>>();
        return (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Body::from_stream(never),
        )
            .into_response();
    }

    if headers.get("accesskey").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut guard = state.lock().unwrap();
    if let Some((_, _, status, text)) = guard
        .failures
        .iter()
        .find(|(m, p, _, _)| *m == method && *p == path)
    {
        return (*status, text.clone()).into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["pullzone", "loadFreeCertificate"]) => {
            let name = uri
                .query()
                .and_then(|q| q.strip_prefix("hostname="))
                .unwrap_or_default()
                .to_string();
            match find_hostname(&mut guard, &name) {
                Some(entry) => {
                    entry["HasCertificate"] = json!(true);
                    StatusCode::OK.into_response()
                }
                None => (StatusCode::BAD_REQUEST, "hostname is not registered").into_response(),
            }
        }
        ("POST", ["pullzone"]) => {
            let id = guard.next_pullzone_id;
            guard.next_pullzone_id += 1;
            let mut record = body;
            record["Id"] = json!(id);
            record["Hostnames"] = json!([]);
            guard.pullzones.insert(id, record.clone());
            (StatusCode::CREATED, Json(record)).into_response()
        }
        (verb, ["pullzone", id, rest @ ..]) => {
            let Ok(id) = id.parse::<i64>() else {
                return StatusCode::BAD_REQUEST.into_response();
            };
            let next_hostname_id = guard.next_hostname_id;
            let Some(record) = guard.pullzones.get_mut(&id) else {
                return StatusCode::NOT_FOUND.into_response();
            };
            let hostname = body["Hostname"].as_str().unwrap_or_default().to_string();

            match (verb, rest) {
                ("GET", []) => (StatusCode::OK, Json(record.clone())).into_response(),
                ("POST", []) => {
                    if let (Some(target), Some(update)) = (record.as_object_mut(), body.as_object()) {
                        for (key, value) in update {
                            if key != "Id" && key != "Hostnames" {
                                target.insert(key.clone(), value.clone());
                            }
                        }
                    }
                    (StatusCode::OK, Json(record.clone())).into_response()
                }
                ("DELETE", []) => {
                    guard.pullzones.remove(&id);
                    StatusCode::NO_CONTENT.into_response()
                }
                ("POST", ["addHostname"]) => {
                    if let Some(list) = record["Hostnames"].as_array_mut() {
                        list.push(json!({
                            "Id": next_hostname_id,
                            "Value": hostname,
                            "ForceSSL": false,
                            "HasCertificate": false,
                        }));
                    }
                    guard.next_hostname_id += 1;
                    StatusCode::NO_CONTENT.into_response()
                }
                ("DELETE", ["removeHostname"]) => {
                    if let Some(list) = record["Hostnames"].as_array_mut() {
                        list.retain(|h| h["Value"] != hostname.as_str());
                    }
                    StatusCode::NO_CONTENT.into_response()
                }
                ("POST", ["setForceSSL"]) => {
                    let force = body["ForceSSL"].as_bool().unwrap_or_default();
                    match hostname_in(record, &hostname) {
                        Some(entry) => {
                            entry["ForceSSL"] = json!(force);
                            StatusCode::NO_CONTENT.into_response()
                        }
                        None => StatusCode::BAD_REQUEST.into_response(),
                    }
                }
                ("POST", ["addCertificate"]) => match hostname_in(record, &hostname) {
                    Some(entry) => {
                        entry["HasCertificate"] = json!(true);
                        StatusCode::OK.into_response()
                    }
                    None => StatusCode::BAD_REQUEST.into_response(),
                },
                _ => StatusCode::NOT_FOUND.into_response(),
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn hostname_in<'a>(record: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    record["Hostnames"]
        .as_array_mut()?
        .iter_mut()
        .find(|h| h["Value"] == name)
}

fn find_hostname<'a>(state: &'a mut FakeState, name: &str) -> Option<&'a mut Value> {
    state
        .pullzones
        .values_mut()
        .find_map(|record| hostname_in(record, name))
}
