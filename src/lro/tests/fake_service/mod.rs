// Copyright 2025 Atlas Maps Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A fake long-running-operation service for integration tests.
//!
//! The service replays scripted responses: one queue for the submission
//! endpoint and one for the status endpoint. Bind it first to learn its
//! address, then script responses with absolute URLs pointing back at it.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use http::{HeaderMap, HeaderValue, StatusCode, header::LOCATION};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One scripted HTTP response.
#[derive(Clone, Debug)]
pub struct Scripted {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Option<String>,
}

impl Scripted {
    pub fn accepted(location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::ACCEPTED,
            location: Some(location.into()),
            body: None,
        }
    }

    pub fn still_running() -> Self {
        Self {
            status: StatusCode::ACCEPTED,
            location: None,
            body: None,
        }
    }

    pub fn done(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            location: None,
            body: Some(body.into()),
        }
    }

    pub fn status_only(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: Some(body.into()),
        }
    }
}

/// Shared handle to the fake service state.
#[derive(Clone, Default)]
pub struct FakeOperations {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    submissions: Mutex<VecDeque<Scripted>>,
    polls: Mutex<VecDeque<Scripted>>,
    poll_client_ids: Mutex<Vec<Option<String>>>,
}

impl FakeOperations {
    pub fn script_submission(&self, response: Scripted) {
        self.inner.submissions.lock().unwrap().push_back(response);
    }

    pub fn script_poll(&self, response: Scripted) {
        self.inner.polls.lock().unwrap().push_back(response);
    }

    /// The `x-client-id` value (if any) seen on each poll request, in order.
    pub fn poll_client_ids(&self) -> Vec<Option<String>> {
        self.inner.poll_client_ids.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.inner.poll_client_ids.lock().unwrap().len()
    }
}

/// Starts the fake service and returns its endpoint, e.g. `http://127.0.0.1:40123`.
pub async fn start(state: FakeOperations) -> anyhow::Result<String> {
    let app = axum::Router::new()
        .route("/submit", post(submit))
        .route("/operations/{id}", get(poll))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn submit(State(state): State<FakeOperations>) -> impl IntoResponse {
    render(state.inner.submissions.lock().unwrap().pop_front())
}

async fn poll(State(state): State<FakeOperations>, headers: HeaderMap) -> impl IntoResponse {
    let client_id = headers
        .get("x-client-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.inner.poll_client_ids.lock().unwrap().push(client_id);
    render(state.inner.polls.lock().unwrap().pop_front())
}

fn render(scripted: Option<Scripted>) -> (StatusCode, HeaderMap, String) {
    let Some(scripted) = scripted else {
        // the test consumed more responses than it scripted
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            HeaderMap::new(),
            "script exhausted".to_string(),
        );
    };
    let mut headers = HeaderMap::new();
    if let Some(location) = &scripted.location {
        headers.insert(LOCATION, HeaderValue::from_str(location).unwrap());
    }
    (scripted.status, headers, scripted.body.unwrap_or_default())
}
