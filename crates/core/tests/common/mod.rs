//! In-memory stand-in for the HR backend.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hr_admin_core::{ApiClient, ApiError, ApiRequest, ApiResult, HrApi, Method};
use serde_json::Value;
use tokio::sync::Barrier;

#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, &'static str),
}

/// Replies are queued per (method, path); the last one repeats.
#[derive(Default)]
pub struct FakeClient {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
    status_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl FakeClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn json(&self, method: Method, path: &str, body: Value) {
        self.reply(method, path, Reply::Json(body));
    }

    /// Make every status request wait until `n` of them are in flight.
    pub fn hold_status_requests(&self, n: usize) {
        *self.status_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(n)));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ApiClient for FakeClient {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        self.requests.lock().unwrap().push(request.clone());

        let barrier = self.status_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            if request.path.starts_with("/api/employee_status")
                || request.path.starts_with("/api/performance_status")
            {
                barrier.wait().await;
            }
        }

        match self.next_reply(request.method, &request.path) {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Status(status, message)) => Err(ApiError::Status {
                status,
                message: message.to_string(),
            }),
            None => Err(ApiError::Status {
                status: 404,
                message: format!("no route for {}", request.path),
            }),
        }
    }
}

pub fn api(fake: &Arc<FakeClient>) -> HrApi {
    HrApi::new(fake.clone())
}
