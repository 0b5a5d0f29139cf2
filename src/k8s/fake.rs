//! In-memory cluster for tests
//!
//! Replays canned responses and records every request it receives.

use k8s_openapi::apimachinery::pkg::version::Info;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{ApiRequest, ApiResponse, ClusterApi};
use crate::error::ApiError;

pub struct FakeCluster {
    version: Info,
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    version_calls: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self {
            version: Info {
                major: "1".to_string(),
                minor: "28".to_string(),
                git_version: "v1.28.3".to_string(),
                platform: "linux/amd64".to_string(),
                ..Default::default()
            },
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            version_calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Queue a response for the next request
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    /// Queue a failure for the next request
    pub fn fail(self, err: ApiError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// Hold every call for the given time before answering
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    /// Total number of API calls made, version queries included
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len() + self.version_calls()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl ClusterApi for FakeCluster {
    async fn server_version(&self) -> Result<Info, ApiError> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        Ok(self.version.clone())
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.wait().await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no response queued")
    }
}
