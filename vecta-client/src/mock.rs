use crate::client::Client;
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value as Json;
use std::collections::VecDeque;
use std::sync::Arc;
use vecta_core::{RestRequest, Result};

/// In-memory transport for unit tests: records requests, replies with
/// queued responses (or `Null` once the queue is empty).
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<RestRequest>>,
    responses: Mutex<VecDeque<Result<Json>>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, response: Result<Json>) {
        self.responses.lock().push_back(response);
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().clone()
    }

    pub fn client(self: &Arc<Self>) -> Client {
        Client::with_transport(self.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RestRequest) -> Result<Json> {
        self.requests.lock().push(request);
        self.responses.lock().pop_front().unwrap_or(Ok(Json::Null))
    }
}
