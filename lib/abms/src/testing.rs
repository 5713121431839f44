//! Scripted HTTP client shared by the unit tests.

use abms_integration::{HttpClient, HttpRequest, TransportError};
use async_trait::async_trait;
use rootcause::prelude::Report;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Records every request and answers from a queue of scripted replies.
///
/// When the queue runs dry it answers `{"success": true, "result": {}}`.
#[derive(Clone, Default)]
pub struct RecordingClient {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    replies: Arc<Mutex<VecDeque<Result<JsonValue, TransportError>>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(replies: impl IntoIterator<Item = JsonValue>) -> Self {
        let client = Self::new();
        for reply in replies {
            client.push_reply(Ok(reply));
        }
        client
    }

    pub fn push_reply(&self, reply: Result<JsonValue, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn send(&self, request: HttpRequest) -> Result<JsonValue, Report<TransportError>> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(err)) => Err(err.into()),
            None => Ok(serde_json::json!({"success": true, "result": {}})),
        }
    }
}
