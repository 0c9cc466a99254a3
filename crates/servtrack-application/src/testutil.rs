//! Test fakes shared by the store and gateway tests.
//!
//! The pack of adapters is exercised through the `HttpTransport` seam: the
//! fake replays scripted responses in order and records every request it
//! was handed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use servtrack_core::error::{Result, ServtrackError};
use servtrack_core::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Scripted transport: responses are consumed FIFO, one per request.
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Scripts a reply with the given status and JSON body.
    pub fn push_json(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(ApiResponse {
            status,
            body: Some(body),
        }));
    }

    /// Scripts a bodyless reply.
    pub fn push_status(&self, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body: None }));
    }

    /// Scripts a transport failure (no server reply).
    pub fn push_network_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ServtrackError::network(message)));
    }

    /// Every request executed so far, in order.
    pub fn recorded(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                panic!("FakeTransport ran out of scripted responses")
            })
    }
}

/// Wire-shaped user object.
pub fn user_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Test User",
        "email": format!("user{id}@example.com"),
        "role": "user",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

/// Wire-shaped service object.
pub fn service_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "desc",
        "type": "maintenance",
        "status": "pending",
        "priority": "medium",
        "deadline": "2024-06-01T00:00:00.000Z",
        "createdBy": user_json("creator"),
        "assignees": [],
        "comments": [],
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}
