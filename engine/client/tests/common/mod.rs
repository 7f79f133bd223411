//! In-memory registry transport for client tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use transport::{Method, Transport, TransportError};

type Reply = Result<String, TransportError>;

/// Serves canned replies per path and counts every request.
///
/// A path with several queued replies hands them out in order and keeps
/// repeating the last one.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    delay: Option<Duration>,
}

impl StubTransport {
    pub fn new() -> Self { Self::default() }

    pub fn with_delay(delay: Duration) -> Self { Self { delay: Some(delay), ..Self::default() } }

    pub fn route(&self, path: &str, body: &str) -> &Self {
        self.routes.lock().entry(path.to_string()).or_default().push_back(Ok(body.to_string()));
        self
    }

    pub fn fail(&self, path: &str, err: TransportError) -> &Self {
        self.routes.lock().entry(path.to_string()).or_default().push_back(Err(err));
        self
    }

    pub fn calls(&self, path: &str) -> usize { self.calls.lock().get(path).copied().unwrap_or(0) }

    pub fn total_calls(&self) -> usize { self.total.load(Ordering::SeqCst) }

    fn next_reply(&self, path: &str) -> Reply {
        let mut routes = self.routes.lock();
        match routes.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().expect("non-empty queue"),
            Some(queue) => queue.front().cloned().expect("route has a reply"),
            None => Err(TransportError::Status {
                status: 404,
                error_code: Some(40401),
                message: Some(format!("no route for {}", path)),
            }),
        }
    }
}

#[async_trait::async_trait]
impl Transport for StubTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        _body: Option<&serde_json::Value>,
    ) -> Result<Vec<u8>, TransportError> {
        assert!(matches!(method, Method::Get | Method::Delete), "unexpected {}", method);
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().entry(path.to_string()).or_default() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_reply(path).map(String::into_bytes)
    }

    fn endpoint(&self) -> &str { "stub://registry" }
}

pub fn schema_body(id: i32, subject: &str, version: i32) -> String {
    serde_json::json!({
        "id": id,
        "subject": subject,
        "version": version,
        "schema": "{\"type\":\"record\",\"name\":\"Order\",\"fields\":[]}",
    })
    .to_string()
}

pub fn locations_body(locations: &[(&str, i32)]) -> String {
    let list: Vec<_> = locations
        .iter()
        .map(|(subject, version)| serde_json::json!({ "subject": subject, "version": version }))
        .collect();
    serde_json::Value::Array(list).to_string()
}

pub fn typed_schema_body(
    id: i32,
    subject: &str,
    version: i32,
    schema_type: &str,
    schema: &str,
) -> String {
    serde_json::json!({
        "id": id,
        "subject": subject,
        "version": version,
        "schemaType": schema_type,
        "schema": schema,
    })
    .to_string()
}
