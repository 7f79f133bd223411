#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Fake schema registry for end-to-end tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned `(status line, body)` replies keyed by request path and query.
pub type Routes = HashMap<String, (&'static str, String)>;

/// Avro record used by the end-to-end scenarios.
pub const ORDER_AVRO: &str = r#"{
    "type": "record",
    "name": "Order",
    "fields": [
        {"name": "order_id", "type": "long"},
        {"name": "sku", "type": "string"}
    ]
}"#;

/// A running fake registry.
pub struct FakeRegistry {
    /// Base URL to hand to a transport
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl FakeRegistry {
    /// Requests served so far, including 404s.
    pub fn hits(&self) -> usize { self.hits.load(Ordering::SeqCst) }
}

/// Binds a local port and serves `routes` until the runtime shuts down.
///
/// Unknown paths get a registry-style 404 with error code 40401.
pub async fn fake_registry(routes: Routes) -> std::io::Result<FakeRegistry> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}", listener.local_addr()?);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let routes = Arc::clone(&routes);
            let counter = Arc::clone(&counter);
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let head = String::from_utf8_lossy(&head);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes.get(&path).cloned().unwrap_or((
                    "404 Not Found",
                    json!({"error_code": 40401, "message": format!("{} not found", path)})
                        .to_string(),
                ));
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    types::CONTENT_TYPE,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Ok(FakeRegistry { url, hits })
}

/// Routes for an `orders-value` subject whose version 3 is schema id 42.
pub fn order_routes() -> Routes {
    let mut routes = HashMap::new();
    routes.insert(
        "/schemas/ids/42/versions".to_string(),
        ("200 OK", json!([{"subject": "orders-value", "version": 3}]).to_string()),
    );
    routes.insert(
        "/subjects/orders-value/versions/3".to_string(),
        (
            "200 OK",
            json!({
                "id": 42,
                "subject": "orders-value",
                "version": 3,
                "schemaType": "AVRO",
                "schema": ORDER_AVRO,
            })
            .to_string(),
        ),
    );
    routes.insert("/schemas/ids/99/versions".to_string(), ("200 OK", "[]".to_string()));
    routes
}
