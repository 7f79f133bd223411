//! Full-stack lookups: client, resolver, cache and HTTP transport against a
//! local fake registry.

use std::sync::Arc;

use e2e::{fake_registry, order_routes};
use schema_cache::{frame, unframe, ClientOptions, ErrorKind, RegistryClient, SerdeFormat};
use serde_json::json;

fn http_client(url: &str, options: ClientOptions) -> RegistryClient {
    let transport = http::HttpTransport::new(url).expect("valid url");
    RegistryClient::new(Arc::new(transport), options)
}

#[tokio::test]
async fn test_lookup_by_id_over_http() {
    let registry = fake_registry(order_routes()).await.expect("fake registry");
    let client = http_client(&registry.url, ClientOptions::default());

    let schema = client.get_by_id(42).await.expect("resolves");
    assert_eq!((schema.subject.as_str(), schema.version), ("orders-value", 3));
    assert_eq!(registry.hits(), 2);

    let by_sv = client.get_by_subject_version("orders-value", 3).await.expect("cached");
    assert!(Arc::ptr_eq(&schema, &by_sv));
    assert_eq!(registry.hits(), 2);
}

#[tokio::test]
async fn test_registry_errors_over_http() {
    let registry = fake_registry(order_routes()).await.expect("fake registry");
    let client = http_client(&registry.url, ClientOptions::default());

    let err = client.get_by_id(99).await.expect_err("no locations");
    assert_eq!(err.kind(), ErrorKind::Resolution);

    let err = client.get_by_subject_version("payments", 1).await.expect_err("unknown subject");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("/subjects/payments/versions/1 not found"));
}

#[tokio::test]
async fn test_framed_message_round_trip() {
    let registry = fake_registry(order_routes()).await.expect("fake registry");
    let client = http_client(&registry.url, ClientOptions::default().with_codecs());

    let order = json!({"order_id": 1001, "sku": "A-7"});
    let codec = client.codec_for_id(42).await.expect("avro codec");
    assert_eq!(codec.format(), SerdeFormat::Avro);
    let message = frame(42, &codec.encode(&order).expect("encode"));

    let (id, payload) = unframe(&message).expect("framed");
    let codec = client.codec_for_id(id).await.expect("memoized");
    let decoded = codec.decode(payload).expect("decode");
    assert_eq!(decoded, order);
}

#[tokio::test]
async fn test_delete_subject_over_http() {
    let mut routes = order_routes();
    routes.insert("/subjects/orders-value?permanent=false".to_string(), ("200 OK", "[3]".into()));
    let registry = fake_registry(routes).await.expect("fake registry");
    let client = http_client(&registry.url, ClientOptions::default());

    client.get_by_id(42).await.expect("resolves");
    assert_eq!(client.delete_subject("orders-value", false).await.expect("deleted"), vec![3]);
    assert_eq!(client.cache().expect("cache enabled").entries, 0);

    client.get_by_id(42).await.expect("resolves again");
    assert_eq!(registry.hits(), 5);
}
