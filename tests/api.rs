//! End-to-end tests of the HTTP surface over a real socket.

use demo_api::client::ClientError;
use demo_api::store::MemoryStore;

mod common;

#[tokio::test]
async fn test_hello_on_empty_log() {
    let server = common::start_server(common::config_for("api-0"), MemoryStore::new()).await;
    let client = server.client();

    let empty = client.list().await.unwrap();
    assert_eq!(empty.count, 0);
    assert!(empty.messages.is_empty());

    let created = client.post("hello").await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.text, "hello");
    assert_eq!(created.origin, "api-0");

    let list = client.list().await.unwrap();
    assert_eq!(list.count, 1);
    assert_eq!(list.messages, vec![created]);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_empty_text_is_a_client_error() {
    let server = common::start_server(common::config_for("api-0"), MemoryStore::new()).await;
    let client = server.client();

    for text in ["", "   "] {
        match client.post(text).await {
            Err(ClientError::Status { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Message text cannot be empty");
            }
            other => panic!("expected 400, got {:?}", other),
        }
    }
    assert_eq!(client.list().await.unwrap().count, 0);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_two_messages_in_order() {
    let server = common::start_server(common::config_for("api-0"), MemoryStore::new()).await;
    let client = server.client();

    client.post("a").await.unwrap();
    client.post("b").await.unwrap();

    let first = client.list().await.unwrap();
    let pairs: Vec<(u64, &str)> = first
        .messages
        .iter()
        .map(|m| (m.id, m.text.as_str()))
        .collect();
    assert_eq!(pairs, vec![(1, "a"), (2, "b")]);

    // Reading twice with no writes in between gives the same contents.
    let second = client.list().await.unwrap();
    assert_eq!(first.messages, second.messages);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_status_reports_identity() {
    let mut config = common::config_for("api-7f9c");
    config.service.environment = "staging".into();
    let server = common::start_server(config, MemoryStore::new()).await;
    let client = server.client();

    let status = client.status().await.unwrap();
    assert_eq!(status.status, "healthy");
    assert_eq!(status.service, "Demo API");
    assert_eq!(status.environment, "staging");
    assert_eq!(status.hostname, "api-7f9c");

    assert_eq!(client.health().await.unwrap().status, "ok");
    assert_eq!(client.ready().await.unwrap().status, "ready");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_replicas_sharing_a_store_interleave() {
    // Two processes behind a load balancer, one shared store.
    let store = MemoryStore::new();
    let a = common::start_server(common::config_for("api-a"), store.clone()).await;
    let b = common::start_server(common::config_for("api-b"), store.clone()).await;

    a.client().post("from a").await.unwrap();
    b.client().post("from b").await.unwrap();
    a.client().post("from a again").await.unwrap();

    let list = b.client().list().await.unwrap();
    let seen: Vec<(u64, &str)> = list
        .messages
        .iter()
        .map(|m| (m.id, m.origin.as_str()))
        .collect();
    assert_eq!(seen, vec![(1, "api-a"), (2, "api-b"), (3, "api-a")]);

    a.shutdown.trigger();
    b.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let server = common::start_server(common::config_for("api-0"), MemoryStore::new()).await;
    server.client().post("before shutdown").await.unwrap();

    server.shutdown.trigger();
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop in time")
        .unwrap();
    assert!(result.is_ok());
}
