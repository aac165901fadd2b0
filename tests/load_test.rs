//! Load testing for the message API.

use std::collections::HashSet;
use std::time::Instant;

use demo_api::config::IdStrategy;
use demo_api::store::MemoryStore;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_get_unique_ids() {
    let mut config = common::config_for("api-load");
    config.store.id_strategy = IdStrategy::Counter;
    let server = common::start_server(config, MemoryStore::new()).await;

    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let start = Instant::now();
    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = server.client();
        tasks.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for i in 0..requests_per_task {
                let msg = client.post(&format!("task {} msg {}", task, i)).await.unwrap();
                ids.push(msg.id);
            }
            ids
        }));
    }

    let mut ids = HashSet::new();
    for task in tasks {
        for id in task.await.unwrap() {
            assert!(ids.insert(id), "duplicate id {}", id);
        }
    }
    let elapsed = start.elapsed();
    println!(
        "{} appends in {:?} ({:.0} req/s)",
        total_requests,
        elapsed,
        total_requests as f64 / elapsed.as_secs_f64()
    );

    assert_eq!(ids, (1..=total_requests as u64).collect::<HashSet<_>>());
    let list = server.client().list().await.unwrap();
    assert_eq!(list.count, total_requests);

    server.shutdown.trigger();
}
