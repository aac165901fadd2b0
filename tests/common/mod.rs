//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use demo_api::client::MessagesClient;
use demo_api::config::ServiceConfig;
use demo_api::http::HttpServer;
use demo_api::lifecycle::Shutdown;
use demo_api::store::ListStore;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client that never reuses pooled connections across tests.
    pub fn client(&self) -> MessagesClient {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .unwrap();
        MessagesClient::with_client(http, &self.url())
    }
}

/// Start a server for `store` with `config`, ignoring its bind address.
pub async fn start_server<S: ListStore>(config: ServiceConfig, store: S) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    wait_until_listening(addr).await;
    TestServer {
        addr,
        shutdown,
        handle,
    }
}

async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server on {} never came up", addr);
}

/// Default config with a recognisable origin host.
#[allow(dead_code)]
pub fn config_for(hostname: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.service.hostname = hostname.to_string();
    config
}
