use std::{net::SocketAddr, sync::Arc, time::Duration};

use queue_watch::{
    config::{AppConfig, ServerConfig},
    engine::tracker::QueueTracker,
    http_server,
    test_helpers::{MemoryStatisticsSink, api_state},
};
use reqwest::Client;
use tokio::task;
use tokio_util::sync::CancellationToken;

pub const API_KEY: &str = "test-key";

pub fn create_test_server_config(address: &str) -> AppConfig {
    AppConfig::builder()
        .checkpoint_url("http://localhost/queue")
        .server(ServerConfig {
            enabled: true,
            listen_address: address.into(),
            api_key: Some(API_KEY.to_string()),
        })
        .build()
}

pub struct TestServer {
    pub address: SocketAddr,
    pub server_handle: task::JoinHandle<Result<(), std::io::Error>>,
    pub client: Client,
    pub tracker: Arc<QueueTracker>,
    pub statistics: Arc<MemoryStatisticsSink>,
    cancellation_token: CancellationToken,
}

impl TestServer {
    pub async fn new() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get address");
        drop(listener); // Release port for the app to use

        let (state, statistics) = api_state(create_test_server_config(&addr.to_string()));
        let tracker = state.tracker.clone();
        let cancellation_token = CancellationToken::new();

        // Spawn the actual app server
        let server_token = cancellation_token.clone();
        let server_handle =
            task::spawn(async move { http_server::run_server(state, server_token).await });

        let server = Self {
            address: addr,
            server_handle,
            client: Client::new(),
            tracker,
            statistics,
            cancellation_token,
        };
        server.wait_until_ready().await;
        server
    }

    async fn wait_until_ready(&self) {
        let url = format!("http://{}/health", self.address);
        for _ in 0..50 {
            if self.client.get(&url).send().await.is_ok() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("server at {} did not start", self.address);
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        let url = format!("http://{}{}", self.address, path);
        self.client.get(&url).send().await.expect("Request failed")
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("http://{}{}", self.address, path);
        self.client.post(&url)
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("http://{}{}", self.address, path);
        self.client.delete(&url)
    }

    pub async fn shutdown(self) {
        self.cancellation_token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), self.server_handle)
            .await
            .expect("server did not shut down");
        assert!(result.expect("server task panicked").is_ok());
    }
}
