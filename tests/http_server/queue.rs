use queue_watch::test_helpers::{at, snapshot};

use crate::helpers::*;

#[tokio::test]
async fn count_is_null_before_first_poll() {
    let server = TestServer::new().await;

    let resp = server.get("/queue/count").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["count"].is_null());
    assert!(body["updated_at"].is_null());

    server.shutdown().await;
}

#[tokio::test]
async fn count_follows_polls() {
    let server = TestServer::new().await;

    server.tracker.apply_cycle(Some(snapshot(&[("A", 1), ("B", 2), ("C", 3)])), at(10, 5)).await.unwrap();
    let body: serde_json::Value = server.get("/queue/count").await.json().await.unwrap();
    assert_eq!(body["count"], 3);

    server.tracker.apply_cycle(None, at(10, 6)).await.unwrap();
    let body: serde_json::Value = server.get("/queue/count").await.json().await.unwrap();
    assert!(body["count"].is_null());
    assert_eq!(body["updated_at"], "2025-03-05T10:06:00");

    server.shutdown().await;
}
