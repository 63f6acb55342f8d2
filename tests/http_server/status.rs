use queue_watch::{
    models::SubscriberRef,
    test_helpers::{at, id, snapshot},
};

use crate::helpers::*;

#[tokio::test]
async fn status_endpoint_returns_status_json() {
    let server = TestServer::new().await;

    let resp = server.get("/status").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].as_u64().is_some());
    assert!(body["queue_count"].is_null());
    assert!(body["last_update"].is_null());
    assert_eq!(body["watch_count"], 0);

    server.shutdown().await;
}

#[tokio::test]
async fn status_reflects_tracker_state() {
    let server = TestServer::new().await;
    server.tracker.add_watch(id("AB123"), 3, SubscriberRef::new("42"), at(10, 0)).await.unwrap();
    server.tracker.apply_cycle(Some(snapshot(&[("XY1", 1), ("AB123", 2)])), at(10, 5)).await.unwrap();

    let body: serde_json::Value = server.get("/status").await.json().await.unwrap();

    assert_eq!(body["queue_count"], 2);
    assert_eq!(body["last_update"], "2025-03-05T10:05:00");
    assert_eq!(body["watch_count"], 1);
    assert_eq!(body["current_hour_departures"], 0);

    server.shutdown().await;
}
