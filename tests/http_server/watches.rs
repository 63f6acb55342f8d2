use queue_watch::test_helpers::id;
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn add_watch_requires_auth() {
    let server = TestServer::new().await;

    let resp = server
        .post("/watches")
        .json(&json!({ "identifier": "AB123", "threshold": 3, "subscriber": "42" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
    assert!(server.tracker.watch(&id("AB123")).await.is_none());

    server.shutdown().await;
}

#[tokio::test]
async fn add_get_and_remove_watch() {
    let server = TestServer::new().await;

    // 1. Successful creation, identifier is normalized
    let resp = server
        .post("/watches")
        .bearer_auth(API_KEY)
        .json(&json!({ "identifier": " ab123 ", "threshold": 3, "subscriber": "42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201, "Failed to create watch");
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["watch"]["identifier"], "AB123");
    assert_eq!(body["watch"]["threshold"], 3);
    assert_eq!(body["watch"]["subscriber"], "42");
    assert!(body["watch"]["last_position"].is_null());
    assert_eq!(body["replaced"], false);

    // 2. Lookup is public and normalizes too
    let resp = server.get("/watches/ab123").await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["watch"]["identifier"], "AB123");

    // 3. Re-adding replaces the watch
    let resp = server
        .post("/watches")
        .bearer_auth(API_KEY)
        .json(&json!({ "identifier": "AB123", "threshold": 5, "subscriber": "43" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["replaced"], true);
    assert_eq!(body["watch"]["threshold"], 5);

    // 4. Removal
    let resp = server.delete("/watches/AB123").bearer_auth(API_KEY).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["removed"], true);

    // 5. Removal is idempotent
    let resp = server.delete("/watches/AB123").bearer_auth(API_KEY).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["removed"], false);

    let resp = server.get("/watches/AB123").await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Watch not found");

    server.shutdown().await;
}

#[tokio::test]
async fn add_watch_rejects_invalid_input() {
    let server = TestServer::new().await;

    for payload in [
        json!({ "identifier": "AB123", "threshold": 0, "subscriber": "42" }),
        json!({ "identifier": "   ", "threshold": 3, "subscriber": "42" }),
        json!({ "identifier": "AB123", "threshold": 3, "subscriber": "" }),
        json!({ "identifier": "AB123", "threshold": -1, "subscriber": "42" }),
    ] {
        let resp =
            server.post("/watches").bearer_auth(API_KEY).json(&payload).send().await.unwrap();
        assert_eq!(resp.status(), 422, "payload {payload} should be rejected");
    }

    assert_eq!(server.tracker.watch_count().await, 0);

    server.shutdown().await;
}

#[tokio::test]
async fn remove_watch_requires_auth() {
    let server = TestServer::new().await;

    let resp = server.delete("/watches/AB123").bearer_auth("wrong-key").send().await.unwrap();
    assert_eq!(resp.status(), 401);

    server.shutdown().await;
}
