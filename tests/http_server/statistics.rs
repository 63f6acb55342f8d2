use queue_watch::{
    models::{FinalizedHourRecord, HourKey},
    persistence::StatisticsSink,
    test_helpers::at_on,
};

use crate::helpers::*;

async fn seed(server: &TestServer) {
    for (day, hour, count) in [(4, 23, 9), (5, 10, 42), (5, 11, 6), (6, 0, 1)] {
        let record = FinalizedHourRecord::for_bucket(HourKey::containing(at_on(day, hour, 0)), count);
        server.statistics.append(&record).await.unwrap();
    }
}

#[tokio::test]
async fn statistics_are_grouped_by_date() {
    let server = TestServer::new().await;
    seed(&server).await;

    let resp = server.get("/statistics?from=05.03.2025&to=06.03.2025").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["total"], 49);
    assert_eq!(body["days"][0]["date"], "05.03.2025");
    assert_eq!(body["days"][0]["total"], 48);
    assert_eq!(body["days"][0]["hours"][0]["hours"], "10-11");
    assert_eq!(body["days"][0]["hours"][0]["count"], 42);
    assert_eq!(body["days"][1]["date"], "06.03.2025");
    assert_eq!(body["days"].as_array().unwrap().len(), 2);

    server.shutdown().await;
}

#[tokio::test]
async fn statistics_reject_bad_dates() {
    let server = TestServer::new().await;

    let resp = server.get("/statistics?from=2025-03-05&to=06.03.2025").await;
    assert_eq!(resp.status(), 400);

    let resp = server.get("/statistics?from=06.03.2025&to=05.03.2025").await;
    assert_eq!(resp.status(), 400);

    server.shutdown().await;
}

#[tokio::test]
async fn statistics_empty_range() {
    let server = TestServer::new().await;

    let body: serde_json::Value =
        server.get("/statistics?from=01.01.2024&to=31.01.2024").await.json().await.unwrap();

    assert_eq!(body["total"], 0);
    assert_eq!(body["days"], serde_json::json!([]));

    server.shutdown().await;
}
