//! HTTP transport integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use bson::doc;
use pmservice::store::{DocumentStore, MemoryStore};
use pmservice::types::DocumentId;
use pmservice::{PmService, http};
use serde_json::Value;
use std::sync::Arc;

const JAN_1_2021: i64 = 1_609_459_200_000;

fn seeded_store(n: i64) -> (Arc<MemoryStore>, Vec<DocumentId>) {
    let store = Arc::new(MemoryStore::new("pmData"));
    let ids = (0..n)
        .map(|i| {
            store
                .insert_one(doc! {
                    "date": bson::DateTime::from_millis(JAN_1_2021 + i * 1000),
                    "temp": {"value": 20.0},
                })
                .unwrap()
        })
        .collect();
    (store, ids)
}

/// Bind to port 0 and return the base URL.
async fn start_server(store: Arc<MemoryStore>) -> String {
    let app = http::router(Arc::new(PmService::new(store)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/pmservice")
}

fn is_json(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[tokio::test]
async fn get_all_returns_json_array() {
    let (store, ids) = seeded_store(3);
    let base = start_server(store).await;
    let resp = reqwest::get(&base).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(is_json(&resp));
    let body: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["_id"], ids[0].to_hex());
    assert_eq!(body[0]["date"], "2021-01-01T00:00:00Z");
}

#[tokio::test]
async fn get_by_id_hit_and_miss() {
    let (store, ids) = seeded_store(2);
    let base = start_server(store).await;
    let hit: Vec<Value> = reqwest::get(format!("{base}/{}", ids[1])).await.unwrap().json().await.unwrap();
    assert_eq!(hit.len(), 1);
    assert_eq!(hit[0]["_id"], ids[1].to_hex());
    let miss = reqwest::get(format!("{base}/{}", DocumentId::new())).await.unwrap();
    assert_eq!(miss.status(), 200);
    assert_eq!(miss.json::<Vec<Value>>().await.unwrap(), Vec::<Value>::new());
}

#[tokio::test]
async fn malformed_id_is_400() {
    let (store, _) = seeded_store(1);
    let base = start_server(store).await;
    let resp = reqwest::get(format!("{base}/not-a-real-id")).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not-a-real-id"));
}

#[tokio::test]
async fn query_route_is_not_taken_as_an_id() {
    let (store, _) = seeded_store(4);
    let base = start_server(store).await;
    let resp = reqwest::get(format!("{base}/query?error=1&factor=2&value=temp&amount=2")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(body.len(), 2);
    for d in &body {
        assert_eq!(d["hasError"], true);
        assert_eq!(d["temp"]["value"].as_f64().unwrap(), 40.0);
    }
}

#[tokio::test]
async fn query_date_range_and_precedence() {
    let (store, _) = seeded_store(4);
    let base = start_server(store).await;
    let url = format!(
        "{base}/query?error=0&factor=2&value=temp&startDate={}&endDate={}",
        JAN_1_2021 + 1000,
        JAN_1_2021 + 3000
    );
    let body: Vec<Value> = reqwest::get(url).await.unwrap().json().await.unwrap();
    assert_eq!(body.len(), 2);
    assert!(body.iter().all(|d| d["hasError"] == false));

    let url = format!("{base}/query?error=0&factor=2&value=temp&startDate=0&endDate=1&amount=3");
    let body: Vec<Value> = reqwest::get(url).await.unwrap().json().await.unwrap();
    assert_eq!(body.len(), 3);
}

#[tokio::test]
async fn query_errors_are_client_errors() {
    let (store, _) = seeded_store(1);
    let base = start_server(store).await;
    for url in [
        format!("{base}/query?factor=2&value=temp"),
        format!("{base}/query?error=x&factor=2&value=temp"),
        format!("{base}/query?error=1&factor=2&value=temp&amount=ten"),
        format!("{base}/query?error=1&factor=2&value=nonexistent"),
        format!("{base}/query?error=1&factor=1e309&value=temp"),
        format!("{base}/query?error=NaN&factor=2&value=temp"),
    ] {
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 400, "{url}");
    }
}

#[tokio::test]
async fn delete_is_200_whether_or_not_it_matched() {
    let (store, ids) = seeded_store(2);
    let base = start_server(store.clone()).await;
    let client = reqwest::Client::new();

    let resp = client.delete(format!("{base}/{}", ids[0])).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(store.count().unwrap(), 1);
    let after: Vec<Value> = reqwest::get(format!("{base}/{}", ids[0])).await.unwrap().json().await.unwrap();
    assert!(after.is_empty());

    let resp = client.delete(format!("{base}/{}", ids[0])).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client.delete(format!("{base}/garbage")).send().await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn delete_on_query_path_is_a_malformed_id() {
    let (store, _) = seeded_store(2);
    let base = start_server(store.clone()).await;
    let resp = reqwest::Client::new().delete(format!("{base}/query")).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    assert!(is_json(&resp));
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("query"));
    assert_eq!(store.count().unwrap(), 2);
}

#[tokio::test]
async fn store_outage_is_500() {
    let base = start_server(Arc::new(MemoryStore::offline("pmData"))).await;
    let resp = reqwest::get(&base).await.unwrap();
    assert_eq!(resp.status(), 500);
    let resp = reqwest::Client::new().delete(format!("{base}/{}", DocumentId::new())).send().await.unwrap();
    assert_eq!(resp.status(), 500);
}
