//! REST surface tests against a live server.

#![allow(clippy::panic)]

mod common;

use serde_json::{Value, json};

use common::start;

async fn get(url: String) -> (reqwest::StatusCode, Value) {
    let Ok(response) = reqwest::get(&url).await else {
        panic!("GET {url} failed");
    };
    let status = response.status();
    let Ok(body) = response.json::<Value>().await else {
        panic!("GET {url} returned non-json");
    };
    (status, body)
}

fn library() -> tempfile::TempDir {
    let Ok(tmp) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    let scores = [
        ("bach-minuet", r#"{"title":"Minuet in G","measures":[{"time_signature":"3/4"}]}"#),
        ("scales", r#"{"measures":[]}"#),
    ];
    for (id, doc) in scores {
        if std::fs::write(tmp.path().join(format!("{id}.json")), doc).is_err() {
            panic!("write {id}");
        }
    }
    tmp
}

#[tokio::test]
async fn health_reports_sessions() {
    let tmp = library();
    let (addr, _state) = start(tmp.path(), true).await;

    let (status, body) = get(format!("http://{addr}/health")).await;
    assert!(status.is_success());
    assert_eq!(body.get("status"), Some(&json!("healthy")));
    assert_eq!(body.get("sessions"), Some(&json!(0)));
}

#[tokio::test]
async fn lists_and_fetches_scores() {
    let tmp = library();
    let (addr, _state) = start(tmp.path(), true).await;

    let (status, body) = get(format!("http://{addr}/api/v1/scores")).await;
    assert!(status.is_success());
    assert_eq!(
        body,
        json!({
            "data": [
                {"id": "bach-minuet", "title": "Minuet in G"},
                {"id": "scales", "title": "scales"}
            ],
            "total": 2
        })
    );

    let (status, body) = get(format!("http://{addr}/api/v1/scores/bach-minuet")).await;
    assert!(status.is_success());
    assert_eq!(
        body.pointer("/measures/0/time_signature"),
        Some(&json!("3/4"))
    );
}

#[tokio::test]
async fn rejects_path_traversal() {
    let tmp = library();
    let (addr, _state) = start(tmp.path(), true).await;

    let (status, body) = get(format!("http://{addr}/api/v1/scores/..%2F..%2Fetc%2Fpasswd")).await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(body.pointer("/error/code"), Some(&json!(1001)));
}

#[tokio::test]
async fn unknown_score_is_not_found() {
    let tmp = library();
    let (addr, _state) = start(tmp.path(), true).await;

    let (status, _) = get(format!("http://{addr}/api/v1/scores/passacaglia")).await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
}
