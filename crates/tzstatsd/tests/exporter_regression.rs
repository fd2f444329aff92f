//! Exporter regression tests.
//!
//! Wires the real TzStats client, collector and router together against a
//! local stand-in for the TzStats API and scrapes `/metrics` end to end.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::extract::Path;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceExt;

use tzstats_api::build_router;
use tzstats_client::TzStatsClient;
use tzstats_metrics::{Collector, MetricRegistry};

async fn upstream_account(Path(hash): Path<String>) -> Response {
    match hash.as_str() {
        "tz1baker" => Json(json!({
            "address": "tz1baker",
            "total_balance": 125000.5,
            "frozen_deposits": 8000,
            "blocks_baked": 321,
            "next_endorse_height": 1005,
            "next_bake_height": 1060,
            "last_seen_time": "2021-01-01T00:00:00Z"
        }))
        .into_response(),
        "tz1holder" => Json(json!({
            "address": "tz1holder",
            "spendable_balance": 12.25,
            "n_tx": 4
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

async fn upstream_tip() -> Json<serde_json::Value> {
    Json(json!({ "height": 1000, "cycle": 245, "network": "mainnet" }))
}

async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn healthy_upstream() -> String {
    spawn_upstream(
        Router::new()
            .route("/explorer/tip", get(upstream_tip))
            .route("/explorer/account/{hash}", get(upstream_account)),
    )
    .await
}

fn exporter(api_url: &str, accounts: &[&str]) -> Router {
    let client = TzStatsClient::new(api_url, Duration::from_secs(5)).unwrap();
    let collector = Collector::new(
        Arc::new(client),
        Arc::new(MetricRegistry::new()),
        accounts.iter().map(|a| a.to_string()).collect(),
        "mainnet",
    );
    build_router(Arc::new(collector))
}

async fn scrape(router: Router) -> (StatusCode, String) {
    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn sample_lines(body: &str) -> Vec<&str> {
    body.lines().filter(|l| !l.starts_with('#')).collect()
}

#[tokio::test]
async fn scrape_exports_account_derived_and_explorer_metrics() {
    let url = healthy_upstream().await;
    let (status, body) = scrape(exporter(&url, &["tz1baker"])).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("tzstats_total_balance{hash=\"tz1baker\",network=\"mainnet\"} 125000.5\n"));
    assert!(body.contains("tzstats_frozen_deposits{hash=\"tz1baker\",network=\"mainnet\"} 8000\n"));
    assert!(body.contains("tzstats_blocks_baked{hash=\"tz1baker\",network=\"mainnet\"} 321\n"));
    assert!(body.contains("tzstats_next_endorsing{hash=\"tz1baker\",network=\"mainnet\"} 5\n"));
    assert!(body.contains("tzstats_next_baking{hash=\"tz1baker\",network=\"mainnet\"} 60\n"));
    assert!(body.contains("tzstats_cycle{network=\"mainnet\"} 245\n"));
    assert!(body.contains("# TYPE tzstats_cycle gauge\n"));
    assert_eq!(sample_lines(&body).len(), 6);
}

#[tokio::test]
async fn scrape_ignores_fields_outside_registry() {
    let url = healthy_upstream().await;
    let (_, body) = scrape(exporter(&url, &["tz1baker"])).await;

    assert!(!body.contains("address"));
    assert!(!body.contains("last_seen_time"));
    assert!(!body.contains("next_endorse_height"));
    assert!(!body.contains("tzstats_height"));
}

#[tokio::test]
async fn scrape_with_no_accounts_exports_explorer_only() {
    let url = healthy_upstream().await;
    let (status, body) = scrape(exporter(&url, &[])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sample_lines(&body), vec!["tzstats_cycle{network=\"mainnet\"} 245"]);
}

#[tokio::test]
async fn scrape_skips_failing_account() {
    let url = healthy_upstream().await;
    let (status, body) = scrape(exporter(&url, &["tz1unknown", "tz1holder"])).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("tz1unknown"));
    assert!(body.contains("tzstats_spendable_balance{hash=\"tz1holder\",network=\"mainnet\"} 12.25\n"));
    assert!(body.contains("tzstats_n_tx{hash=\"tz1holder\",network=\"mainnet\"} 4\n"));
    assert!(body.contains("tzstats_cycle{network=\"mainnet\"} 245\n"));
}

#[tokio::test]
async fn scrape_orders_accounts_as_configured() {
    let url = healthy_upstream().await;
    let (_, body) = scrape(exporter(&url, &["tz1holder", "tz1baker"])).await;

    let lines = sample_lines(&body);
    assert_eq!(lines.last(), Some(&"tzstats_cycle{network=\"mainnet\"} 245"));
    let holder = body.find("hash=\"tz1holder\"").unwrap();
    let baker = body.find("hash=\"tz1baker\"").unwrap();
    assert!(holder < baker);
}

#[tokio::test]
async fn scrape_with_unreachable_upstream_is_empty_ok() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (status, body) = scrape(exporter(&format!("http://{addr}"), &["tz1baker"])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn repeated_scrapes_are_identical() {
    let url = healthy_upstream().await;
    let router = exporter(&url, &["tz1baker", "tz1holder"]);

    let (_, first) = scrape(router.clone()).await;
    let (_, second) = scrape(router).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn healthz_does_not_touch_upstream() {
    // Upstream is unreachable, liveness still answers.
    let router = exporter("http://127.0.0.1:1", &["tz1baker"]);
    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["accounts"], 1);
}
