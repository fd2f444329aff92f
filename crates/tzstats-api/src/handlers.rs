//! HTTP handlers.
//!
//! `/metrics` runs a fresh collection pass per request. A failed pass is
//! logged and answered with an empty 200 so the scrape target stays up.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use tzstats_metrics::render_prometheus;

use crate::ApiState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Response wrapper for consistent JSON format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
        })
    }
}

#[derive(serde::Serialize)]
struct Health<'a> {
    status: &'static str,
    network: &'a str,
    accounts: usize,
    metrics: usize,
}

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = match state.collector.collect().await {
        Ok(samples) => render_prometheus(&samples),
        Err(e) => {
            error!(error = %e, "collection pass failed");
            String::new()
        }
    };

    (
        StatusCode::OK,
        [("content-type", PROMETHEUS_CONTENT_TYPE)],
        body,
    )
}

/// GET /healthz
pub async fn healthz(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(Health {
        status: "ok",
        network: state.collector.network(),
        accounts: state.collector.accounts().len(),
        metrics: state.collector.registry().len(),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::to_bytes;
    use tzstats_client::{ClientError, ClientResult, StatsApi};
    use tzstats_core::{AccountSnapshot, TipSnapshot};
    use tzstats_metrics::{Collector, MetricRegistry};

    struct FixedApi {
        tip_ok: bool,
    }

    #[async_trait]
    impl StatsApi for FixedApi {
        async fn get_account(&self, _hash: &str) -> ClientResult<AccountSnapshot> {
            Ok([("total_balance", 42.0)].into_iter().collect())
        }

        async fn get_explorer_tip(&self) -> ClientResult<TipSnapshot> {
            if self.tip_ok {
                Ok([("height", 10.0), ("cycle", 3.0)].into_iter().collect())
            } else {
                Err(ClientError::Status {
                    status: 502,
                    url: "fake://explorer/tip".to_string(),
                })
            }
        }
    }

    fn test_state(tip_ok: bool) -> ApiState {
        let collector = Collector::new(
            Arc::new(FixedApi { tip_ok }),
            Arc::new(MetricRegistry::new()),
            vec!["tz1abc".to_string()],
            "mainnet",
        );
        ApiState {
            collector: Arc::new(collector),
        }
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn prometheus_endpoint_returns_text() {
        let resp = prometheus_metrics(State(test_state(true))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.contains("text/plain"));

        let body = body_string(resp).await;
        assert!(body.contains("tzstats_total_balance{hash=\"tz1abc\",network=\"mainnet\"} 42\n"));
        assert!(body.contains("tzstats_cycle{network=\"mainnet\"} 3\n"));
    }

    #[tokio::test]
    async fn failed_pass_returns_empty_ok() {
        let resp = prometheus_metrics(State(test_state(false))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn healthz_reports_configuration() {
        let resp = healthz(State(test_state(false))).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["network"], "mainnet");
        assert_eq!(body["data"]["accounts"], 1);
        assert_eq!(body["data"]["metrics"], 33);
    }
}
