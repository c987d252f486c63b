use crate::errors::{Error, Result};
use crate::model::Reading;
use crate::range::TimeRange;
use crate::validate::validate;
use tracing::debug;

/// Client for the telemetry query API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetches all readings for `device_id` within `range`. Non-2xx statuses
    /// carry the response body; decoded readings are value-checked before
    /// being returned.
    pub async fn fetch_readings(
        &self,
        device_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<Reading>> {
        if device_id.is_empty() {
            return Err(Error::MissingParameter("device id"));
        }

        debug!(
            "GET {} id={} start={} end={}",
            self.base_url, device_id, range.start, range.end
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("id", device_id.to_string()),
                ("start", range.start.to_string()),
                ("end", range.end.to_string()),
            ])
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Network {
                status: status.as_u16(),
                body,
            });
        }

        let readings: Vec<Reading> = serde_json::from_str(&body)?;
        for reading in &readings {
            validate(reading)?;
        }

        debug!("Fetched {} readings for {}", readings.len(), device_id);
        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};

    const TEST_KEY: &str = "secret";

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn mixed_device_payload() -> serde_json::Value {
        serde_json::json!([
            { "id": "dev1", "timestamp": "2024-01-02T00:00:00Z", "temperature": 21.5, "humidity": 40.0 },
            { "id": "dev2", "timestamp": "2024-01-01T12:00:00Z", "temperature": 25.0, "humidity": 50.0 },
            { "id": "dev1", "timestamp": "2024-01-01T00:00:00Z", "temperature": 20.0, "humidity": 38.0 }
        ])
    }

    async fn keyed_handler(headers: HeaderMap) -> axum::response::Response {
        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_KEY) {
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        }
        Json(mixed_device_payload()).into_response()
    }

    #[tokio::test]
    async fn test_fetch_returns_decoded_readings() {
        let base = serve(Router::new().route("/", get(keyed_handler))).await;
        let client = ApiClient::new(base, TEST_KEY.to_string());

        let range = TimeRange { start: 0, end: 2_000_000_000 };
        let readings = client.fetch_readings("dev1", &range).await.unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].id, "dev1");
        assert_eq!(readings[0].temperature, 21.5);
    }

    #[tokio::test]
    async fn test_fetch_rejects_wrong_key_as_network_error() {
        let base = serve(Router::new().route("/", get(keyed_handler))).await;
        let client = ApiClient::new(base, "wrong".to_string());

        let range = TimeRange { start: 0, end: 1 };
        let err = client.fetch_readings("dev1", &range).await.unwrap_err();
        assert!(matches!(err, Error::Network { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_fetch_carries_error_body_on_server_failure() {
        let app = Router::new().route(
            "/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;
        let client = ApiClient::new(base, TEST_KEY.to_string());

        let range = TimeRange { start: 0, end: 1 };
        match client.fetch_readings("dev1", &range).await.unwrap_err() {
            Error::Network { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_body() {
        let app = Router::new().route("/", get(|| async { "not json" }));
        let base = serve(app).await;
        let client = ApiClient::new(base, TEST_KEY.to_string());

        let range = TimeRange { start: 0, end: 1 };
        let err = client.fetch_readings("dev1", &range).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_out_of_range_values() {
        let app = Router::new().route(
            "/",
            get(|| async {
                Json(serde_json::json!([
                    { "id": "dev1", "timestamp": "2024-01-01T00:00:00Z", "temperature": 999.0, "humidity": 40.0 }
                ]))
            }),
        );
        let base = serve(app).await;
        let client = ApiClient::new(base, TEST_KEY.to_string());

        let range = TimeRange { start: 0, end: 1 };
        let err = client.fetch_readings("dev1", &range).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_fetch_accepts_empty_array() {
        let app = Router::new().route("/", get(|| async { Json(serde_json::json!([])) }));
        let base = serve(app).await;
        let client = ApiClient::new(base, TEST_KEY.to_string());

        let range = TimeRange { start: 0, end: 1 };
        let readings = client.fetch_readings("dev1", &range).await.unwrap();
        assert!(readings.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_requires_device_before_any_request() {
        // Unroutable address: reaching the network would hang or error
        // differently, so MissingParameter proves the early return.
        let client = ApiClient::new("http://127.0.0.1:1/".to_string(), TEST_KEY.to_string());
        let range = TimeRange { start: 0, end: 1 };
        let err = client.fetch_readings("", &range).await.unwrap_err();
        assert!(matches!(err, Error::MissingParameter(_)));
    }
}
