//! Single HTTP fetch against a monitored target.

use std::time::Instant;

use chrono::Utc;

use crate::stats::PollResult;

/// Perform one GET against `url` and classify the outcome.
///
/// A response with status in `200..400` counts as ok; the body is read to
/// completion whenever a response arrived so the measured duration covers
/// the full transfer. Transport-level failures (timeout, DNS, connection
/// refused) are absorbed into a failed result with zero size, never
/// returned as an error. Timeout policy belongs to the shared client.
pub async fn fetch_once(client: &reqwest::Client, url: &str) -> PollResult {
    let date = Utc::now();
    let start = Instant::now();

    let mut ok = false;
    let mut size_kib = 0;

    match client.get(url).send().await {
        Ok(response) => {
            ok = response.status().as_u16() >= 200 && response.status().as_u16() < 400;

            if let Ok(body) = response.bytes().await {
                size_kib = body.len() as u64 / 1024;
            }
        }
        Err(err) => {
            tracing::debug!(%url, error = %err, "fetch failed");
        }
    }

    PollResult {
        date,
        duration: start.elapsed(),
        ok,
        size_kib,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_success_measures_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 3 * 1024]))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_once(&client, &format!("{}/big", server.uri())).await;

        assert!(result.ok);
        assert_eq!(result.size_kib, 3);
    }

    #[tokio::test]
    async fn test_fetch_error_status_not_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_once(&client, &format!("{}/missing", server.uri())).await;

        assert!(!result.ok);
    }

    #[tokio::test]
    async fn test_fetch_redirect_status_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_once(&client, &format!("{}/moved", server.uri())).await;

        assert!(result.ok);
        assert_eq!(result.size_kib, 0);
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_absorbed() {
        // Nothing listens here; connection is refused.
        let client = reqwest::Client::new();
        let result = fetch_once(&client, "http://127.0.0.1:1/").await;

        assert!(!result.ok);
        assert_eq!(result.size_kib, 0);
    }

    #[tokio::test]
    async fn test_fetch_timeout_absorbed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let result = fetch_once(&client, &format!("{}/slow", server.uri())).await;

        assert!(!result.ok);
        assert_eq!(result.size_kib, 0);
    }
}
