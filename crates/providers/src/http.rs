//! Shared HTTP plumbing: client construction, the overall deadline, and
//! mapping transport/status failures onto [`ModelError`].

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use stylecraft_core::ModelError;

/// Longest body excerpt carried in an error message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Upper bound for one health probe.
pub(crate) const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the pooled HTTP client shared by every request of one backend.
///
/// No client-level timeout is set; each call is bounded by [`with_deadline`].
pub(crate) fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Run one whole exchange (send + body read) under `timeout`.
///
/// On expiry the exchange future is dropped, which aborts the request and
/// releases its connection.
pub(crate) async fn with_deadline<T>(
    timeout: Duration,
    exchange: impl Future<Output = Result<T, ModelError>>,
) -> Result<T, ModelError> {
    match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(ModelError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Probe `request` under `timeout`; any 2xx counts as healthy.
pub(crate) async fn probe(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<bool, ModelError> {
    with_deadline(timeout, async {
        let response = request
            .send()
            .await
            .map_err(|e| classify_transport(e, timeout))?;
        Ok(response.status().is_success())
    })
    .await
}

/// Classify a transport-level failure.
pub(crate) fn classify_transport(e: reqwest::Error, timeout: Duration) -> ModelError {
    if e.is_timeout() {
        ModelError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else if e.is_decode() {
        ModelError::MalformedResponse(e.to_string())
    } else {
        ModelError::Unreachable(e.to_string())
    }
}

/// Classify a non-success HTTP status.
///
/// Gateway-style statuses mean nothing is serving the model; anything else
/// is an answer we cannot use.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> ModelError {
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ModelError::Unreachable(format!("HTTP {status}: {}", excerpt(body)))
        }
        _ => ModelError::MalformedResponse(format!("HTTP {status}: {}", excerpt(body))),
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_statuses_mean_unreachable() {
        for status in [
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::GATEWAY_TIMEOUT,
        ] {
            assert!(matches!(
                classify_status(status, ""),
                ModelError::Unreachable(_)
            ));
        }
    }

    #[test]
    fn other_statuses_are_malformed() {
        let err = classify_status(StatusCode::NOT_FOUND, "model 'qwen2:0.5b' not found");
        match err {
            ModelError::MalformedResponse(msg) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("not found"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let err = classify_status(StatusCode::BAD_REQUEST, &body);
        assert!(err.to_string().len() < 300);
    }

    #[tokio::test]
    async fn deadline_fires() {
        let err = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ModelError>(())
        })
        .await
        .unwrap_err();
        assert_eq!(err, ModelError::Timeout { timeout_ms: 10 });
    }
}
