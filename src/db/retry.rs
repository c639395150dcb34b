use std::future::Future;

use sea_orm::DbErr;
use tracing::warn;

use crate::config::RetryPolicy;
use crate::error::ErrorKind;

/// Run a read query, retrying transient failures up to `policy.max_attempts` times.
///
/// Errors classified as not-found, unauthorized, conflict or invalid are
/// returned immediately. Only use this for reads; writes are never retried.
pub async fn with_read_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let kind = ErrorKind::classify(&e);
                if !kind.is_retryable() || attempt >= policy.max_attempts {
                    return Err(e);
                }

                warn!(attempt, ?kind, "{label} failed, retrying: {e}");
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn transient_errors_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result = with_read_retry(&policy(3), "list events", move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(DbErr::Custom("connection reset".to_string()))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<(), DbErr> = with_read_retry(&policy(2), "list events", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DbErr::Custom("still down".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_never_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<(), DbErr> = with_read_retry(&policy(5), "get event", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DbErr::RecordNotFound("Event not found".to_string()))
        })
        .await;

        assert!(matches!(result, Err(DbErr::RecordNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
