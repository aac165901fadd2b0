//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap store connects and commands with a deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out store calls surface as 503 Service Unavailable

use std::future::Future;
use std::time::Duration;

use crate::store::{StoreError, StoreResult};

/// Run a store future under `limit`, turning an elapsed deadline into
/// [`StoreError::Timeout`].
pub async fn with_deadline<F, T>(limit: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            millis: limit.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_future_passes_through() {
        let result = with_deadline(Duration::from_millis(100), async { Ok(7u64) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_inner_error_is_preserved() {
        let result: StoreResult<()> = with_deadline(Duration::from_millis(100), async {
            Err(StoreError::Command("WRONGTYPE".into()))
        })
        .await;
        assert!(matches!(result, Err(StoreError::Command(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_future_times_out() {
        let result: StoreResult<()> = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(StoreError::Timeout { millis: 50 })));
    }
}
