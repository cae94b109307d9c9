use std::{future::Future, time::Duration};

use fractic_server_error::ServerError;
use tracing::warn;

use crate::errors::LoadTimedOut;

/// Waits for `fut` at most `limit`. On expiry the wait is abandoned and
/// `LoadTimedOut` returned; the underlying request is not cancelled
/// server-side and its eventual result is dropped.
pub(crate) async fn within<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T, ServerError>
where
    F: Future<Output = Result<T, ServerError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, ?limit, "operation timed out");
            Err(LoadTimedOut::new(operation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_fast_results() {
        let result = within(Duration::from_secs(1), "fast", async { Ok::<_, ServerError>(7) }).await;
        assert_eq!(result.ok(), Some(7));
    }

    #[tokio::test]
    async fn gives_up_on_slow_futures() {
        let result = within(Duration::from_millis(10), "slow", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ServerError>(())
        })
        .await;
        assert!(result.is_err());
    }
}
