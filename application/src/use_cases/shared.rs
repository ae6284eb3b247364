//! Shared utilities for use cases.
//!
//! Contains cancellation checking and the deadline wrapper every external
//! call in the pipeline goes through (dataset loads and model calls).

use crate::ports::llm_gateway::GatewayError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why a guarded call did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interruption {
    Timeout,
    Cancelled,
}

impl From<Interruption> for GatewayError {
    fn from(interruption: Interruption) -> Self {
        match interruption {
            Interruption::Timeout => GatewayError::Timeout,
            Interruption::Cancelled => GatewayError::Cancelled,
        }
    }
}

/// Check if cancellation has been requested.
pub(crate) fn check_cancelled<E: From<Interruption>>(token: &CancellationToken) -> Result<(), E> {
    if token.is_cancelled() {
        return Err(Interruption::Cancelled.into());
    }
    Ok(())
}

/// Run `call` under an optional timeout, abandoning it if `token` fires.
pub(crate) async fn guarded<T, E, F>(
    call: F,
    timeout: Option<Duration>,
    token: &CancellationToken,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<Interruption>,
{
    check_cancelled::<E>(token)?;

    let bounded = async move {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(Interruption::Timeout.into()),
            },
            None => call.await,
        }
    };

    tokio::select! {
        _ = token.cancelled() => Err(Interruption::Cancelled.into()),
        result = bounded => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guarded_passes_result_through() {
        let token = CancellationToken::new();
        let result = guarded(async { Ok::<_, GatewayError>(7) }, None, &token).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guarded_times_out() {
        let token = CancellationToken::new();
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, GatewayError>(())
        };
        let result = guarded(slow, Some(Duration::from_secs(1)), &token).await;
        assert_eq!(result, Err(GatewayError::Timeout));
    }

    #[tokio::test]
    async fn test_guarded_respects_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();
        let result = guarded(async { Ok::<_, GatewayError>(1) }, None, &token).await;
        assert_eq!(result, Err(GatewayError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guarded_cancelled_mid_call() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            child.cancel();
        });
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, GatewayError>(())
        };
        let result = guarded(slow, None, &token).await;
        assert_eq!(result, Err(GatewayError::Cancelled));
    }
}
