use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// Cancellation and deadline carried through every engine call.
///
/// Cloning shares the token, so cancelling any clone aborts all of them.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    token: CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context tied to an existing token, e.g. the server's shutdown token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets a deadline `timeout` from now. A zero timeout leaves the context unbounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.deadline = Some((Instant::now() + timeout, timeout));
        }
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `fut` unless the context is cancelled or its deadline passes first.
    ///
    /// An already cancelled context never polls `fut`.
    pub async fn run<F, T>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let bounded = async {
            match self.deadline {
                Some((deadline, after)) => tokio::time::timeout_at(deadline, fut)
                    .await
                    .map_err(|_| AppError::Timeout { after })?,
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AppError::Cancelled),
            result = bounded => result,
        }
    }
}
