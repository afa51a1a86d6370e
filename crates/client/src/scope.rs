//! Cancellation of in-flight requests.
//!
//! A [`RequestScope`] is owned by whoever renders the result of a fetch (a
//! page view, an HTTP handler). Fetches run through [`RequestScope::run`]
//! resolve to [`ClientError::Cancelled`] once the scope is cancelled, and
//! dropping the scope cancels it. A response that arrives after teardown
//! is therefore discarded instead of overwriting newer state.
//!
//! [`Navigation`] hands out one scope per navigation and cancels the
//! previous one, so at most one navigation's requests are live.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

#[derive(Debug, Default)]
pub struct RequestScope {
    token: CancellationToken,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope cancelled together with this one (but not the reverse).
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token observing this scope, for tasks that outlive the borrow.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Drive `fut` unless the scope is cancelled first.
    ///
    /// Cancellation wins when both are ready in the same poll.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        tokio::select! {
            biased;
            () = self.token.cancelled() => {
                tracing::debug!("Request scope cancelled, dropping in-flight request");
                Err(ClientError::Cancelled)
            }
            result = fut => result,
        }
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Issues a fresh [`RequestScope`] per navigation.
#[derive(Debug, Default)]
pub struct Navigation {
    current: Mutex<CancellationToken>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation. The previous navigation's scope is cancelled.
    pub fn begin(&self) -> RequestScope {
        let token = CancellationToken::new();
        let previous = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, token.clone())
        };
        previous.cancel();
        RequestScope { token }
    }

    /// Cancel the current navigation without starting a new one.
    pub fn cancel(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }
}
