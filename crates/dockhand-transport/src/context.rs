//! Per-call cancellation and deadlines.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// A cloneable handle that aborts in-flight requests.
///
/// All clones share one flag; cancelling any of them cancels every request
/// that was given a context holding this token.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// Create a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Cancel every request holding this token.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves when the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Options that govern a single API call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl CallContext {
    /// A context with no deadline of its own and no cancel token.
    ///
    /// The transport's configured default timeout still applies.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Override the transport's default timeout for this call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancel token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Timeout override, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Cancel token, if any.
    #[must_use]
    pub const fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    /// Returns true if the attached token has already fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_has_no_overrides() {
        let ctx = CallContext::background();
        assert!(ctx.timeout().is_none());
        assert!(ctx.cancel_token().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn clones_share_cancellation() {
        let token = CancelToken::new();
        let ctx = CallContext::background().with_cancel(token.clone());
        assert!(!ctx.is_cancelled());

        token.cancel();
        assert!(ctx.is_cancelled());
        assert!(token.clone().is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let token = CancelToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        tokio::task::yield_now().await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() did not resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("cancelled() did not resolve");
    }
}
