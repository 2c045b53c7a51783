//! Cancellation and deadline scope for remote calls.
//!
//! A [`CallContext`] is handed to the client at construction and bounds
//! every call the client makes. Cancellation is signalled through a
//! [`CancelHandle`]; deadlines are absolute [`Instant`]s and only ever
//! tighten when derived.

use crate::error::{SecretManagerError, SecretManagerResult};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Cancellation and deadline scope for client calls.
#[derive(Debug, Clone)]
pub struct CallContext {
    cancelled: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every [`CallContext`] derived from the one that created it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub const fn background() -> Self {
        Self {
            cancelled: None,
            deadline: None,
        }
    }

    /// A cancellable context and the handle that cancels it.
    #[must_use]
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancelled: Some(rx),
            deadline: None,
        };
        (ctx, CancelHandle { tx })
    }

    /// Derive a context that expires `timeout` from now, or earlier if this
    /// context already has a tighter deadline.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context expiring at `deadline`, or earlier if this context
    /// already has a tighter deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Deadline of this context, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check if cancellation has been signalled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Check if the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// The error a call started now would fail with, if any.
    #[must_use]
    pub fn err(&self) -> Option<SecretManagerError> {
        if self.is_cancelled() {
            Some(SecretManagerError::Cancelled)
        } else if self.is_expired() {
            Some(SecretManagerError::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Resolves once cancellation is signalled; never if it cannot be.
    async fn cancelled(&self) {
        if let Some(rx) = &self.cancelled {
            let mut rx = rx.clone();
            // A dropped handle can no longer cancel.
            let signalled = rx.wait_for(|cancelled| *cancelled).await.is_ok();
            if signalled {
                return;
            }
        }
        std::future::pending::<()>().await;
    }

    /// Run `call` bounded by this context.
    ///
    /// # Errors
    ///
    /// Returns [`SecretManagerError::Cancelled`] or
    /// [`SecretManagerError::DeadlineExceeded`] if the context ends first,
    /// otherwise whatever `call` returns.
    pub async fn run<F, T>(&self, call: F) -> SecretManagerResult<T>
    where
        F: Future<Output = SecretManagerResult<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let guarded = async {
            tokio::select! {
                biased;
                () = self.cancelled() => Err(SecretManagerError::Cancelled),
                result = call => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(SecretManagerError::DeadlineExceeded)),
            None => guarded.await,
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}
