//! Call context threaded from the caller to the handler.
//!
//! The bridge never creates, reads, or enforces deadlines. A [`CallContext`]
//! is passed through every dispatch boundary exactly as the caller built it,
//! and handlers decide whether to honour it.
//!
//! # Example
//!
//! ```ignore
//! async fn slow(svc: Arc<Reports>, ctx: CallContext, req: ReportRequest)
//!     -> Result<Report, HandlerError>
//! {
//!     // Give up as soon as the caller cancels or the deadline passes.
//!     let report = ctx.run(svc.build(req)).await??;
//!     Ok(report)
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Why a context-guarded future did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The caller cancelled the call.
    #[error("call cancelled")]
    Cancelled,
    /// The caller's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation, deadline and trace data for one call.
///
/// `CallContext` is `Clone` and cheap to share across tasks; clones observe
/// the same cancellation token.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Request or trace identifier supplied by the host.
    request_id: Option<Arc<str>>,
    /// Point in time after which the caller stops waiting.
    deadline: Option<Instant>,
    /// Cancellation signal owned by the caller.
    cancel: CancellationToken,
}

impl CallContext {
    /// Create an empty context: no id, no deadline, not cancelled.
    pub fn new() -> Self {
        Self {
            request_id: None,
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach a request/trace identifier.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(Arc::from(request_id.into()));
        self
    }

    /// Attach an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Use a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Get the request identifier.
    #[inline]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Get the deadline.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Get the cancellation token.
    #[inline]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Check whether the caller has cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Check whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Drive `fut` until it completes, the caller cancels, or the deadline
    /// passes, whichever happens first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, ContextError> {
        if self.is_cancelled() {
            return Err(ContextError::Cancelled);
        }

        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(ContextError::Cancelled),
                _ = tokio::time::sleep_until(deadline) => Err(ContextError::DeadlineExceeded),
                out = fut => Ok(out),
            },
            None => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(ContextError::Cancelled),
                out = fut => Ok(out),
            },
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}
