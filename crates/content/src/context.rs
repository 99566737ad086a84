//! Operation context for content operations.
//!
//! Every store operation takes an [`OperationContext`]. It carries request
//! metadata for logging (correlation and user IDs) and the two ways an
//! operation can be aborted: an explicit cancellation flag shared with a
//! [`CancelHandle`], and an optional deadline.
//!
//! Stores call [`OperationContext::ensure_active`] when an operation starts and
//! again right before it commits, so an aborted operation never leaves a
//! partial mutation behind.
//!
//! ```
//! use std::time::Duration;
//! use mddb_content::context::OperationContext;
//!
//! let ctx = OperationContext::new()
//!     .with_correlation_id("req-42")
//!     .with_timeout(Duration::from_secs(5));
//! assert!(ctx.ensure_active().is_ok());
//!
//! let handle = ctx.cancel_handle();
//! handle.cancel();
//! assert!(ctx.ensure_active().is_err());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{ContentResult, OperationError};

/// Request-scoped context passed to every content operation.
#[derive(Debug, Clone)]
pub struct OperationContext {
    cancelled: Arc<AtomicBool>,
    started_at: Instant,
    deadline: Option<Instant>,
    correlation_id: Option<String>,
    user_id: Option<String>,
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationContext {
    /// Creates a context with no deadline that is not cancelled.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            started_at: Instant::now(),
            deadline: None,
            correlation_id: None,
            user_id: None,
        }
    }

    /// Sets a deadline relative to now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the correlation ID used in log records.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Sets the acting user's ID for log records.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Returns a handle that cancels this context (and its clones).
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: self.cancelled.clone(),
        }
    }

    /// Returns the correlation ID, if set.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns the user ID, if set.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the deadline, if set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if the context was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fails if the context has been cancelled or its deadline has passed.
    pub fn ensure_active(&self) -> ContentResult<()> {
        if self.is_cancelled() {
            return Err(OperationError::Cancelled.into());
        }
        if let Some(deadline) = self.deadline {
            let now = Instant::now();
            if now >= deadline {
                return Err(OperationError::DeadlineExceeded {
                    elapsed: now.duration_since(self.started_at),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Cancels an [`OperationContext`] from another task.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Marks the associated context as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
