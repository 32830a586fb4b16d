//! Retry helpers for making JSON-RPC calls more robust.
//!
//! [`RetryPolicy`] describes how many attempts to make, how long to pause
//! between them, and which errors are worth another attempt. It is applied
//! either directly with [`safe_call`] or by wrapping an operation once with
//! [`RetryPolicy::wrap`] and calling the resulting [`Retrying`] as often as
//! needed.
//!
//! The pause is a fixed delay. When every attempt fails, the caller receives
//! the error from the final attempt itself, not a summary error.
//!
//! # Example
//!
//! ```rust,ignore
//! use fork_seeder::retry::{safe_call, RetryPolicy};
//!
//! let policy = RetryPolicy::new(3, Duration::from_millis(100))?.transient_only();
//! let balance = safe_call(&policy, || client.balance(user)).await?;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{AppError, Result};

/// Default number of attempts.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Trait for errors that can indicate whether they are retryable.
pub trait Retryable {
    /// Returns true if the error is transient and the operation should be retried.
    fn is_retryable(&self) -> bool;
}

type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Fixed-delay retry configuration.
pub struct RetryPolicy<E = AppError> {
    retries: u32,
    delay: Duration,
    /// `None` retries every error.
    retry_if: Option<RetryPredicate<E>>,
}

impl<E> RetryPolicy<E> {
    /// Creates a policy making at most `retries` attempts with `delay` between them.
    ///
    /// `retries` counts every attempt including the first, so it must be at least one.
    pub fn new(retries: u32, delay: Duration) -> Result<Self> {
        if retries == 0 {
            return Err(AppError::Config("retries must be at least 1".into()));
        }
        Ok(Self { retries, delay, retry_if: None })
    }

    /// Only retry errors accepted by `predicate`; everything else is returned immediately.
    #[must_use]
    pub fn retry_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Some(Arc::new(predicate));
        self
    }

    /// Only retry errors that report themselves as transient.
    #[must_use]
    pub fn transient_only(self) -> Self
    where
        E: Retryable,
    {
        self.retry_if(|err: &E| err.is_retryable())
    }

    /// Total number of attempts.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Pause between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether `err` is in the retryable set.
    pub fn should_retry(&self, err: &E) -> bool {
        self.retry_if.as_ref().is_none_or(|predicate| predicate(err))
    }

    /// Wraps `op` so every call goes through this policy.
    pub fn wrap<F>(self, op: F) -> Retrying<F, E> {
        Retrying { policy: self, op }
    }
}

impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self { retries: DEFAULT_RETRIES, delay: DEFAULT_DELAY, retry_if: None }
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self { retries: self.retries, delay: self.delay, retry_if: self.retry_if.clone() }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("retries", &self.retries)
            .field("delay", &self.delay)
            .field("filtered", &self.retry_if.is_some())
            .finish()
    }
}

/// Runs `op` under `policy`.
///
/// Returns the first success. A retryable failure is followed by a pause and
/// another attempt while attempts remain; the final failure is returned as-is.
/// A failure outside the retryable set is returned at once without pausing.
pub async fn safe_call<T, E, F, Fut>(policy: &RetryPolicy<E>, mut op: F) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.retries && policy.should_retry(&err) => {
                tracing::warn!(
                    attempt = attempt,
                    retries = policy.retries,
                    delay = ?policy.delay,
                    error = %err,
                    "Call failed, retrying"
                );
                if !policy.delay.is_zero() {
                    sleep(policy.delay).await;
                }
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// An operation bound to a [`RetryPolicy`].
pub struct Retrying<F, E = AppError> {
    policy: RetryPolicy<E>,
    op: F,
}

impl<F, E> Retrying<F, E> {
    /// The policy applied on each call.
    pub fn policy(&self) -> &RetryPolicy<E> {
        &self.policy
    }

    /// Runs the wrapped operation under the policy.
    pub async fn call<T, Fut>(&self) -> std::result::Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Display,
    {
        safe_call(&self.policy, &self.op).await
    }
}
