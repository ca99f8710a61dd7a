//! Circuit breaker for the playback poller.
//!
//! # States
//! - Open: normal operation, requests pass through
//! - Half: a failure was seen, requests pass through while outcomes are counted
//! - Closed: server assumed down, requests fail fast
//!
//! `Open` means the circuit carries traffic. This is the reverse of the usual
//! electrical naming and is kept consistently throughout the crate.
//!
//! # State Transitions
//! ```text
//! Open   → Half:   any failure (starts a probe window)
//! Half   → Open:   success after the probe window has elapsed
//! Half   → Half:   failure after the window elapsed, or enough failures at a
//!                  low failure rate (window restarts)
//! Half   → Closed: failure_threshold reached with failure rate >= percentage
//! Closed → Open:   the single probe let through after closed_timeout succeeds
//! Closed → Closed: that probe fails (retry deadline pushed out)
//! ```
//!
//! # Design Decisions
//! - Deadlines are compared when `fire` is called; there is no timer task
//! - The state lock is never held across the wrapped operation, so
//!   overlapping calls are each admitted and counted while not closed
//! - Admitting the closed-state probe pushes the retry deadline out, so
//!   overlapping calls behind it are rejected until the probe settles
//! - Uses `tokio::time::Instant` so a paused test clock drives it

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::config::BreakerConfig;
use crate::observability::metrics;

/// Breaker position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Healthy: every call is attempted.
    Open,
    /// Degraded: calls are attempted while a probe window tallies outcomes.
    Half,
    /// Tripped: calls fail fast until the retry deadline passes.
    Closed,
}

impl BreakerState {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakerState::Open => "open",
            BreakerState::Half => "half",
            BreakerState::Closed => "closed",
        }
    }
}

/// Point-in-time view of the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSnapshot {
    pub state: BreakerState,
    pub fail_count: u32,
    pub success_count: u32,
    pub half_deadline: Option<Instant>,
    pub closed_retry_deadline: Option<Instant>,
}

/// Error returned by [`CircuitBreaker::fire`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker is closed; the operation was not attempted.
    #[error("circuit breaker is closed")]
    Rejected,

    /// The operation ran and failed.
    #[error(transparent)]
    Inner(E),
}

impl<E> BreakerError<E> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, BreakerError::Rejected)
    }
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    fail_count: u32,
    success_count: u32,
    half_deadline: Option<Instant>,
    closed_retry_deadline: Option<Instant>,
}

impl Inner {
    fn reset_statistics(&mut self) {
        self.fail_count = 0;
        self.success_count = 0;
        self.half_deadline = None;
        self.closed_retry_deadline = None;
    }
}

/// Circuit breaker guarding an unreliable async operation.
#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    open_timeout: Duration,
    closed_timeout: Duration,
    failed_request_threshold: u32,
    failed_request_percentage_threshold: u32,
}

impl CircuitBreaker {
    /// Create a breaker in the `Open` state.
    pub fn new(config: &BreakerConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BreakerState::Open,
                fail_count: 0,
                success_count: 0,
                half_deadline: None,
                closed_retry_deadline: None,
            }),
            open_timeout: config.open_timeout(),
            closed_timeout: config.closed_timeout(),
            failed_request_threshold: config.failed_request_threshold,
            failed_request_percentage_threshold: config.failed_request_percentage_threshold,
        }
    }

    /// Run `op` unless the breaker is closed, and record its outcome.
    pub async fn fire<F, Fut, T, E>(&self, op: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.admit() {
            return Err(BreakerError::Rejected);
        }

        match op().await {
            Ok(value) => {
                self.on_success();
                Ok(value)
            }
            Err(e) => {
                self.on_failure();
                Err(BreakerError::Inner(e))
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// Current state and statistics.
    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        BreakerSnapshot {
            state: inner.state,
            fail_count: inner.fail_count,
            success_count: inner.success_count,
            half_deadline: inner.half_deadline,
            closed_retry_deadline: inner.closed_retry_deadline,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The guarded data stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn admit(&self) -> bool {
        let mut inner = self.lock();
        if inner.state != BreakerState::Closed {
            return true;
        }
        let now = Instant::now();
        if inner.closed_retry_deadline.is_some_and(|deadline| now <= deadline) {
            return false;
        }
        inner.closed_retry_deadline = Some(now + self.closed_timeout);
        tracing::debug!("Circuit breaker closed, probing remote playback server");
        true
    }

    fn on_success(&self) {
        let mut inner = self.lock();
        let now = Instant::now();
        match inner.state {
            BreakerState::Open => inner.reset_statistics(),
            BreakerState::Half => {
                inner.success_count += 1;
                if inner.half_deadline.map_or(true, |deadline| now >= deadline) {
                    self.transition(&mut inner, BreakerState::Open);
                    inner.reset_statistics();
                }
            }
            BreakerState::Closed => {
                self.transition(&mut inner, BreakerState::Open);
                inner.reset_statistics();
            }
        }
    }

    fn on_failure(&self) {
        let mut inner = self.lock();
        let now = Instant::now();
        match inner.state {
            BreakerState::Open => {
                inner.fail_count = 1;
                inner.half_deadline = Some(now + self.open_timeout);
                self.transition(&mut inner, BreakerState::Half);
            }
            BreakerState::Half => {
                if inner.half_deadline.map_or(true, |deadline| now > deadline) {
                    self.restart_probe_window(&mut inner, now);
                    return;
                }

                inner.fail_count += 1;
                if inner.fail_count < self.failed_request_threshold {
                    return;
                }

                let total = u64::from(inner.fail_count) + u64::from(inner.success_count);
                let fail_rate = u64::from(inner.fail_count) * 100 / total;
                if fail_rate >= u64::from(self.failed_request_percentage_threshold) {
                    tracing::info!(
                        fail_count = inner.fail_count,
                        success_count = inner.success_count,
                        fail_rate,
                        retry_in = ?self.closed_timeout,
                        "Remote playback server unreachable, circuit breaker closed"
                    );
                    self.transition(&mut inner, BreakerState::Closed);
                    inner.reset_statistics();
                    inner.closed_retry_deadline = Some(now + self.closed_timeout);
                } else {
                    self.restart_probe_window(&mut inner, now);
                }
            }
            BreakerState::Closed => {
                inner.closed_retry_deadline = Some(now + self.closed_timeout);
                tracing::debug!(retry_in = ?self.closed_timeout, "Breaker probe failed");
            }
        }
    }

    fn restart_probe_window(&self, inner: &mut Inner, now: Instant) {
        inner.reset_statistics();
        inner.fail_count = 1;
        inner.half_deadline = Some(now + self.open_timeout);
    }

    fn transition(&self, inner: &mut Inner, next: BreakerState) {
        if inner.state == next {
            return;
        }
        let previous = inner.state;
        inner.state = next;
        if next == BreakerState::Open {
            tracing::info!(from = previous.as_str(), "Circuit breaker open, polling resumed");
        } else {
            tracing::debug!(from = previous.as_str(), to = next.as_str(), "Circuit breaker transition");
        }
        metrics::record_breaker_state(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::advance;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(&BreakerConfig::default())
    }

    async fn succeed(breaker: &CircuitBreaker) -> Result<(), BreakerError<&'static str>> {
        breaker.fire(|| async { Ok::<_, &'static str>(()) }).await
    }

    async fn fail(breaker: &CircuitBreaker) -> Result<(), BreakerError<&'static str>> {
        breaker.fire(|| async { Err::<(), _>("down") }).await
    }

    /// Drive the breaker from Open to Closed with five quick failures.
    async fn trip(breaker: &CircuitBreaker) {
        for _ in 0..5 {
            let _ = fail(breaker).await;
        }
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_success_stays_open() {
        let b = breaker();
        succeed(&b).await.unwrap();

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Open);
        assert_eq!(snap.fail_count, 0);
        assert_eq!(snap.success_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_failure_goes_half() {
        let b = breaker();
        let start = Instant::now();
        let err = fail(&b).await.unwrap_err();
        assert!(matches!(err, BreakerError::Inner("down")));

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Half);
        assert_eq!(snap.fail_count, 1);
        assert_eq!(snap.half_deadline, Some(start + Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_success_inside_window_stays_half() {
        let b = breaker();
        let _ = fail(&b).await;
        advance(Duration::from_secs(3)).await;
        succeed(&b).await.unwrap();

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Half);
        assert_eq!(snap.success_count, 1);
        assert_eq!(snap.fail_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_success_after_window_opens() {
        let b = breaker();
        let _ = fail(&b).await;
        advance(Duration::from_secs(10)).await;
        succeed(&b).await.unwrap();

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Open);
        assert_eq!(snap.fail_count, 0);
        assert_eq!(snap.success_count, 0);
        assert_eq!(snap.half_deadline, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_failure_after_window_restarts_window() {
        let b = breaker();
        let _ = fail(&b).await;
        let _ = fail(&b).await;
        let _ = succeed(&b).await;
        advance(Duration::from_millis(10_001)).await;

        let now = Instant::now();
        let _ = fail(&b).await;

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Half);
        assert_eq!(snap.fail_count, 1);
        assert_eq!(snap.success_count, 0);
        assert_eq!(snap.half_deadline, Some(now + Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_failure_below_threshold_accumulates() {
        let b = breaker();
        for _ in 0..4 {
            let _ = fail(&b).await;
        }

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Half);
        assert_eq!(snap.fail_count, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_consecutive_failures_close() {
        let b = breaker();
        let start = Instant::now();
        trip(&b).await;

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Closed);
        assert_eq!(snap.fail_count, 0);
        assert_eq!(snap.success_count, 0);
        assert_eq!(snap.half_deadline, None);
        assert_eq!(snap.closed_retry_deadline, Some(start + Duration::from_secs(15)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_threshold_with_low_fail_rate_restarts_window() {
        let b = breaker();
        let _ = fail(&b).await;
        for _ in 0..6 {
            succeed(&b).await.unwrap();
        }
        // 4 more failures: 5 failures vs 6 successes, 45% < 50%.
        for _ in 0..4 {
            let _ = fail(&b).await;
        }

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Half);
        assert_eq!(snap.fail_count, 1);
        assert_eq!(snap.success_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_threshold_with_exact_half_fail_rate_closes() {
        let b = breaker();
        let _ = fail(&b).await;
        for _ in 0..5 {
            succeed(&b).await.unwrap();
        }
        // 5 failures vs 5 successes is exactly 50%.
        for _ in 0..4 {
            let _ = fail(&b).await;
        }

        assert_eq!(b.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_rejects_without_calling_op() {
        let b = breaker();
        trip(&b).await;

        let calls = AtomicU32::new(0);
        for _ in 0..3 {
            advance(Duration::from_secs(4)).await;
            let result = b
                .fire(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, &'static str>(())
                })
                .await;
            assert!(result.unwrap_err().is_rejected());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_rejects_at_exact_deadline() {
        let b = breaker();
        trip(&b).await;
        advance(Duration::from_secs(15)).await;

        assert!(succeed(&b).await.unwrap_err().is_rejected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_probe_success_opens() {
        let b = breaker();
        trip(&b).await;
        advance(Duration::from_millis(15_001)).await;

        succeed(&b).await.unwrap();
        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Open);
        assert_eq!(snap.closed_retry_deadline, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_probe_failure_pushes_deadline() {
        let b = breaker();
        trip(&b).await;
        advance(Duration::from_millis(15_001)).await;

        let now = Instant::now();
        let err = fail(&b).await.unwrap_err();
        assert!(!err.is_rejected());

        let snap = b.snapshot();
        assert_eq!(snap.state, BreakerState::Closed);
        assert_eq!(snap.closed_retry_deadline, Some(now + Duration::from_secs(15)));

        // Immediately after, it rejects again.
        assert!(succeed(&b).await.unwrap_err().is_rejected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_admits_single_call_while_it_runs() {
        let b = breaker();
        trip(&b).await;
        advance(Duration::from_millis(15_001)).await;

        let calls = AtomicU32::new(0);
        let slow_call = || {
            b.fire(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(3)).await;
                Ok::<_, &'static str>(())
            })
        };
        let (first, second, third) = tokio::join!(slow_call(), slow_call(), slow_call());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let rejected = [&first, &second, &third]
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_rejected()))
            .count();
        assert_eq!(rejected, 2);
        assert_eq!(b.state(), BreakerState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_hung_call_blocks_later_ticks() {
        let b = breaker();
        trip(&b).await;
        advance(Duration::from_millis(15_001)).await;

        let hung = b.fire(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err::<(), _>("timeout")
        });
        let ticks = async {
            let mut rejected = 0;
            for _ in 0..4 {
                advance(Duration::from_secs(1)).await;
                if succeed(&b).await.unwrap_err().is_rejected() {
                    rejected += 1;
                }
            }
            rejected
        };
        let (outcome, rejected) = tokio::join!(hung, ticks);

        assert!(!outcome.unwrap_err().is_rejected());
        assert_eq!(rejected, 4);
        assert_eq!(b.state(), BreakerState::Closed);
    }
}
