//! Bounded polling
//!
//! Every wait in CoolFlow goes through a [`PollPolicy`]: a fixed interval and
//! a maximum number of checks. A policy never waits past its bound.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Waiting for deleted resources to disappear: 30 checks, 2 s apart
    pub const fn resource_deletion() -> Self {
        Self::new(30, Duration::from_secs(2))
    }

    /// Waiting for a deployment to finish: 120 checks, 5 s apart
    pub const fn deployment() -> Self {
        Self::new(120, Duration::from_secs(5))
    }

    /// Following logs until the process is interrupted
    pub const fn log_follow() -> Self {
        Self::new(u32::MAX, Duration::from_secs(2))
    }

    /// Upper bound of the total wait
    pub fn max_wait(&self) -> Duration {
        self.interval
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }

    /// Run `check` until it returns `true` or the attempts run out
    pub async fn run<F, Fut>(&self, mut check: F) -> PollOutcome
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = bool>,
    {
        self.find(|attempt| {
            let done = check(attempt);
            async move { done.await.then_some(()) }
        })
        .await
        .0
    }

    /// Run `check` until it yields a value or the attempts run out
    pub async fn find<T, F, Fut>(&self, mut check: F) -> (PollOutcome, Option<T>)
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        for attempt in 1..=self.max_attempts {
            if let Some(value) = check(attempt).await {
                return (PollOutcome::Completed { attempts: attempt }, Some(value));
            }

            // no sleep after the last check
            if attempt < self.max_attempts {
                sleep(self.interval).await;
            }
        }

        tracing::debug!(attempts = self.max_attempts, "poll bound reached");
        (
            PollOutcome::Exhausted {
                attempts: self.max_attempts,
            },
            None,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Completed { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl PollOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Completed { attempts } | PollOutcome::Exhausted { attempts } => *attempts,
        }
    }
}
