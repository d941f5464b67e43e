//! Bounded retry with a fixed delay between attempts

use std::fmt::Display;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// How many times to try an operation and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Constant pause after each failed attempt except the last
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Policy for removing a leftover staging directory after the rename
    /// attempts are exhausted
    pub fn best_effort_cleanup() -> Self {
        Self::new(3, Duration::from_secs(1))
    }

    /// Attempts actually made; zero is treated as a single attempt
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up
///
/// Each failure except the last is logged and followed by `policy.delay`.
/// The final failure is returned to the caller unchanged.
pub fn retry<T, E, F>(policy: &RetryPolicy, label: &str, operation: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    retry_when(policy, label, |_| true, operation)
}

/// Like [`retry`], but gives up immediately on errors `should_retry` rejects
pub fn retry_when<T, E, P, F>(
    policy: &RetryPolicy,
    label: &str,
    should_retry: P,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    P: Fn(&E) -> bool,
    F: FnMut() -> Result<T, E>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !should_retry(&err) {
                    warn!("{} failed permanently: {}", label, err);
                    return Err(err);
                }
                warn!("{} attempt {}/{} failed: {}", label, attempt, attempts, err);
                if attempt >= attempts {
                    return Err(err);
                }
                if !policy.delay.is_zero() {
                    thread::sleep(policy.delay);
                }
                attempt += 1;
            }
        }
    }
}
