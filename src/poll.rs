//! Bounded-retry driver for convergence polling.
//!
//! Each step issues its mutating writes once, then only *observes* through a
//! probe until the effect is visible or the wall-clock budget runs out. The
//! delay between attempts is fixed; there is no attempt cap independent of
//! the timeout.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Fixed delay and wall-clock budget for one polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub delay: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(3),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Drive a fallible boolean probe until it reports convergence or the
/// timeout elapses.
///
/// The probe runs once immediately. After an `Ok(false)` the driver sleeps
/// for `delay` and tries again as long as the elapsed time has not passed
/// `timeout` (the elapsed check happens after the sleep, so the last attempt
/// may start right at the boundary). Returns `Ok(true)` on the first
/// successful observation and `Ok(false)` once time runs out.
///
/// The probe must only observe external state. An `Err` from the probe is
/// never retried here; it propagates immediately and aborts the run.
pub async fn retry_until<F, Fut, E>(
    mut probe: F,
    delay: Duration,
    timeout: Duration,
) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        if probe().await? {
            debug!(attempts, "probe converged");
            return Ok(true);
        }

        sleep(delay).await;
        if start.elapsed() > timeout {
            debug!(attempts, elapsed = ?start.elapsed(), "probe did not converge in time");
            return Ok(false);
        }
    }
}
