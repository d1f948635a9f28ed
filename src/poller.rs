//! Fixed-interval polling of a remote job until it reaches a terminal
//! state.
//!
//! The wait is a sequential sleep-then-check loop on the calling task; the
//! originating HTTP request stays open for the whole duration. The loop is
//! bounded: after `max_attempts` status checks without a terminal state it
//! gives up with a timeout rather than holding the request slot forever on
//! a stuck remote job.

use std::time::Duration;

use crate::assistant::{JobStatus, JobStatusSource};
use crate::error::GenerateError;

/// Poll `source` until the job completes.
///
/// Checks immediately, then sleeps `interval` between checks. Returns:
///
/// - `Ok(())` when the job reports `Completed`;
/// - `JobFailed` when it reports `Failed` (carrying the provider's reason
///   when present) or any other terminal state;
/// - `Timeout` after `max_attempts` checks that all came back pending.
///
/// Status-fetch errors propagate immediately; the interval re-check is
/// expected-latency handling, not error recovery.
pub async fn wait_for_completion(
    source: &dyn JobStatusSource,
    conversation_id: &str,
    job_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> Result<(), GenerateError> {
    for attempt in 1..=max_attempts {
        match source.job_status(conversation_id, job_id).await? {
            JobStatus::Completed => {
                tracing::debug!(job_id, attempt, "job completed");
                return Ok(());
            }
            JobStatus::Failed { reason } => {
                return Err(GenerateError::JobFailed(
                    reason.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
            JobStatus::Ended { status } => {
                return Err(GenerateError::JobFailed(format!(
                    "job ended with status: {}",
                    status
                )));
            }
            JobStatus::Pending => {
                tracing::debug!(job_id, attempt, "job still running");
                if attempt < max_attempts {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    Err(GenerateError::Timeout {
        attempts: max_attempts,
    })
}
