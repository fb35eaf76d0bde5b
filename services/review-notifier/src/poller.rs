//! Poller: fetch, validate, extract, notify, sleep, repeat

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::homework::{check_response, parse_status, HomeworkApi};
use crate::notifier::{notify_deduped, DeliveryPolicy, Notifier};
use crate::NotifierError;

/// State carried from one poll cycle to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollContext {
    /// Unix time sent as `from_date` on the next fetch
    pub cursor: i64,
    /// Last status message delivered to the user
    pub last_status: Option<String>,
    /// Last failure report delivered (or attempted)
    pub last_error: Option<String>,
}

impl PollContext {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }
}

/// Result of a single poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered
    Notified,
    /// The latest submission's status matches the last delivered one
    Unchanged,
    /// The API returned no submissions since the cursor
    NoSubmissions,
    /// The cycle failed; a failure report may have been sent
    Failed,
}

/// Drives the poll loop for one user
#[derive(Debug)]
pub struct Poller {
    api: HomeworkApi,
    notifier: Arc<dyn Notifier>,
    retry_period: Duration,
    context: PollContext,
}

impl Poller {
    pub fn new(
        api: HomeworkApi,
        notifier: Arc<dyn Notifier>,
        retry_period: Duration,
        context: PollContext,
    ) -> Self {
        Self {
            api,
            notifier,
            retry_period,
            context,
        }
    }

    pub fn context(&self) -> &PollContext {
        &self.context
    }

    /// Run cycles until `cancel` fires, sleeping the retry period between them
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::info!(
            "Polling {} every {:?} from cursor {}",
            self.api.endpoint(),
            self.retry_period,
            self.context.cursor
        );

        loop {
            let outcome = self.poll_once().await;
            tracing::debug!(
                "Cycle finished: {:?} (cursor={})",
                outcome,
                self.context.cursor
            );

            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run one cycle. Failures are logged and reported, never returned.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        match self.check_for_update().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_failure(e).await;
                CycleOutcome::Failed
            }
        }
    }

    async fn check_for_update(&mut self) -> crate::Result<CycleOutcome> {
        let answer = self.api.get_api_answer(self.context.cursor).await?;
        let snapshot = check_response(&answer)?;

        let outcome = match snapshot.latest() {
            None => {
                tracing::debug!("Status unchanged: no submissions since {}", self.context.cursor);
                CycleOutcome::NoSubmissions
            }
            Some(homework) => {
                let text = parse_status(homework)?;
                let sent = notify_deduped(
                    self.notifier.as_ref(),
                    &mut self.context.last_status,
                    text,
                    DeliveryPolicy::Propagate,
                )
                .await?;
                if sent {
                    tracing::info!("Review status change delivered");
                    CycleOutcome::Notified
                } else {
                    CycleOutcome::Unchanged
                }
            }
        };

        // The cursor only moves once the cycle has fully succeeded, so a
        // failed delivery is retried against the same window.
        match snapshot.current_date {
            Some(current_date) => self.context.cursor = current_date,
            None => tracing::warn!(
                "Response has no current_date, keeping cursor {}",
                self.context.cursor
            ),
        }

        Ok(outcome)
    }

    async fn report_failure(&mut self, error: NotifierError) {
        tracing::error!("{}", error);
        let message = format!("Program failure: {}", error);
        if let Err(e) = notify_deduped(
            self.notifier.as_ref(),
            &mut self.context.last_error,
            message,
            DeliveryPolicy::Swallow,
        )
        .await
        {
            tracing::error!("Failure report could not be sent: {}", e);
        }
    }
}

/// Current Unix time in seconds
pub fn current_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
