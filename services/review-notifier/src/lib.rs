//! Review notifier - homework review status relay
//!
//! Polls the Practicum homework status API, detects review status changes of
//! the latest submission, and relays them to a Telegram chat.

pub mod config;
pub mod error;
pub mod homework;
pub mod io;
pub mod notifier;
pub mod poller;
pub mod telegram;

pub use config::{check_tokens, load_config, Config, Credentials};
pub use error::{NotifierError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::homework::HomeworkApi;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::poller::{current_epoch_secs, PollContext, Poller};
use crate::telegram::TelegramNotifier;

/// Run the notifier with the given configuration.
///
/// Credentials must already be resolved. Returns once Ctrl-C is received.
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(
        config.practicum.request_timeout,
    )?);
    let credentials = &config.credentials;

    let api = HomeworkApi::new(
        &config.practicum.endpoint,
        &credentials.practicum_token,
        Arc::clone(&http),
    );
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(
        &config.telegram.api_url,
        &credentials.telegram_token,
        &credentials.chat_id,
        Arc::clone(&http),
    ));

    let cursor = config.polling.from_date.unwrap_or_else(current_epoch_secs);
    let mut poller = Poller::new(
        api,
        notifier,
        config.polling.retry_period,
        PollContext::new(cursor),
    );

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    tracing::info!("Review notifier started");
    poller.run(cancel).await;
    tracing::info!("Review notifier stopped");

    Ok(())
}
