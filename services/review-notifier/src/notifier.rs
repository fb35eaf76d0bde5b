//! Notifier trait and deduplicated delivery

use async_trait::async_trait;

/// Trait for delivering text messages to the configured recipient
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send a message
    async fn send_message(&self, text: &str) -> crate::Result<()>;
}

/// What to do when delivery fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Return the failure and leave the dedup text untouched, so the same
    /// message is retried on the next cycle
    Propagate,
    /// Log the failure and record the text as sent anyway. Used for error
    /// reports, whose own failure must never raise another report.
    Swallow,
}

/// Send `text` unless it equals `last`.
///
/// Returns `Ok(true)` when a send was attempted and recorded.
pub async fn notify_deduped(
    notifier: &dyn Notifier,
    last: &mut Option<String>,
    text: String,
    policy: DeliveryPolicy,
) -> crate::Result<bool> {
    if last.as_deref() == Some(text.as_str()) {
        tracing::debug!("Suppressing repeated message: {}", text);
        return Ok(false);
    }

    match notifier.send_message(&text).await {
        Ok(()) => {
            tracing::debug!("Message sent via '{}'", notifier.type_name());
        }
        Err(e) => match policy {
            DeliveryPolicy::Propagate => return Err(e),
            DeliveryPolicy::Swallow => {
                tracing::error!(
                    "Failed to deliver error report via '{}': {}",
                    notifier.type_name(),
                    e
                );
            }
        },
    }

    *last = Some(text);
    Ok(true)
}
