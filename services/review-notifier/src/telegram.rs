//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::io::HttpClient;
use crate::notifier::Notifier;

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram message sender bound to a single chat
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(api_url: &str, bot_token: &str, chat_id: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            send_url: format!(
                "{}/bot{}/sendMessage",
                api_url.trim_end_matches('/'),
                bot_token
            ),
            chat_id: chat_id.to_string(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, text: &str) -> crate::Result<()> {
        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let params = [("chat_id", self.chat_id.as_str()), ("text", text)];
        let response = self.http.post_form(&self.send_url, &params).await?;

        let parsed: Option<BotApiResponse> = serde_json::from_str(&response.body).ok();
        let accepted = response.status == 200 && parsed.as_ref().is_some_and(|r| r.ok);
        if !accepted {
            let description = parsed
                .and_then(|r| r.description)
                .unwrap_or(response.body);
            return Err(crate::NotifierError::Telegram(format!(
                "status {}: {}",
                response.status, description
            )));
        }

        tracing::debug!("Telegram message sent successfully");
        Ok(())
    }
}
