//! Delivery of messages to the configured Telegram chat.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::debug;

use homework_core::{BotConfig, HomeworkError, Result};

/// Sends text messages to a single destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one message.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Notifier backed by a teloxide bot.
pub struct TelegramNotifier {
    /// The teloxide bot instance.
    bot: Bot,
    /// Target chat.
    recipient: Recipient,
}

impl TelegramNotifier {
    /// Creates a notifier for the chat named in the configuration.
    pub fn new(config: &BotConfig) -> Self {
        Self {
            bot: Bot::new(&config.telegram_token),
            recipient: parse_recipient(&config.chat_id),
        }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| HomeworkError::Delivery(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// The chat messages go to.
    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .await
            .map_err(|e| HomeworkError::Delivery(e.to_string()))?;

        debug!(message = %text, "Message delivered");
        Ok(())
    }
}

/// Numeric ids address a chat directly; anything else is a channel username.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if chat_id.starts_with('@') => Recipient::ChannelUsername(chat_id.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{}", chat_id)),
    }
}
