//! Telegram side of the homework status bot.
//!
//! This crate wires the Practicum client from `homework-core` to a Telegram
//! chat and runs the polling loop.
//!
//! # Environment Variables
//!
//! Required:
//! - `PRACTICUM_TOKEN`: OAuth token for the Practicum API
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat id (or `@channel`) that receives notifications
//!
//! # Example
//!
//! ```no_run
//! use homework_core::{BotConfig, Credentials, PracticumClient};
//! use homework_telegram::{HomeworkPoller, TelegramNotifier};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_credentials(Credentials::from_env())?;
//!     let client = PracticumClient::new(&config)?;
//!     let notifier = TelegramNotifier::new(&config);
//!
//!     // Never returns.
//!     HomeworkPoller::new(client, notifier, &config).run().await;
//!     Ok(())
//! }
//! ```

pub mod notifier;
pub mod poller;

pub use notifier::{Notifier, TelegramNotifier};
pub use poller::{CycleOutcome, HomeworkPoller};
