//! Core logic for the homework status bot.
//!
//! This crate knows how to talk to the Practicum homework API and how to turn
//! its answers into user-facing messages:
//! - [`config`] - credential check and the immutable [`BotConfig`]
//! - [`client`] - the API fetcher ([`PracticumClient`]) behind [`HomeworkSource`]
//! - [`response`] - shape validation of the raw JSON payload
//! - [`verdict`] - status-to-message translation
//!
//! Delivery to Telegram and the polling loop live in `homework-telegram`.
//!
//! # Example
//!
//! ```no_run
//! use homework_core::{check_response, parse_status, BotConfig, Credentials, PracticumClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_credentials(Credentials::from_env())?;
//!     let client = PracticumClient::new(&config)?;
//!
//!     let page = check_response(client.fetch(0).await?)?;
//!     if let Some(latest) = page.homeworks.first() {
//!         println!("{}", parse_status(latest)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod verdict;

pub use client::{HomeworkSource, PracticumClient};
pub use config::{BotConfig, Credentials};
pub use error::{ErrorKey, ErrorKind, HomeworkError, Result};
pub use response::{check_response, StatusPage};
pub use verdict::{parse_status, HomeworkStatus};
