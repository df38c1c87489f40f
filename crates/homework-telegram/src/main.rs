//! Homework status bot binary.
//!
//! Start the bot with:
//! ```bash
//! PRACTICUM_TOKEN=xxx TELEGRAM_TOKEN=yyy TELEGRAM_CHAT_ID=123 cargo run -p homework-telegram
//! ```

use std::path::PathBuf;

use clap::Parser;
use homework_core::{BotConfig, Credentials, PracticumClient};
use homework_telegram::{HomeworkPoller, TelegramNotifier};
use tracing_subscriber::EnvFilter;

/// Homework Bot - forwards Practicum review status changes to Telegram
#[derive(Parser, Debug)]
#[command(name = "homework-bot")]
#[command(about = "Polls the Practicum homework API and reports status changes to Telegram")]
struct Args {
    /// Read environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // An explicit env file must exist; the default .env is optional
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    let filter = match args.verbose {
        0 => "homework_telegram=info,homework_core=info,teloxide=warn",
        1 => "homework_telegram=debug,homework_core=debug,teloxide=info",
        2 => "homework_telegram=trace,homework_core=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stdout)
        .init();

    let credentials = Credentials::from_env();
    let config = match BotConfig::from_credentials(credentials) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Missing credentials, not starting");
            return Err(e.into());
        }
    };

    let client = PracticumClient::new(&config)?;
    let notifier = TelegramNotifier::new(&config);

    match notifier.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to get bot info");
        }
    }

    tracing::info!(endpoint = %client.endpoint(), chat = ?notifier.recipient(), "Watching homework statuses");

    let mut poller = HomeworkPoller::new(client, notifier, &config);
    poller.run().await;

    Ok(())
}
