//! `azure-client` - Outlook mail from the command line.
//!
//! Reads the application registration from `azure_ids.json`, logs in through
//! the browser the first time and refreshes the stored token afterwards.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod browser;
mod cli;
mod commands;
mod settings;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "azure_client=info,azure_client_oauth=info,azure_client_mail=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    commands::run(Cli::parse()).await
}
