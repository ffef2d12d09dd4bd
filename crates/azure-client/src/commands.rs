//! Command implementations.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use azure_client_mail::{Attachment, Draft, ListQuery, MailClient, Message};
#[cfg(feature = "chromium")]
use azure_client_oauth::browser::ChromiumSession;
use azure_client_oauth::{
    AppRegistration, AzureAuth, BrowserSession, InteractiveConfig, get_or_create_credentials,
};

use crate::browser::ManualSession;
use crate::cli::{BrowserKind, Cli, Command};
use crate::settings::Settings;

/// Properties fetched when listing messages.
const LIST_FIELDS: [&str; 4] = ["id", "subject", "receivedDateTime", "createdDateTime"];

/// Runs the parsed command line.
///
/// # Errors
///
/// Returns the first settings, login, file or API error.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(&cli.settings).await?;
    let path = match cli.credentials {
        Some(path) => path,
        None => settings.credentials_path()?,
    };
    let auth = AzureAuth::new().with_interactive_config(
        InteractiveConfig::default().redirect_timeout(Duration::from_secs(cli.login_timeout)),
    );
    let force = matches!(cli.command, Command::Login { force: true });

    if let Command::DeleteAll { folder, yes: false } = &cli.command {
        let prompt = format!(
            "This will delete all your messages in {folder}, are you sure you want to do that"
        );
        if !confirm(&prompt).await? {
            return Ok(());
        }
    }

    let auth = authorize(auth, cli.browser, &settings.registration, &path, force).await?;
    let client = MailClient::from_auth(&auth);
    let user = cli.user.as_str();

    match cli.command {
        Command::Login { .. } => {
            println!("Credentials saved to {}", path.display());
        }
        Command::List {
            folder,
            top,
            filter,
            all,
        } => {
            let mut query = ListQuery::new().select(LIST_FIELDS);
            if let Some(top) = top {
                query = query.top(top);
            }
            if let Some(filter) = filter {
                query = query.filter(filter);
            }

            let messages = if all {
                client.get_all_emails(user, &folder, query).collect_all().await?
            } else {
                client.get_emails(user, &folder, &query).await?.value
            };
            for message in &messages {
                println!("{}", format_message(message));
            }
        }
        Command::Draft {
            subject,
            body,
            to,
            attach,
        } => {
            let mut draft = Draft::new(subject, body);
            for address in to {
                draft = draft.to(address);
            }
            for file in attach {
                let attachment = Attachment::from_path(&file)
                    .await
                    .with_context(|| format!("Failed to attach {}", file.display()))?;
                draft = draft.attach(attachment);
            }
            let id = client.create_draft(user, &draft).await?;
            println!("{id}");
        }
        Command::Send { id } => {
            client.send_email(user, &id).await?;
            info!("Message sent");
        }
        Command::SendAll { folder } => {
            let ids = message_ids(&client, user, &folder).await?;
            for id in &ids {
                client.send_email(user, id).await?;
            }
            info!(count = ids.len(), %folder, "Messages sent");
        }
        Command::Delete { id } => {
            client.delete_email(user, &id).await?;
            info!("Message deleted");
        }
        Command::DeleteAll { folder, .. } => {
            let ids = message_ids(&client, user, &folder).await?;
            for id in &ids {
                client.delete_email(user, id).await?;
            }
            info!(count = ids.len(), %folder, "Messages deleted");
        }
    }

    Ok(())
}

async fn authorize(
    auth: AzureAuth,
    browser: BrowserKind,
    registration: &AppRegistration,
    path: &Path,
    force: bool,
) -> anyhow::Result<AzureAuth> {
    match browser {
        BrowserKind::Manual => {
            authorize_with(auth, ManualSession::open, registration, path, force).await
        }
        #[cfg(feature = "chromium")]
        BrowserKind::Chromium => {
            authorize_with(auth, ChromiumSession::launch, registration, path, force).await
        }
    }
}

async fn authorize_with<S, F>(
    mut auth: AzureAuth,
    driver_generator: F,
    registration: &AppRegistration,
    path: &Path,
    force: bool,
) -> anyhow::Result<AzureAuth>
where
    S: BrowserSession,
    F: AsyncFnOnce() -> azure_client_oauth::Result<S>,
{
    if !force {
        return Ok(get_or_create_credentials(auth, driver_generator, registration, path).await?);
    }

    auth.authenticate(driver_generator, registration).await?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    auth.save_auth(path).await?;
    Ok(auth)
}

// Ids are collected before acting so that paging is not disturbed by the
// messages leaving the folder.
async fn message_ids(client: &MailClient, user: &str, folder: &str) -> anyhow::Result<Vec<String>> {
    let messages = client
        .get_all_emails(user, folder, ListQuery::new().select(["id"]))
        .collect_all()
        .await?;
    Ok(messages.into_iter().map(|m| m.id).collect())
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} (y|n): ");
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

fn format_message(message: &Message) -> String {
    let date = message
        .received_date_time
        .or(message.created_date_time)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "{}\t{}\t{}",
        message.id,
        date,
        message.subject.as_deref().unwrap_or_default()
    )
}
