//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::settings::DEFAULT_SETTINGS_FILE;

/// Outlook mail from the command line.
#[derive(Debug, Parser)]
#[command(name = "azure-client", version, about)]
pub struct Cli {
    /// Application settings file.
    #[arg(long, short, default_value = DEFAULT_SETTINGS_FILE, env = "AZURE_CLIENT_SETTINGS")]
    pub settings: PathBuf,

    /// Credential file; defaults to `~/.azure_auth/<filename from settings>`.
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Mailbox: `me`, `users/<address>` or `users/<object-id>@<tenant-id>`.
    #[arg(long, short, default_value = "me")]
    pub user: String,

    /// Browser used for interactive logins.
    #[arg(long, value_enum, default_value_t = BrowserKind::Manual)]
    pub browser: BrowserKind,

    /// Seconds allowed to complete an interactive login. Raise it when
    /// pasting the redirected URL by hand takes longer.
    #[arg(long, default_value_t = 120)]
    pub login_timeout: u64,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// How the consent page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowserKind {
    /// System browser; paste the redirected URL back in the terminal.
    Manual,
    /// Automated Chromium window.
    #[cfg(feature = "chromium")]
    Chromium,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in (or refresh the stored credentials) and save them.
    Login {
        /// Ignore stored credentials and log in again.
        #[arg(long)]
        force: bool,
    },
    /// List the messages of a folder.
    List {
        /// Folder name or id.
        #[arg(long, default_value = "Inbox")]
        folder: String,
        /// Page size.
        #[arg(long)]
        top: Option<u32>,
        /// OData filter.
        #[arg(long)]
        filter: Option<String>,
        /// Follow every page instead of printing the first one.
        #[arg(long)]
        all: bool,
    },
    /// Create a draft.
    Draft {
        /// Subject line.
        #[arg(long)]
        subject: String,
        /// HTML body.
        #[arg(long)]
        body: String,
        /// Recipient address; repeat for several.
        #[arg(long = "to", required = true)]
        to: Vec<String>,
        /// File to attach; repeat for several.
        #[arg(long = "attach")]
        attach: Vec<PathBuf>,
    },
    /// Send a draft.
    Send {
        /// Message id.
        id: String,
    },
    /// Send every draft of a folder.
    SendAll {
        /// Folder name or id.
        #[arg(long, default_value = "Drafts")]
        folder: String,
    },
    /// Delete a message.
    Delete {
        /// Message id.
        id: String,
    },
    /// Delete every message of a folder.
    DeleteAll {
        /// Folder name or id.
        #[arg(long, default_value = "Drafts")]
        folder: String,
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["azure-client", "send-all"]).unwrap();
        assert_eq!(cli.user, "me");
        assert_eq!(cli.browser, BrowserKind::Manual);
        assert_eq!(cli.login_timeout, 120);
        assert!(matches!(cli.command, Command::SendAll { ref folder } if folder == "Drafts"));
    }

    #[test]
    fn test_login_timeout_matches_library_default() {
        let cli = Cli::try_parse_from(["azure-client", "login"]).unwrap();
        assert_eq!(
            std::time::Duration::from_secs(cli.login_timeout),
            azure_client_oauth::InteractiveConfig::default().redirect_timeout
        );

        let cli = Cli::try_parse_from(["azure-client", "--login-timeout", "600", "login"]).unwrap();
        assert_eq!(cli.login_timeout, 600);
    }

    #[test]
    fn test_draft_arguments() {
        let cli = Cli::try_parse_from([
            "azure-client",
            "--user",
            "users/bob@example.com",
            "draft",
            "--subject",
            "Hi",
            "--body",
            "<p>Hello</p>",
            "--to",
            "a@example.com",
            "--to",
            "b@example.com",
            "--attach",
            "report.tsv",
        ])
        .unwrap();

        assert_eq!(cli.user, "users/bob@example.com");
        match cli.command {
            Command::Draft { to, attach, .. } => {
                assert_eq!(to, ["a@example.com", "b@example.com"]);
                assert_eq!(attach, [PathBuf::from("report.tsv")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_draft_requires_recipient() {
        assert!(Cli::try_parse_from(["azure-client", "draft", "--subject", "s", "--body", "b"]).is_err());
    }

    #[test]
    fn test_delete_all_flags() {
        let cli = Cli::try_parse_from(["azure-client", "delete-all", "--folder", "Junk", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::DeleteAll { ref folder, yes: true } if folder == "Junk"
        ));
    }
}
