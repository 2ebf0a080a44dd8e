//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Cardshare - digital business card service
#[derive(Parser)]
#[command(name = "cardshare")]
#[command(version)]
#[command(about = "Digital business card service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default when no command is given)
    Serve,

    /// Contact import and export
    Contacts {
        #[command(subcommand)]
        action: ContactsCommands,
    },

    /// Card management
    Cards {
        #[command(subcommand)]
        action: CardsCommands,
    },

    /// Access token management
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ContactsCommands {
    /// Import contacts from a CSV, JSON or vCard file
    Import {
        /// File to import
        file_path: String,

        /// Owner user id
        #[arg(long)]
        user: String,

        /// csv, json or vcard (default: inferred from the file extension)
        #[arg(long)]
        format: Option<String>,
    },

    /// Export contacts to a file
    Export {
        /// Owner user id
        #[arg(long)]
        user: String,

        /// csv, json or vcard (default: csv)
        #[arg(long)]
        format: Option<String>,

        /// Output path (default: contacts-YYYY-MM-DD.<ext>)
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CardsCommands {
    /// List a user's cards
    List {
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Issue an access token for a user
    Issue {
        #[arg(long)]
        user: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Lifetime in minutes (default: auth.access_token_minutes)
        #[arg(long)]
        minutes: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contacts_export() {
        let cli = Cli::try_parse_from([
            "cardshare", "contacts", "export", "--user", "user_1", "--format", "vcard",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Contacts {
                action: ContactsCommands::Export { user, format, output },
            }) => {
                assert_eq!(user, "user_1");
                assert_eq!(format.as_deref(), Some("vcard"));
                assert!(output.is_none());
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_token_issue_requires_user() {
        assert!(Cli::try_parse_from(["cardshare", "token", "issue"]).is_err());
    }
}
