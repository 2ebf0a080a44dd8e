//! CLI interface module

pub mod commands;

use crate::cli::{CardsCommands, Commands, ConfigCommands, ContactsCommands, TokenCommands};
use crate::storage::StorageFactory;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::CardshareError> for CliError {
    fn from(err: crate::errors::CardshareError) -> Self {
        match err {
            crate::errors::CardshareError::Validation(msg)
            | crate::errors::CardshareError::ImportParse(msg) => CliError::ParseError(msg),
            other => CliError::StorageError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        // main 会在 serve 时直接进入 server 模式
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),

        // 以下两个命令不需要数据库
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => commands::config_generate(output_path, force).await,

        Commands::Token {
            action:
                TokenCommands::Issue {
                    user,
                    email,
                    minutes,
                },
        } => commands::issue_token(&user, &email, minutes),

        Commands::Contacts { action } => {
            let storage = StorageFactory::create()
                .await
                .map_err(|e| CliError::StorageError(e.to_string()))?;
            match action {
                ContactsCommands::Import {
                    file_path,
                    user,
                    format,
                } => commands::import_contacts(storage, &user, &file_path, format).await,
                ContactsCommands::Export {
                    user,
                    format,
                    output,
                } => commands::export_contacts(storage, &user, format, output).await,
            }
        }

        Commands::Cards {
            action: CardsCommands::List { user },
        } => {
            let storage = StorageFactory::create()
                .await
                .map_err(|e| CliError::StorageError(e.to_string()))?;
            commands::list_cards(storage, &user).await
        }
    }
}
