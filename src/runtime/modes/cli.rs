//! CLI mode

use crate::interfaces::cli::{CliError, run_cli_command};

/// 解析命令行并执行（参数错误时由 clap 打印帮助并退出）
pub async fn run_cli() -> Result<(), CliError> {
    use clap::Parser;

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Some(command) => run_cli_command(command).await,
        None => Err(CliError::CommandError("No command given".to_string())),
    }
}
