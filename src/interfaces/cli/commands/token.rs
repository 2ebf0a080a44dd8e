//! Issue access token command

use colored::Colorize;

use crate::api::jwt::JwtService;
use crate::interfaces::cli::CliError;

pub fn issue_token(user_id: &str, email: &str, minutes: Option<u64>) -> Result<(), CliError> {
    if user_id.trim().is_empty() {
        return Err(CliError::ParseError("--user must not be empty".to_string()));
    }

    let config = crate::config::get_config();
    // 随机密钥签出的 token 对服务端无效
    if config.auth.jwt_secret.trim().is_empty() {
        return Err(CliError::CommandError(
            "auth.jwt_secret is not configured; set it in config.toml or CS__AUTH__JWT_SECRET"
                .to_string(),
        ));
    }

    let service = JwtService::from_config();
    let token = service
        .generate_access_token(user_id.trim(), email.trim(), minutes)
        .map_err(|e| CliError::CommandError(format!("Failed to sign token: {}", e)))?;

    eprintln!(
        "{} Token for {} valid for {} minutes",
        "✓".bold().green(),
        user_id.cyan(),
        minutes.unwrap_or(service.access_token_minutes())
    );
    println!("{}", token);
    Ok(())
}
