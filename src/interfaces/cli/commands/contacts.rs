//! Import and export contact commands

use colored::Colorize;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::{ContactService, TransferFormat};
use crate::storage::SeaOrmStorage;

/// 显式给出的格式优先，其次文件后缀，最后 csv
fn resolve_format(explicit: Option<&str>, path: Option<&str>) -> Result<TransferFormat, CliError> {
    if let Some(raw) = explicit {
        return TransferFormat::from_str(raw).map_err(CliError::from);
    }
    Ok(path
        .and_then(TransferFormat::from_filename)
        .unwrap_or_default())
}

pub async fn import_contacts(
    storage: Arc<SeaOrmStorage>,
    user_id: &str,
    file_path: &str,
    format: Option<String>,
) -> Result<(), CliError> {
    let format = resolve_format(format.as_deref(), Some(file_path))?;

    let text = std::fs::read_to_string(file_path).map_err(|e| {
        CliError::CommandError(format!("Failed to read '{}': {}", file_path, e))
    })?;

    println!(
        "{} Importing {} ({}) for {}",
        "→".bold().blue(),
        file_path.cyan(),
        format,
        user_id.cyan()
    );

    let service = ContactService::new(storage);
    let report = service.import_contacts(user_id, format, &text).await?;

    println!(
        "{} Imported {} of {} contacts",
        "✓".bold().green(),
        report.success.to_string().green(),
        report.total
    );
    if report.failed > 0 {
        println!(
            "{} {} rows failed:",
            "⚠".bold().yellow(),
            report.failed.to_string().yellow()
        );
        for err in report.display_errors() {
            println!("  {}", err.dimmed());
        }
    }
    Ok(())
}

pub async fn export_contacts(
    storage: Arc<SeaOrmStorage>,
    user_id: &str,
    format: Option<String>,
    output: Option<String>,
) -> Result<(), CliError> {
    let format = resolve_format(format.as_deref(), None)?;

    let service = ContactService::new(storage);
    let file = service.export_contacts(user_id, format).await?;
    let output_path = output.unwrap_or(file.filename);

    if let Some(parent) = Path::new(&output_path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::CommandError(format!("Failed to create '{}': {}", parent.display(), e))
        })?;
    }

    std::fs::write(&output_path, file.body).map_err(|e| {
        CliError::CommandError(format!(
            "Failed to write export file '{}': {}",
            output_path, e
        ))
    })?;

    println!(
        "{} Exported contacts for {} to {}",
        "✓".bold().green(),
        user_id.cyan(),
        output_path.blue()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_precedence() {
        assert_eq!(
            resolve_format(Some("json"), Some("people.vcf")).unwrap(),
            TransferFormat::Json
        );
        assert_eq!(
            resolve_format(None, Some("people.vcf")).unwrap(),
            TransferFormat::Vcard
        );
        assert_eq!(
            resolve_format(None, Some("people.txt")).unwrap(),
            TransferFormat::Csv
        );
        assert!(resolve_format(Some("xml"), None).is_err());
    }
}
