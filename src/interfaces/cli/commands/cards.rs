//! List cards command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::CardService;
use crate::services::analytics::engagement_rate;
use crate::storage::SeaOrmStorage;

pub async fn list_cards(storage: Arc<SeaOrmStorage>, user_id: &str) -> Result<(), CliError> {
    let service = CardService::new(storage);
    let cards = service.get_user_cards(user_id).await?;

    if cards.is_empty() {
        println!("{} No cards found for {}", "ℹ".bold().blue(), user_id.cyan());
        return Ok(());
    }

    println!("{}", "Cards:".bold().green());
    println!();
    for card in &cards {
        let mut parts = vec![format!(
            "{} {}",
            card.id.cyan(),
            card.display_name().bold()
        )];
        if !card.is_active {
            parts.push("(inactive)".dimmed().yellow().to_string());
        } else if !card.is_public {
            parts.push("(private)".dimmed().yellow().to_string());
        }
        parts.push(
            format!(
                "views {} / shares {} / contacts {} / engagement {}",
                card.view_count,
                card.share_count,
                card.contact_count,
                engagement_rate(card.view_count, card.share_count, card.contact_count)
            )
            .dimmed()
            .to_string(),
        );
        println!("  {}", parts.join(" "));
        println!("    {}", service.card_url(&card.id).blue().underline());
    }
    println!();
    println!(
        "{} Total {} cards",
        "ℹ".bold().blue(),
        cards.len().to_string().green()
    );
    Ok(())
}
