use crate::model::{
    CollectionStatus, HarvestCollection, InventoryItem, NeededStatus, SeasonChallenge, Severity,
    WorkCard, WorkCardStatus, WorkLog,
};
use colored::{ColoredString, Colorize};
use rust_decimal::Decimal;

use super::CommandContext;

/// Amount with the configured currency code, two decimals.
pub fn money(ctx: &CommandContext, amount: Decimal) -> String {
    format!("{} {:.2}", ctx.config.furrow.currency, amount)
}

pub fn format_card_status(card: &WorkCard) -> ColoredString {
    match card.status {
        WorkCardStatus::Planned => "planned".white(),
        WorkCardStatus::Submitted => "submitted".yellow(),
        WorkCardStatus::Approved if card.paid => "paid".green().bold(),
        WorkCardStatus::Approved => "approved".green(),
        WorkCardStatus::Rejected => "rejected".red(),
    }
}

pub fn format_collection_status(status: CollectionStatus) -> ColoredString {
    match status {
        CollectionStatus::Open => "open".green(),
        CollectionStatus::Closed => "closed".dimmed(),
    }
}

pub fn format_needed_status(status: NeededStatus) -> ColoredString {
    match status {
        NeededStatus::Pending => "pending".yellow(),
        NeededStatus::Ordered => "ordered".blue(),
        NeededStatus::Received => "received".green(),
        NeededStatus::Cancelled => "cancelled".dimmed(),
    }
}

pub fn format_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => "critical".red().bold(),
        Severity::High => "high".red(),
        Severity::Medium => "medium".yellow(),
        Severity::Low => "low".dimmed(),
    }
}

pub fn print_created(kind: &str, id: &str, label: &str) {
    println!("{} {} {} {}", "Created".green(), kind, id.cyan(), label);
}

pub fn print_updated(kind: &str, id: &str) {
    println!("{} {} {}", "Updated".green(), kind, id.cyan());
}

pub fn print_deleted(kind: &str, id: &str) {
    println!("{} {} {}", "Deleted".red(), kind, id.cyan());
}

pub fn print_item_list(ctx: &CommandContext, items: &[InventoryItem]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }
    for item in items {
        let quantity = format!("{} {}", item.quantity.normalize(), item.unit);
        let quantity = if item.is_low_stock() {
            quantity.red().bold()
        } else {
            quantity.normal()
        };
        let value = item
            .stock_value()
            .map(|v| money(ctx, v).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "{} {} [{}] {} {}",
            item.id.cyan(),
            item.name,
            item.category.to_string().blue(),
            quantity,
            value
        );
    }
}

pub fn print_collection_list(ctx: &CommandContext, collections: &[HarvestCollection]) {
    if collections.is_empty() {
        println!("No harvest collections found.");
        return;
    }
    for c in collections {
        println!(
            "{} {} {} {} {}/kg [{}]",
            c.id.cyan(),
            c.harvest_date.to_string().dimmed(),
            format_collection_status(c.status),
            c.name,
            money(ctx, c.price_per_kg),
            c.project_id.blue()
        );
    }
}

pub fn print_work_log_list(logs: &[WorkLog]) {
    if logs.is_empty() {
        println!("No work logs found.");
        return;
    }
    for log in logs {
        let hours = log
            .hours
            .map(|h| format!(" x {}h", h.normalize()))
            .unwrap_or_default();
        println!(
            "{} {} [{}] {} {} workers{} {}",
            log.id.cyan(),
            log.date.to_string().dimmed(),
            log.project_id.blue(),
            log.work_type.bold(),
            log.workers,
            hours,
            log.description
        );
    }
}

pub fn print_card_list(cards: &[WorkCard]) {
    if cards.is_empty() {
        println!("No work cards found.");
        return;
    }
    for card in cards {
        println!(
            "{} {} [{}] {} ({})",
            card.id.cyan(),
            format_card_status(card),
            card.project_id.blue(),
            card.title,
            card.work_type.dimmed()
        );
    }
}

pub fn print_challenge_list(challenges: &[SeasonChallenge]) {
    if challenges.is_empty() {
        println!("No challenges found.");
        return;
    }
    for c in challenges {
        let state = if c.resolved {
            "resolved".green()
        } else {
            "open".yellow()
        };
        println!(
            "{} {} {} [{}] {} {}",
            c.id.cyan(),
            format_severity(c.severity),
            state,
            c.category.to_string().blue(),
            c.title,
            c.season.dimmed()
        );
    }
}
