use crate::ops::overview;
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{money, print_card_list, print_collection_list, print_item_list};

pub fn handle_overview(ctx: &CommandContext) -> Result<()> {
    let company = ctx.company_filter();
    let overview = overview::overview(&ctx.store, company.as_deref())?;

    ctx.emit(&overview, |o| {
        match o.company {
            Some(ref company) => println!("{} {}", company.name.bold(), company.id.cyan()),
            None => println!("{}", "All companies".bold()),
        }
        println!("Cash in pools: {}", money(ctx, o.pool_balance).bold());
        println!("Open challenges: {}", o.open_challenges);

        println!("\n{}", "Records".bold());
        for c in o.counts.iter().filter(|c| c.count > 0) {
            println!("  {:<22} {}", c.collection, c.count);
        }

        if !o.low_stock.is_empty() {
            println!("\n{}", "Low stock".red().bold());
            print_item_list(ctx, &o.low_stock);
        }
        if !o.open_collections.is_empty() {
            println!("\n{}", "Open harvest collections".bold());
            print_collection_list(ctx, &o.open_collections);
        }
        if !o.cards_awaiting_review.is_empty() {
            println!("\n{}", "Work cards awaiting review".yellow().bold());
            print_card_list(&o.cards_awaiting_review);
        }
        if !o.cards_awaiting_payment.is_empty() {
            println!("\n{}", "Approved work cards not yet paid".bold());
            print_card_list(&o.cards_awaiting_payment);
        }
    })
}
