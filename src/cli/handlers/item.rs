use crate::cli::commands::ItemCommand;
use crate::ops::inventory::{self, ItemFilter, ItemUpdate, NewItem, Restock, Usage};
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{money, print_created, print_deleted, print_item_list, print_updated};

pub fn handle_item(ctx: &CommandContext, command: ItemCommand) -> Result<()> {
    match command {
        ItemCommand::Add {
            name,
            unit,
            category,
            quantity,
            reorder_level,
            unit_cost,
            notes,
        } => {
            let item = inventory::add_item(
                &ctx.store,
                NewItem {
                    company_id: ctx.company_id()?,
                    name,
                    category,
                    unit,
                    quantity,
                    reorder_level,
                    unit_cost,
                    notes: notes.unwrap_or_default(),
                },
            )?;
            ctx.emit(&item, |i| print_created("item", &i.id, &i.name))
        }
        ItemCommand::List { category, low } => {
            let items = inventory::list_items(
                &ctx.store,
                &ItemFilter {
                    company_id: ctx.company_filter(),
                    category,
                    low_stock: low,
                },
            )?;
            ctx.emit(&items, |items| print_item_list(ctx, items))
        }
        ItemCommand::Show { id } => {
            let history = inventory::item_history(&ctx.store, &id)?;
            ctx.emit(&history, |h| {
                let item = &h.item;
                println!("{} {}", item.id.cyan().bold(), item.name.bold());
                println!("Category: {}", item.category.to_string().blue());
                let on_hand = format!("{} {}", item.quantity.normalize(), item.unit);
                if item.is_low_stock() {
                    println!("On hand:  {} {}", on_hand.red().bold(), "(low)".red());
                } else {
                    println!("On hand:  {}", on_hand);
                }
                println!("Reorder:  {} {}", item.reorder_level.normalize(), item.unit);
                if let Some(cost) = item.unit_cost {
                    println!("Cost:     {} / {}", money(ctx, cost), item.unit);
                }
                if !h.purchases.is_empty() {
                    println!("\n{}", "Purchases".bold());
                    for p in &h.purchases {
                        println!(
                            "  {} +{} {} {}",
                            p.purchased_on.to_string().dimmed(),
                            p.quantity.normalize(),
                            money(ctx, p.total_cost),
                            p.supplier.as_deref().unwrap_or("")
                        );
                    }
                }
                if !h.usages.is_empty() {
                    println!("\n{}", "Usage".bold());
                    for u in &h.usages {
                        println!(
                            "  {} -{} {} {}",
                            u.used_on.to_string().dimmed(),
                            u.quantity.normalize(),
                            u.purpose,
                            u.project_id.as_deref().unwrap_or("").blue()
                        );
                    }
                }
                if !item.notes.is_empty() {
                    println!("\n{}", item.notes);
                }
            })
        }
        ItemCommand::Update {
            id,
            name,
            category,
            unit,
            reorder_level,
            notes,
        } => {
            let item = inventory::update_item(
                &ctx.store,
                &id,
                ItemUpdate {
                    name,
                    category,
                    unit,
                    reorder_level,
                    notes,
                },
            )?;
            ctx.emit(&item, |i| print_updated("item", &i.id))
        }
        ItemCommand::Restock {
            id,
            quantity,
            unit_cost,
            supplier,
            date,
        } => {
            let (item, purchase) = inventory::restock_item(
                &ctx.store,
                &id,
                Restock {
                    quantity,
                    unit_cost,
                    supplier,
                    purchased_on: date,
                },
            )?;
            let result = serde_json::json!({ "item": item, "purchase": purchase });
            ctx.emit(&result, |_| {
                println!(
                    "{} {} +{} {} (now {} {}, cost {})",
                    "Restocked".green(),
                    item.id.cyan(),
                    purchase.quantity.normalize(),
                    item.unit,
                    item.quantity.normalize(),
                    item.unit,
                    money(ctx, purchase.total_cost)
                )
            })
        }
        ItemCommand::Use {
            id,
            quantity,
            purpose,
            project,
            date,
            workers,
            no_log,
        } => {
            let outcome = inventory::use_item(
                &ctx.store,
                &id,
                Usage {
                    quantity,
                    purpose,
                    project_id: project,
                    used_on: date,
                    log_work: !no_log,
                    workers,
                },
            )?;
            ctx.emit(&outcome, |o| {
                println!(
                    "{} {} -{} {} (left {} {})",
                    "Used".green(),
                    o.item.id.cyan(),
                    o.usage.quantity.normalize(),
                    o.item.unit,
                    o.item.quantity.normalize(),
                    o.item.unit
                );
                if let Some(ref log) = o.work_log {
                    println!("  Logged work {} ({})", log.id.cyan(), log.work_type);
                }
            })
        }
        ItemCommand::Adjust {
            id,
            quantity,
            reason,
        } => {
            let item = inventory::adjust_stock(&ctx.store, &id, quantity, &reason)?;
            ctx.emit(&item, |i| {
                println!(
                    "{} {} to {} {}",
                    "Adjusted".yellow(),
                    i.id.cyan(),
                    i.quantity.normalize(),
                    i.unit
                )
            })
        }
        ItemCommand::Delete { id } => {
            inventory::delete_item(&ctx.store, &id)?;
            print_deleted("item", &id);
            Ok(())
        }
    }
}
