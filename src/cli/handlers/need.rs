use crate::cli::commands::NeedCommand;
use crate::model::NeededItem;
use crate::ops::needed::{self, NewNeededItem, Receipt};
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{format_needed_status, money, print_created};

pub fn handle_need(ctx: &CommandContext, command: NeedCommand) -> Result<()> {
    match command {
        NeedCommand::Add {
            name,
            quantity,
            unit,
            category,
            item,
            notes,
        } => {
            let needed = needed::add_needed_item(
                &ctx.store,
                NewNeededItem {
                    company_id: ctx.company_id()?,
                    name,
                    quantity,
                    unit,
                    category,
                    item_id: item,
                    notes: notes.unwrap_or_default(),
                },
            )?;
            ctx.emit(&needed, |n| print_created("needed item", &n.id, &n.name))
        }
        NeedCommand::List { status } => {
            let company = ctx.company_filter();
            let list = needed::list_needed_items(&ctx.store, company.as_deref(), status)?;
            ctx.emit(&list, |list| print_needed_list(list))
        }
        NeedCommand::Order { id } => {
            let needed = needed::mark_ordered(&ctx.store, &id)?;
            ctx.emit(&needed, |n| println!("{} {} {}", "Ordered".blue(), n.id.cyan(), n.name))
        }
        NeedCommand::Receive {
            id,
            unit_cost,
            quantity,
            supplier,
            date,
        } => {
            let outcome = needed::receive_needed_item(
                &ctx.store,
                &id,
                Receipt {
                    quantity,
                    unit_cost,
                    supplier,
                    received_on: date,
                },
            )?;
            ctx.emit(&outcome, |o| {
                println!(
                    "{} {} into {} {} (now {} {}, cost {})",
                    "Received".green(),
                    o.needed.name,
                    if o.created_item { "new item" } else { "item" },
                    o.item.id.cyan(),
                    o.item.quantity.normalize(),
                    o.item.unit,
                    money(ctx, o.purchase.total_cost)
                )
            })
        }
        NeedCommand::Cancel { id } => {
            let needed = needed::cancel_needed_item(&ctx.store, &id)?;
            ctx.emit(&needed, |n| println!("{} {}", "Cancelled".dimmed(), n.id.cyan()))
        }
    }
}

fn print_needed_list(list: &[NeededItem]) {
    if list.is_empty() {
        println!("Nothing needed.");
        return;
    }
    for n in list {
        println!(
            "{} {} {} {} {} [{}]",
            n.id.cyan(),
            format_needed_status(n.status),
            n.name,
            n.quantity.normalize(),
            n.unit,
            n.category.to_string().blue()
        );
    }
}
