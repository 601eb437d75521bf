use crate::cli::commands::HarvestCommand;
use crate::model::{CollectionSummary, PaymentBatch, Picker, PickerTotal};
use crate::ops::harvest::{self, CollectionFilter, NewCollection, NewPicker};
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{format_collection_status, money, print_collection_list, print_created};

pub fn handle_harvest(ctx: &CommandContext, command: HarvestCommand) -> Result<()> {
    match command {
        HarvestCommand::Open {
            project,
            crop,
            price,
            name,
            date,
            notes,
        } => {
            let collection = harvest::open_collection(
                &ctx.store,
                NewCollection {
                    company_id: ctx.company_id()?,
                    project_id: project,
                    crop,
                    name,
                    harvest_date: date,
                    price_per_kg: price,
                    notes: notes.unwrap_or_default(),
                },
            )?;
            ctx.emit(&collection, |c| {
                print_created("collection", &c.id, &c.name);
                println!(
                    "  Pool {} opening balance {}",
                    c.pool_id.cyan(),
                    money(ctx, c.opening_balance)
                );
            })
        }
        HarvestCommand::List { project, status } => {
            let collections = harvest::list_collections(
                &ctx.store,
                &CollectionFilter {
                    company_id: ctx.company_filter(),
                    project_id: project,
                    status,
                },
            )?;
            ctx.emit(&collections, |list| print_collection_list(ctx, list))
        }
        HarvestCommand::Show { id } => {
            let summary = harvest::collection_summary(&ctx.store, &id)?;
            let totals = harvest::picker_totals(&ctx.store, &id)?;
            if ctx.json {
                let value = serde_json::json!({ "summary": summary, "pickers": totals });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_summary(ctx, &summary);
                println!();
                print_totals(ctx, &totals);
            }
            Ok(())
        }
        HarvestCommand::Picker {
            collection,
            name,
            number,
            phone,
        } => {
            let picker = harvest::add_picker(
                &ctx.store,
                NewPicker {
                    collection_id: collection,
                    number,
                    name,
                    phone,
                },
            )?;
            ctx.emit(&picker, |p| {
                println!("{} picker #{} {} {}", "Added".green(), p.number, p.name, p.id.cyan())
            })
        }
        HarvestCommand::Pickers { collection } => {
            let totals = harvest::picker_totals(&ctx.store, &collection)?;
            ctx.emit(&totals, |totals| print_totals(ctx, totals))
        }
        HarvestCommand::Weigh {
            collection,
            picker,
            kg,
        } => {
            let picker = harvest::resolve_picker(&ctx.store, &collection, &picker)?;
            let entry = harvest::record_weight(&ctx.store, &collection, &picker.id, kg)?;
            ctx.emit(&entry, |e| {
                println!(
                    "{} #{} {} trip {}: {} kg",
                    "Weighed".green(),
                    picker.number,
                    picker.name,
                    e.trip,
                    e.kg.normalize()
                )
            })
        }
        HarvestCommand::Entries { collection, picker } => {
            let pickers = harvest::list_pickers(&ctx.store, &collection)?;
            let picker_id = picker
                .map(|key| harvest::resolve_picker(&ctx.store, &collection, &key))
                .transpose()?
                .map(|p| p.id);
            let entries = harvest::list_weigh_entries(&ctx.store, &collection, picker_id.as_deref())?;
            ctx.emit(&entries, |entries| {
                if entries.is_empty() {
                    println!("No weigh entries found.");
                }
                for e in entries {
                    let who = pickers
                        .iter()
                        .find(|p| p.id == e.picker_id)
                        .map(picker_label)
                        .unwrap_or_else(|| e.picker_id.clone());
                    println!("{} {} trip {} {} kg", e.id.cyan(), who, e.trip, e.kg.normalize());
                }
            })
        }
        HarvestCommand::Unweigh { entry } => {
            harvest::remove_weigh_entry(&ctx.store, &entry)?;
            println!("{} weigh entry {}", "Removed".red(), entry.cyan());
            Ok(())
        }
        HarvestCommand::Pay {
            collection,
            pickers,
            reference,
        } => {
            let picker_ids = pickers
                .iter()
                .map(|key| Ok(harvest::resolve_picker(&ctx.store, &collection, key)?.id))
                .collect::<Result<Vec<String>>>()?;
            let batch = harvest::pay_pickers(&ctx.store, &collection, &picker_ids, reference)?;
            ctx.emit(&batch, |b| {
                println!(
                    "{} batch {}: {} picker(s), {}",
                    "Paid".green(),
                    b.letter.bold(),
                    b.picker_ids.len(),
                    money(ctx, b.amount)
                )
            })
        }
        HarvestCommand::Batches { collection } => {
            let batches = harvest::payment_batches(&ctx.store, &collection)?;
            ctx.emit(&batches, |batches| print_batches(ctx, batches))
        }
        HarvestCommand::Close { collection, force } => {
            let closed = harvest::close_collection(&ctx.store, &collection, force)?;
            ctx.emit(&closed, |c| {
                println!(
                    "{} {}; {} carried forward",
                    "Closed".yellow(),
                    c.name,
                    money(ctx, c.closing_balance.unwrap_or_default())
                )
            })
        }
    }
}

fn picker_label(picker: &Picker) -> String {
    format!("#{} {}", picker.number, picker.name)
}

fn print_summary(ctx: &CommandContext, s: &CollectionSummary) {
    println!(
        "{} {} [{}]",
        s.collection_id.cyan().bold(),
        s.name.bold(),
        format_collection_status(s.status)
    );
    println!("Price:    {}/kg", money(ctx, s.price_per_kg));
    println!("Weighed:  {} kg over {} trips", s.total_kg.normalize(), s.trip_count);
    println!("Pay due:  {}", money(ctx, s.total_pay));
    println!(
        "Paid:     {} ({} of {} pickers)",
        money(ctx, s.paid_amount),
        s.paid_count,
        s.picker_count
    );
    if s.unpaid_amount > rust_decimal::Decimal::ZERO {
        println!("Owed:     {}", money(ctx, s.unpaid_amount).red());
    }
    println!("Opening:  {}", money(ctx, s.opening_balance));
    if let Some(closing) = s.closing_balance {
        println!("Closing:  {}", money(ctx, closing));
    }
    if !s.batches.is_empty() {
        println!();
        print_batches(ctx, &s.batches);
    }
}

fn print_totals(ctx: &CommandContext, totals: &[PickerTotal]) {
    if totals.is_empty() {
        println!("No pickers yet.");
        return;
    }
    for t in totals {
        let state = match (&t.payment_batch, t.paid) {
            (Some(letter), true) => format!("paid ({})", letter).green(),
            (None, true) => "paid".green(),
            _ => "unpaid".yellow(),
        };
        println!(
            "#{:<4} {:<20} {:>3} trips {:>8} kg {:>14} {}",
            t.number,
            t.name,
            t.trips,
            t.kg.normalize().to_string(),
            money(ctx, t.pay),
            state
        );
    }
}

fn print_batches(ctx: &CommandContext, batches: &[PaymentBatch]) {
    if batches.is_empty() {
        println!("No payments yet.");
        return;
    }
    for b in batches {
        let when = b
            .paid_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "Batch {} {} picker(s) {} {}",
            b.letter.bold(),
            b.picker_ids.len(),
            money(ctx, b.amount),
            when.dimmed()
        );
    }
}
