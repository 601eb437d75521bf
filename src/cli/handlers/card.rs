use crate::cli::commands::{CardCommand, PlanArgs};
use crate::model::{WorkCard, WorkCardStatus, WorkCardVariance, WorkPlan};
use crate::ops::{self, work_cards::{self, NewWorkCard, PlanEdit, WorkCardFilter}};
use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;

use super::CommandContext;
use super::utils::{format_card_status, money, print_card_list, print_created, print_deleted, print_updated};

impl From<PlanArgs> for WorkPlan {
    fn from(args: PlanArgs) -> Self {
        WorkPlan::new(args.date.unwrap_or_else(ops::today), args.workers, args.labor_cost)
            .with_inputs(args.inputs)
    }
}

pub fn handle_card(ctx: &CommandContext, command: CardCommand) -> Result<()> {
    match command {
        CardCommand::Plan {
            title,
            project,
            work_type,
            plan,
            notes,
        } => {
            let card = work_cards::plan_work_card(
                &ctx.store,
                NewWorkCard {
                    company_id: ctx.company_id()?,
                    project_id: project,
                    title,
                    work_type,
                    planned: plan.into(),
                    notes: notes.unwrap_or_default(),
                },
            )?;
            ctx.emit(&card, |c| print_created("work card", &c.id, &c.title))
        }
        CardCommand::List {
            project,
            status,
            unpaid,
        } => {
            let filter = if unpaid {
                WorkCardFilter {
                    company_id: ctx.company_filter(),
                    project_id: project,
                    status: Some(WorkCardStatus::Approved),
                    paid: Some(false),
                }
            } else {
                WorkCardFilter {
                    company_id: ctx.company_filter(),
                    project_id: project,
                    status,
                    paid: None,
                }
            };
            let cards = work_cards::list_work_cards(&ctx.store, &filter)?;
            ctx.emit(&cards, |cards| print_card_list(cards))
        }
        CardCommand::Show { id } => {
            let card = work_cards::get_work_card(&ctx.store, &id)?;
            let variance = card
                .actual
                .is_some()
                .then(|| work_cards::work_card_variance(&ctx.store, &id))
                .transpose()?;
            if ctx.json {
                let value = serde_json::json!({ "card": card, "variance": variance });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_card(ctx, &card);
                if let Some(ref variance) = variance {
                    println!();
                    print_variance(ctx, variance);
                }
            }
            Ok(())
        }
        CardCommand::Edit {
            id,
            title,
            work_type,
            date,
            workers,
            labor_cost,
            inputs,
            notes,
        } => {
            let current = work_cards::get_work_card(&ctx.store, &id)?;
            let plan_changed =
                date.is_some() || workers.is_some() || labor_cost.is_some() || !inputs.is_empty();
            let planned = plan_changed.then(|| {
                let old = current.planned;
                WorkPlan::new(
                    date.unwrap_or(old.date),
                    workers.unwrap_or(old.workers),
                    labor_cost.unwrap_or(old.labor_cost),
                )
                .with_inputs(if inputs.is_empty() { old.inputs } else { inputs })
            });
            let card = work_cards::edit_plan(
                &ctx.store,
                &id,
                PlanEdit {
                    title,
                    work_type,
                    planned,
                    notes,
                },
            )?;
            ctx.emit(&card, |c| print_updated("work card", &c.id))
        }
        CardCommand::Submit { id, actual, by } => {
            let card = work_cards::submit_actual(&ctx.store, &id, actual.into(), by)?;
            ctx.emit(&card, |c| {
                println!("{} {} for review", "Submitted".yellow(), c.id.cyan())
            })
        }
        CardCommand::Approve { id, by } => {
            let (card, log) = work_cards::approve_work_card(&ctx.store, &id, by)?;
            let value = serde_json::json!({ "card": card, "work_log": log });
            ctx.emit(&value, |_| {
                println!("{} {}", "Approved".green(), card.id.cyan());
                println!("  Logged work {} ({} workers)", log.id.cyan(), log.workers);
            })
        }
        CardCommand::Reject { id, reason, by } => {
            let card = work_cards::reject_work_card(&ctx.store, &id, &reason, by)?;
            ctx.emit(&card, |c| println!("{} {}", "Rejected".red(), c.id.cyan()))
        }
        CardCommand::Paid { id } => {
            let card = work_cards::mark_work_card_paid(&ctx.store, &id)?;
            ctx.emit(&card, |c| println!("{} {}", "Paid".green(), c.id.cyan()))
        }
        CardCommand::Delete { id } => {
            work_cards::delete_work_card(&ctx.store, &id)?;
            print_deleted("work card", &id);
            Ok(())
        }
    }
}

fn print_plan(ctx: &CommandContext, label: &str, plan: &WorkPlan) {
    println!(
        "{:<9} {} {} workers, labor {}",
        label,
        plan.date,
        plan.workers,
        money(ctx, plan.labor_cost)
    );
    for input in &plan.inputs {
        println!("          {} {} {}", input.name, input.quantity.normalize(), input.unit);
    }
}

fn print_card(ctx: &CommandContext, card: &WorkCard) {
    println!("{} {}", card.id.cyan().bold(), card.title.bold());
    println!("Status:   {}", format_card_status(card));
    println!("Project:  {}", card.project_id.blue());
    println!("Type:     {}", card.work_type);
    print_plan(ctx, "Planned:", &card.planned);
    if let Some(ref actual) = card.actual {
        print_plan(ctx, "Actual:", actual);
    }
    if let Some(ref by) = card.submitted_by {
        println!("By:       {}", by);
    }
    if let Some(ref reason) = card.rejection_reason {
        println!("Rejected: {}", reason.red());
    }
    if let Some(ref log) = card.work_log_id {
        println!("Work log: {}", log.cyan());
    }
    if !card.notes.is_empty() {
        println!();
        println!("{}", card.notes);
    }
}

fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", value.normalize())
    } else {
        value.normalize().to_string()
    }
}

fn print_variance(ctx: &CommandContext, v: &WorkCardVariance) {
    println!("{}", "Variance (actual - planned)".bold());
    println!(
        "  Workers:    {} -> {} ({:+})",
        v.planned_workers, v.actual_workers, v.worker_difference
    );
    println!(
        "  Labor cost: {} -> {} ({})",
        money(ctx, v.planned_labor_cost),
        money(ctx, v.actual_labor_cost),
        signed(v.labor_cost_difference)
    );
    for input in &v.inputs {
        println!(
            "  {}: {} -> {} {} ({})",
            input.name,
            input.planned.normalize(),
            input.actual.normalize(),
            input.unit,
            signed(input.difference)
        );
    }
}
