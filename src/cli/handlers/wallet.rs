use crate::cli::commands::WalletCommand;
use crate::model::{CashEntryKind, CashPool};
use crate::ops::wallet;
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::money;

pub fn handle_wallet(ctx: &CommandContext, command: WalletCommand) -> Result<()> {
    match command {
        WalletCommand::List => {
            let company = ctx.company_filter();
            let pools = wallet::list_pools(&ctx.store, company.as_deref())?;
            ctx.emit(&pools, |pools| {
                if pools.is_empty() {
                    println!("No cash pools yet.");
                }
                for p in pools {
                    println!(
                        "{} {} / {} balance {}",
                        p.id.cyan(),
                        p.project_id.blue(),
                        p.crop,
                        money(ctx, p.balance).bold()
                    );
                }
            })
        }
        WalletCommand::Show { id } => {
            let pool = wallet::get_pool(&ctx.store, &id)?;
            ctx.emit(&pool, |p| print_pool(ctx, p))
        }
        WalletCommand::TopUp {
            amount,
            pool,
            project,
            crop,
            reference,
        } => {
            let pool_id = match (pool, project, crop) {
                (Some(id), _, _) => id,
                (None, Some(project), Some(crop)) => {
                    let company_id = ctx.company_id()?;
                    wallet::find_or_create_pool(&ctx.store, &company_id, &project, &crop)?.id
                }
                _ => anyhow::bail!("Give --pool, or --project and --crop"),
            };
            let pool = wallet::top_up(&ctx.store, &pool_id, amount, reference)?;
            ctx.emit(&pool, |p| {
                println!(
                    "{} {} +{}; balance {}",
                    "Topped up".green(),
                    p.id.cyan(),
                    money(ctx, amount),
                    money(ctx, p.balance)
                )
            })
        }
    }
}

fn print_pool(ctx: &CommandContext, pool: &CashPool) {
    println!(
        "{} {} / {}",
        pool.id.cyan().bold(),
        pool.project_id.blue(),
        pool.crop.bold()
    );
    println!("Balance:  {}", money(ctx, pool.balance).bold());
    println!("Received: {}", money(ctx, pool.total_received));
    println!("Paid out: {}", money(ctx, pool.total_paid));
    if pool.entries.is_empty() {
        return;
    }
    println!();
    for e in &pool.entries {
        let amount = match e.kind {
            CashEntryKind::TopUp => format!("+{}", money(ctx, e.amount)).green(),
            CashEntryKind::Payout => format!("-{}", money(ctx, e.amount)).red(),
            CashEntryKind::CarryForward => format!("={}", money(ctx, e.amount)).dimmed(),
        };
        println!(
            "{} {:<14} {} -> {} {}",
            e.at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            e.kind.to_string(),
            amount,
            money(ctx, e.balance_after),
            e.reference.as_deref().unwrap_or("")
        );
    }
}
