use crate::cli::commands::{LogCommand, LogFilterArgs};
use crate::ops::work_logs::{self, NewWorkLog, WorkLogFilter, WorkLogUpdate};
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{print_created, print_deleted, print_updated, print_work_log_list};

fn filter(ctx: &CommandContext, args: LogFilterArgs) -> WorkLogFilter {
    WorkLogFilter {
        company_id: ctx.company_filter(),
        project_id: args.project,
        from: args.from,
        to: args.to,
        work_type: args.work_type,
    }
}

pub fn handle_log(ctx: &CommandContext, command: LogCommand) -> Result<()> {
    match command {
        LogCommand::Add {
            project,
            work_type,
            workers,
            hours,
            description,
            date,
            notes,
        } => {
            let log = work_logs::log_work(
                &ctx.store,
                NewWorkLog {
                    company_id: ctx.company_id()?,
                    project_id: project,
                    date,
                    work_type: work_type.unwrap_or_default(),
                    workers,
                    hours,
                    description: description.unwrap_or_default(),
                    notes: notes.unwrap_or_default(),
                },
            )?;
            ctx.emit(&log, |l| print_created("work log", &l.id, &l.work_type))
        }
        LogCommand::List { filter: args } => {
            let logs = work_logs::list_work_logs(&ctx.store, &filter(ctx, args))?;
            ctx.emit(&logs, |logs| print_work_log_list(logs))
        }
        LogCommand::Update {
            id,
            project,
            work_type,
            workers,
            hours,
            description,
            date,
            notes,
        } => {
            let log = work_logs::update_work_log(
                &ctx.store,
                &id,
                WorkLogUpdate {
                    project_id: project,
                    date,
                    work_type,
                    workers,
                    hours,
                    description,
                    notes,
                },
            )?;
            ctx.emit(&log, |l| print_updated("work log", &l.id))
        }
        LogCommand::Delete { id } => {
            work_logs::delete_work_log(&ctx.store, &id)?;
            print_deleted("work log", &id);
            Ok(())
        }
        LogCommand::Summary { filter: args } => {
            let summary = work_logs::labor_summary(&ctx.store, &filter(ctx, args))?;
            ctx.emit(&summary, |rows| {
                if rows.is_empty() {
                    println!("No work logged.");
                }
                for row in rows {
                    println!(
                        "{:<20} {:>4} logs {:>6} worker-days {:>8} worker-hours",
                        row.work_type.bold().to_string(),
                        row.logs,
                        row.worker_days,
                        row.worker_hours.normalize().to_string()
                    );
                }
            })
        }
    }
}
