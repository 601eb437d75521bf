use crate::cli::commands::ChallengeCommand;
use crate::model::SeasonChallenge;
use crate::ops::challenges::{self, ChallengeFilter, ChallengeUpdate, NewChallenge};
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{format_severity, print_challenge_list, print_created, print_deleted, print_updated};

pub fn handle_challenge(ctx: &CommandContext, command: ChallengeCommand) -> Result<()> {
    match command {
        ChallengeCommand::Add {
            title,
            season,
            category,
            severity,
            project,
            date,
            notes,
        } => {
            let challenge = challenges::report_challenge(
                &ctx.store,
                NewChallenge {
                    company_id: ctx.company_id()?,
                    project_id: project,
                    season,
                    title,
                    category,
                    severity,
                    observed_on: date,
                    notes: notes.unwrap_or_default(),
                },
            )?;
            ctx.emit(&challenge, |c| print_created("challenge", &c.id, &c.title))
        }
        ChallengeCommand::List {
            season,
            category,
            severity,
            open,
            resolved,
        } => {
            let filter = ChallengeFilter {
                company_id: ctx.company_filter(),
                season,
                category,
                severity,
                resolved: match (open, resolved) {
                    (true, _) => Some(false),
                    (_, true) => Some(true),
                    _ => None,
                },
            };
            let list = challenges::list_challenges(&ctx.store, &filter)?;
            ctx.emit(&list, |list| print_challenge_list(list))
        }
        ChallengeCommand::Show { id } => {
            let challenge = challenges::get_challenge(&ctx.store, &id)?;
            ctx.emit(&challenge, print_challenge)
        }
        ChallengeCommand::Update {
            id,
            title,
            season,
            category,
            severity,
            project,
            date,
            notes,
        } => {
            let challenge = challenges::update_challenge(
                &ctx.store,
                &id,
                ChallengeUpdate {
                    project_id: project,
                    season,
                    title,
                    category,
                    severity,
                    observed_on: date,
                    notes,
                },
            )?;
            ctx.emit(&challenge, |c| print_updated("challenge", &c.id))
        }
        ChallengeCommand::Resolve { id, resolution } => {
            let challenge = challenges::resolve_challenge(&ctx.store, &id, &resolution)?;
            ctx.emit(&challenge, |c| println!("{} {}", "Resolved".green(), c.id.cyan()))
        }
        ChallengeCommand::Reopen { id } => {
            let challenge = challenges::reopen_challenge(&ctx.store, &id)?;
            ctx.emit(&challenge, |c| println!("{} {}", "Reopened".yellow(), c.id.cyan()))
        }
        ChallengeCommand::Delete { id } => {
            challenges::delete_challenge(&ctx.store, &id)?;
            print_deleted("challenge", &id);
            Ok(())
        }
        ChallengeCommand::Summary { season } => {
            let filter = ChallengeFilter {
                company_id: ctx.company_filter(),
                season,
                ..Default::default()
            };
            let summary = challenges::challenge_summary(&ctx.store, &filter)?;
            ctx.emit(&summary, |seasons| {
                if seasons.is_empty() {
                    println!("No challenges recorded.");
                }
                for s in seasons {
                    println!("{} {} total, {} open", s.season.bold(), s.total, s.open);
                    let categories: Vec<String> = s
                        .by_category
                        .iter()
                        .map(|c| format!("{} {}", c.category, c.count))
                        .collect();
                    println!("  Categories: {}", categories.join(", "));
                    let severities: Vec<String> = s
                        .by_severity
                        .iter()
                        .map(|c| format!("{} {}", format_severity(c.severity), c.count))
                        .collect();
                    println!("  Severity:   {}", severities.join(", "));
                }
            })
        }
    }
}

fn print_challenge(c: &SeasonChallenge) {
    println!("{} {}", c.id.cyan().bold(), c.title.bold());
    println!("Season:   {}", c.season);
    println!("Category: {}", c.category.to_string().blue());
    println!("Severity: {}", format_severity(c.severity));
    println!("Observed: {}", c.observed_on);
    if let Some(ref project) = c.project_id {
        println!("Project:  {}", project.blue());
    }
    match c.resolution {
        Some(ref resolution) if c.resolved => println!("Resolved: {}", resolution.green()),
        _ => println!("Status:   {}", "open".yellow()),
    }
    if !c.notes.is_empty() {
        println!();
        println!("{}", c.notes);
    }
}
