use crate::cli::commands::CompanyCommand;
use crate::model::Company;
use crate::ops::companies::{self, CompanyUpdate, NewCompany};
use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;
use super::utils::{print_created, print_deleted, print_updated};

pub fn handle_company(ctx: &mut CommandContext, command: CompanyCommand) -> Result<()> {
    match command {
        CompanyCommand::Add {
            name,
            location,
            contact,
            notes,
        } => {
            let company = companies::create_company(
                &ctx.store,
                NewCompany {
                    name,
                    location,
                    contact,
                    notes: notes.unwrap_or_default(),
                },
            )?;
            ctx.emit(&company, |c| print_created("company", &c.id, &c.name))
        }
        CompanyCommand::List { all } => {
            let list = companies::list_companies(&ctx.store, all)?;
            let default = ctx.config.furrow.default_company.clone();
            ctx.emit(&list, |list| print_company_list(list, default.as_deref()))
        }
        CompanyCommand::Show { id } => {
            let company = companies::get_company(&ctx.store, &id)?;
            let counts = companies::document_counts(&ctx.store, Some(&id))?;
            if ctx.json {
                let counts: serde_json::Map<String, serde_json::Value> = counts
                    .iter()
                    .map(|(collection, count)| (collection.to_string(), (*count).into()))
                    .collect();
                let value = serde_json::json!({ "company": company, "counts": counts });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_company(&company);
                println!();
                for (collection, count) in counts.iter().filter(|(_, n)| *n > 0) {
                    println!("  {:<22} {}", collection.to_string(), count);
                }
            }
            Ok(())
        }
        CompanyCommand::Update {
            id,
            name,
            location,
            contact,
            notes,
        } => {
            let company = companies::update_company(
                &ctx.store,
                &id,
                CompanyUpdate {
                    name,
                    location,
                    contact,
                    notes,
                },
            )?;
            ctx.emit(&company, |c| print_updated("company", &c.id))
        }
        CompanyCommand::Use { id } => {
            let company = companies::require_active_company(&ctx.store, &id)?;
            ctx.config.furrow.default_company = Some(company.id.clone());
            ctx.config
                .save(&ctx.config_path)
                .with_context(|| format!("Failed to save {}", ctx.config_path.display()))?;
            ctx.emit(&company, |c| {
                println!("{} {} {}", "Using".green(), c.id.cyan(), c.name)
            })
        }
        CompanyCommand::Deactivate { id } => {
            let company = companies::set_company_active(&ctx.store, &id, false)?;
            ctx.emit(&company, |c| println!("{} {}", "Deactivated".yellow(), c.id.cyan()))
        }
        CompanyCommand::Activate { id } => {
            let company = companies::set_company_active(&ctx.store, &id, true)?;
            ctx.emit(&company, |c| println!("{} {}", "Activated".green(), c.id.cyan()))
        }
        CompanyCommand::Delete { id } => {
            companies::delete_company(&ctx.store, &id)?;
            if ctx.config.furrow.default_company.as_deref() == Some(id.as_str()) {
                ctx.config.furrow.default_company = None;
                ctx.config.save(&ctx.config_path)?;
            }
            print_deleted("company", &id);
            Ok(())
        }
    }
}

fn print_company(company: &Company) {
    println!("{} {}", company.id.cyan().bold(), company.name.bold());
    if let Some(ref location) = company.location {
        println!("Location: {}", location);
    }
    if let Some(ref contact) = company.contact {
        println!("Contact:  {}", contact);
    }
    if !company.active {
        println!("Status:   {}", "inactive".dimmed());
    }
    println!(
        "Created:  {}",
        company.created.format("%Y-%m-%d %H:%M").to_string().dimmed()
    );
    if !company.notes.is_empty() {
        println!();
        println!("{}", company.notes);
    }
}

fn print_company_list(list: &[Company], default: Option<&str>) {
    if list.is_empty() {
        println!("No companies found.");
        return;
    }
    for company in list {
        let marker = if default == Some(company.id.as_str()) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        let inactive = if company.active {
            String::new()
        } else {
            "(inactive)".dimmed().to_string()
        };
        println!(
            "{} {} {} {} {}",
            marker,
            company.id.cyan(),
            company.name,
            company.location.as_deref().unwrap_or("").dimmed(),
            inactive
        );
    }
}
