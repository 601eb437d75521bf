mod card;
mod challenge;
mod company;
mod graphql;
mod harvest;
mod init;
mod item;
mod need;
mod overview;
mod utils;
mod wallet;
mod work_log;

pub use card::handle_card;
pub use challenge::handle_challenge;
pub use company::handle_company;
pub use graphql::{handle_mutate, handle_query, handle_serve};
pub use harvest::handle_harvest;
pub use init::handle_init;
pub use item::handle_item;
pub use need::handle_need;
pub use overview::handle_overview;
pub use wallet::handle_wallet;
pub use work_log::handle_log;

use crate::config::FurrowConfig;
use crate::model::Company;
use crate::ops::companies;
use crate::store::Store;
use anyhow::{Result, bail};
use serde::Serialize;
use std::path::PathBuf;

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: FurrowConfig,
    pub config_path: PathBuf,
    pub root: PathBuf,
    pub store: Store,
    /// Company given with `--company` or `FURROW_COMPANY`
    pub company: Option<String>,
    pub json: bool,
}

impl CommandContext {
    pub fn new(
        mut config: FurrowConfig,
        config_path: PathBuf,
        root: PathBuf,
        data_path: Option<String>,
        company: Option<String>,
        json: bool,
    ) -> Self {
        if let Some(path) = data_path {
            config.furrow.path = path;
        }
        let store = Store::new(&config, &root);
        Self {
            config,
            config_path,
            root,
            store,
            company,
            json,
        }
    }

    /// The company commands act on: `--company`, then the configured default, then the only
    /// active company if there is exactly one.
    pub fn company(&self) -> Result<Company> {
        if let Some(id) = self.company.as_deref().or(self.config.furrow.default_company.as_deref()) {
            return Ok(companies::get_company(&self.store, id)?);
        }
        let mut active = companies::list_companies(&self.store, false)?;
        match active.len() {
            1 => Ok(active.remove(0)),
            0 => bail!("No company yet. Create one with 'furrow company add <name>'"),
            _ => bail!("Several companies exist. Pass --company <id> or run 'furrow company use <id>'"),
        }
    }

    pub fn company_id(&self) -> Result<String> {
        Ok(self.company()?.id)
    }

    /// Company filter for read commands: only set when one was chosen explicitly.
    pub fn company_filter(&self) -> Option<String> {
        self.company
            .clone()
            .or_else(|| self.config.furrow.default_company.clone())
    }

    /// Prints `value` as JSON with `--json`, otherwise runs `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}
