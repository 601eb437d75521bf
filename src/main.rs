use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use furrow::cli::handlers::{self, CommandContext};
use furrow::cli::{Cli, Commands};
use furrow::config::{CONFIG_FILE, FurrowConfig};

/// Global flags needed to build a command context.
struct GlobalOptions {
    config: Option<String>,
    data_path: Option<String>,
    company: Option<String>,
    json: bool,
}

impl GlobalOptions {
    /// Load the configuration (the `--config` file, else the nearest `.furrow.toml`).
    fn into_context(self) -> Result<CommandContext> {
        let (cfg, root, config_path) = match self.config {
            Some(path) => {
                let path = PathBuf::from(path);
                let (cfg, root) = FurrowConfig::load_file(&path)?;
                (cfg, root, path)
            }
            None => {
                let (cfg, root) = FurrowConfig::load(&std::env::current_dir()?)?;
                let path = root.join(CONFIG_FILE);
                (cfg, root, path)
            }
        };
        Ok(CommandContext::new(
            cfg,
            config_path,
            root,
            self.data_path,
            self.company,
            self.json,
        ))
    }
}

fn main() -> Result<()> {
    let Cli {
        command,
        config,
        data_path,
        company,
        json,
        verbose,
        log_file,
    } = Cli::parse();

    furrow::logging::init(verbose, log_file.map(PathBuf::from));

    let options = GlobalOptions {
        config,
        data_path,
        company,
        json,
    };

    match command {
        Commands::Init {
            id_length,
            frontmatter,
            currency,
        } => handlers::handle_init(id_length, frontmatter, currency, options.data_path),
        Commands::Company(cmd) => handlers::handle_company(&mut options.into_context()?, cmd),
        Commands::Item(cmd) => handlers::handle_item(&options.into_context()?, cmd),
        Commands::Need(cmd) => handlers::handle_need(&options.into_context()?, cmd),
        Commands::Harvest(cmd) => handlers::handle_harvest(&options.into_context()?, cmd),
        Commands::Wallet(cmd) => handlers::handle_wallet(&options.into_context()?, cmd),
        Commands::Log(cmd) => handlers::handle_log(&options.into_context()?, cmd),
        Commands::Card(cmd) => handlers::handle_card(&options.into_context()?, cmd),
        Commands::Challenge(cmd) => handlers::handle_challenge(&options.into_context()?, cmd),
        Commands::Overview => handlers::handle_overview(&options.into_context()?),
        Commands::Query { query, variables } => {
            handlers::handle_query(options.into_context()?, query, variables)
        }
        Commands::Mutate {
            mutation,
            variables,
        } => handlers::handle_mutate(options.into_context()?, mutation, variables),
        Commands::Serve { port } => handlers::handle_serve(options.into_context()?, port),
    }
}
