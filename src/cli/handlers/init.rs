use crate::cli::commands::FrontmatterArg;
use crate::config::{CONFIG_FILE, DATA_DIR, FurrowConfig, FurrowSettings};
use crate::error::FurrowError;
use anyhow::Result;
use colored::Colorize;

pub fn handle_init(
    id_length: usize,
    frontmatter: FrontmatterArg,
    currency: String,
    data_path: Option<String>,
) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE);

    if config_path.exists() {
        return Err(FurrowError::AlreadyInitialized(config_path.display().to_string()).into());
    }
    if !(4..=32).contains(&id_length) {
        anyhow::bail!("--id-length must be between 4 and 32");
    }

    let data_dir = data_path.unwrap_or_else(|| DATA_DIR.to_string());
    let config = FurrowConfig {
        furrow: FurrowSettings {
            path: data_dir.clone(),
            id_length,
            frontmatter: match frontmatter {
                FrontmatterArg::Toml => "toml",
                FrontmatterArg::Yaml => "yaml",
            }
            .to_string(),
            default_company: None,
            currency: currency.trim().to_uppercase(),
        },
        server: Default::default(),
    };

    let data_path = cwd.join(&data_dir);
    std::fs::create_dir_all(&data_path)?;
    config.save(&config_path)?;
    tracing::info!(path = %config_path.display(), "Initialized project");

    println!(
        "{} furrow project in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config: {}", config_path.display());
    println!("  Data:   {}", data_path.display());
    println!("Next: furrow company add \"<farm name>\"");

    Ok(())
}
