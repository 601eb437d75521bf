use crate::error::{FurrowError, Result};
use crate::store::FrontmatterFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project config file, searched upward from the working directory.
pub const CONFIG_FILE: &str = ".furrow.toml";

/// Default data directory, relative to the project root.
pub const DATA_DIR: &str = ".furrow";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FurrowConfig {
    #[serde(default)]
    pub furrow: FurrowSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FurrowSettings {
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_id_length")]
    pub id_length: usize,

    #[serde(default = "default_frontmatter")]
    pub frontmatter: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_company: Option<String>,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_path() -> String {
    DATA_DIR.to_string()
}

fn default_id_length() -> usize {
    6
}

fn default_frontmatter() -> String {
    "toml".to_string()
}

fn default_currency() -> String {
    "KES".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for FurrowSettings {
    fn default() -> Self {
        Self {
            path: default_path(),
            id_length: default_id_length(),
            frontmatter: default_frontmatter(),
            default_company: None,
            currency: default_currency(),
        }
    }
}

impl FurrowSettings {
    pub fn frontmatter_format(&self) -> FrontmatterFormat {
        match self.frontmatter.as_str() {
            "yaml" | "yml" => FrontmatterFormat::Yaml,
            _ => FrontmatterFormat::Toml,
        }
    }
}

impl FurrowConfig {
    /// Load the config found at or above `start_path`.
    ///
    /// Returns the config together with the project root (the directory holding the file).
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = Self::find_config_file(start_path)?;
        Self::load_file(&config_path)
    }

    pub fn load_file(config_path: &Path) -> Result<(Self, PathBuf)> {
        if !config_path.exists() {
            return Err(FurrowError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }
        let content = std::fs::read_to_string(config_path)?;
        let config: FurrowConfig = toml::from_str(&content)?;
        config.validate()?;

        let project_root = config_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                FurrowError::Config("Config file has no parent directory".to_string())
            })?;
        tracing::debug!(path = %config_path.display(), "Loaded config");
        Ok((config, project_root))
    }

    pub fn find_config_file(start_path: &Path) -> Result<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(config_path);
            }
            if !current.pop() {
                return Err(FurrowError::NotInitialized);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.furrow.id_length < 4 || self.furrow.id_length > 32 {
            return Err(FurrowError::Config(format!(
                "id_length must be between 4 and 32, got {}",
                self.furrow.id_length
            )));
        }
        if !matches!(self.furrow.frontmatter.as_str(), "toml" | "yaml" | "yml") {
            return Err(FurrowError::Config(format!(
                "Unknown frontmatter format '{}' (expected toml or yaml)",
                self.furrow.frontmatter
            )));
        }
        Ok(())
    }

    pub fn data_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.furrow.path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: FurrowConfig = toml::from_str("").unwrap();
        assert_eq!(config.furrow.path, ".furrow");
        assert_eq!(config.furrow.id_length, 6);
        assert_eq!(config.furrow.currency, "KES");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.furrow.frontmatter_format(), FrontmatterFormat::Toml);
    }

    #[test]
    fn test_load_searches_upward() {
        let temp_dir = TempDir::new().unwrap();
        let config = FurrowConfig::default();
        config.save(&temp_dir.path().join(CONFIG_FILE)).unwrap();

        let nested = temp_dir.path().join("fields").join("block-a");
        std::fs::create_dir_all(&nested).unwrap();

        let (loaded, root) = FurrowConfig::load(&nested).unwrap();
        assert_eq!(root, temp_dir.path());
        assert_eq!(loaded.furrow.id_length, 6);
    }

    #[test]
    fn test_missing_config_is_not_initialized() {
        let temp_dir = TempDir::new().unwrap();
        let err = FurrowConfig::find_config_file(temp_dir.path()).unwrap_err();
        assert!(matches!(err, FurrowError::NotInitialized));
    }

    #[test]
    fn test_rejects_unknown_frontmatter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[furrow]\nfrontmatter = \"json\"\n").unwrap();
        assert!(matches!(
            FurrowConfig::load_file(&path),
            Err(FurrowError::Config(_))
        ));
    }

    #[test]
    fn test_default_company_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        let mut config = FurrowConfig::default();
        config.furrow.default_company = Some("co-abc123".to_string());
        config.save(&path).unwrap();

        let (loaded, _) = FurrowConfig::load_file(&path).unwrap();
        assert_eq!(loaded.furrow.default_company.as_deref(), Some("co-abc123"));
    }
}
