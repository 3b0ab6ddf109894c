use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "hearth.toml";
pub const DATABASE_ENV: &str = "HEARTH_DATABASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub batch_size: usize,
    /// Used when importing without a profile.
    pub default_date_format: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: hearth_import::DEFAULT_BATCH_SIZE,
            default_date_format: "%Y-%m-%d".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub log_filter: String,
    pub import: ImportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let database_path = project_dirs()
            .map(|dirs| dirs.data_dir().join("hearth.db"))
            .unwrap_or_else(|| PathBuf::from("hearth.db"));
        Self {
            database_path,
            log_filter: "info".to_string(),
            import: ImportSettings::default(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "hearth", "Hearth")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads settings from `path`, or from the platform config directory when
    /// `path` is `None`. Only an explicitly given file is required to exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::read(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::read(&p)?,
                _ => Self::default(),
            },
        };
        settings.apply_overrides(std::env::var_os(DATABASE_ENV).map(PathBuf::from));
        Ok(settings)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn apply_overrides(&mut self, database_path: Option<PathBuf>) {
        if let Some(db) = database_path {
            self.database_path = db;
        }
    }
}
