//! Config file loading and creation for the liga shell.
//!
//! Config lives at ~/.config/liga/config.toml.
//! All fields are optional; CLI flags override config values.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Snapshot file used when neither `--file` nor the config names one
pub const DEFAULT_LEAGUE_FILE: &str = "league.json";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LigaConfig {
    pub league_file: Option<PathBuf>,
    pub group_size: Option<usize>,
    pub log_level: Option<String>,
    pub default_name: Option<String>,
    pub default_stake: Option<u32>,
}

impl LigaConfig {
    pub fn league_file(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.league_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEAGUE_FILE))
    }

    pub fn group_size(&self, flag: Option<usize>) -> usize {
        flag.or(self.group_size).unwrap_or(4)
    }

    pub fn log_level(&self, verbose: bool) -> &str {
        if verbose {
            return "debug";
        }
        self.log_level.as_deref().unwrap_or("warn")
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# liga configuration
# All values here can be overridden by CLI flags.

# League snapshot file opened by `liga shell`, `liga standings`, ...
# league_file = \"league.json\"

# Players per table for new draws (3 or 4)
# group_size = 4

# Log level written to stderr (error, warn, info, debug, trace).
# RUST_LOG takes precedence when set.
# log_level = \"warn\"

# Name and base stake of leagues created with `liga new`
# default_name = \"Card League\"
# default_stake = 100
";

/// Returns the default config path: ~/.config/liga/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("liga").join("config.toml"))
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> Result<LigaConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LigaConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config at {}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
