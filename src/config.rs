use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::error::{DocrError, Result};
use crate::log;

pub const CACHE_ENV: &str = "DOCR_CACHE";
pub const LIBRARY_ENV: &str = "DOCR_LIBRARY";
pub const CONFIG_ENV: &str = "DOCR_CONFIG";

/// Name of the toolchain-linked standard library
pub const STDLIB: &str = "crystal";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
    /// Compiler binary queried for the installed version
    #[serde(default = "default_toolchain")]
    pub toolchain: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Library name -> base URL serving `versions.json` and `<version>/index.json`
    #[serde(default = "default_sources")]
    pub sources: BTreeMap<String, String>,
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("docr"))
        .unwrap_or_else(|| PathBuf::from(".docr/cache"))
}

fn default_library_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("docr").join("library"))
        .unwrap_or_else(|| PathBuf::from(".docr/library"))
}

fn default_toolchain() -> String {
    STDLIB.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_sources() -> BTreeMap<String, String> {
    BTreeMap::from([(
        STDLIB.to_string(),
        "https://crystal-lang.org/api".to_string(),
    )])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            library_dir: default_library_dir(),
            toolchain: default_toolchain(),
            timeout_secs: default_timeout_secs(),
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Path of the config file, `$DOCR_CONFIG` taking precedence
    pub fn path() -> PathBuf {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|dir| dir.join("docr").join("docr.toml"))
            .unwrap_or_else(|| PathBuf::from("docr.toml"))
    }

    /// Load the config file (falling back to defaults) and apply environment overrides
    pub fn load() -> Self {
        let mut config = Self::load_file(&Self::path());
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    fn load_file(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(config) => {
                        return config;
                    }
                    Err(e) => {
                        log::warn(format!("Failed to parse {}: {}", path.display(), e));
                        log::warn("Using default configuration");
                    }
                },
                Err(e) => {
                    log::warn(format!("Failed to read {}: {}", path.display(), e));
                    log::warn("Using default configuration");
                }
            }
        }

        Config::default()
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `DOCR_CACHE` / `DOCR_LIBRARY` from the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(CACHE_ENV).filter(|v| !v.is_empty()) {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(LIBRARY_ENV).filter(|v| !v.is_empty()) {
            self.library_dir = PathBuf::from(dir);
        }
    }

    /// Directory where imports are assembled before they become visible
    pub fn staging_dir(&self) -> PathBuf {
        self.cache_dir.join("staging")
    }

    /// Create the cache and library directories if they are missing
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.cache_dir, &self.library_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| DocrError::io(dir, e))?;
                log::debug(format!("created {}", dir.display()));
            }
        }
        Ok(())
    }

    /// Looks up a value by its environment variable name (case-insensitive)
    pub fn env_value(&self, name: &str) -> Option<&Path> {
        match name.to_uppercase().as_str() {
            CACHE_ENV => Some(&self.cache_dir),
            LIBRARY_ENV => Some(&self.library_dir),
            _ => None,
        }
    }
}

pub const TEMPLATE: &str = r#"# docr configuration file

# Where downloads are staged before being moved into the library
# cache_dir = "~/.cache/docr"

# Where imported documentation is stored
# library_dir = "~/.local/share/docr/library"

# Compiler used to detect the standard library version for `docr update`
toolchain = "crystal"

# Timeout in seconds for documentation downloads
timeout_secs = 30

# Libraries importable over HTTP. Each base URL must serve
# `versions.json` and `<version>/index.json`.
[sources]
crystal = "https://crystal-lang.org/api"
"#;
