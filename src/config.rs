//! Advisor configuration, persisted as TOML.
//!
//! ```toml
//! catalog = "catalog.toml"                     # omit for the bundled catalog
//! input_policy = "strict"                      # or "permissive" (default)
//! locale = "id"                                # or "en" (default)
//! no_match_message = "Nothing fits."           # optional override
//! ```
//!
//! A relative `catalog` path is resolved against the directory of the config
//! file it was loaded from.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorResult, ConfigError};

/// How identifiers that are not selectable criteria are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Unknown identifiers are dropped; they can never satisfy a premise.
    #[default]
    Permissive,
    /// Unknown identifiers and conclusion identifiers are rejected.
    Strict,
}

impl FromStr for InputPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown input policy \"{other}\" (expected \"permissive\" or \"strict\")"
            )),
        }
    }
}

/// Language of the bundled catalog labels and the built-in "no match" message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    /// The built-in message returned when nothing is proven.
    pub fn no_match_message(self) -> &'static str {
        match self {
            Locale::En => "No matching programming language found. Please choose different criteria.",
            Locale::Id => "Tidak ditemukan bahasa pemrograman yang cocok. Pilih kriteria lain.",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "id" => Ok(Self::Id),
            other => Err(format!("unsupported locale \"{other}\" (expected \"en\" or \"id\")")),
        }
    }
}

/// Configuration for an [`Advisor`](crate::advisor::Advisor).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Catalog file. `None` uses the bundled catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub input_policy: InputPolicy,
    #[serde(default)]
    pub locale: Locale,
    /// Overrides both the catalog's and the locale's "no match" message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_match_message: Option<String>,
}

impl AdvisorConfig {
    /// Load from a TOML file.
    ///
    /// A relative `catalog` path is rebased onto the config file's directory.
    pub fn load(path: &Path) -> AdvisorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let (Some(catalog), Some(dir)) = (config.catalog.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> AdvisorResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }
}
