//! Catalogs: TOML-defined knowledge and rule bundles.
//!
//! A catalog declares the criteria a user can select, the conclusions rules
//! can prove, and the rules themselves. The programming language catalog is
//! bundled into the binary once per [`Locale`]; other catalogs can be loaded
//! from disk.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::Locale;
use crate::error::{AdvisorResult, CatalogError};
use crate::knowledge::{Entry, KnowledgeBase};
use crate::rules::{RuleBase, RuleSpec};

// ── Data model ──────────────────────────────────────────────────────────

/// A parsed, not yet validated catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub name: String,
    pub description: String,
    /// Catalog-specific "no match" message, overriding the locale default.
    pub no_match: Option<String>,
    pub criteria: Vec<Entry>,
    pub conclusions: Vec<Entry>,
    pub rules: Vec<RuleSpec>,
    pub source: CatalogSource,
}

/// Where a catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Bundled into the binary via `include_str!`.
    Bundled,
    /// Loaded from a file.
    External(PathBuf),
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Bundled => write!(f, "bundled"),
            CatalogSource::External(path) => write!(f, "{}", path.display()),
        }
    }
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CatalogToml {
    catalog: CatalogMeta,
    #[serde(default)]
    criteria: Vec<Entry>,
    #[serde(default)]
    conclusions: Vec<Entry>,
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
struct CatalogMeta {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    no_match: Option<String>,
}

const LANGUAGES_TOML: &str = include_str!("../data/catalog.toml");
const LANGUAGES_ID_TOML: &str = include_str!("../data/catalog.id.toml");

// ── Loading ─────────────────────────────────────────────────────────────

impl Catalog {
    /// The bundled programming language catalog with English labels.
    pub fn bundled() -> AdvisorResult<Self> {
        Self::bundled_for(Locale::En)
    }

    /// The bundled programming language catalog labelled for `locale`.
    ///
    /// Every locale shares the same identifiers and rules.
    pub fn bundled_for(locale: Locale) -> AdvisorResult<Self> {
        let toml_str = match locale {
            Locale::En => LANGUAGES_TOML,
            Locale::Id => LANGUAGES_ID_TOML,
        };
        Self::parse(toml_str, CatalogSource::Bundled)
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> AdvisorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, CatalogSource::External(path.to_path_buf()))
    }

    /// Parse a catalog from TOML text.
    pub fn parse(toml_str: &str, source: CatalogSource) -> AdvisorResult<Self> {
        let parsed: CatalogToml = toml::from_str(toml_str).map_err(|e| CatalogError::Parse {
            path: source.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            name: parsed.catalog.name,
            description: parsed.catalog.description,
            no_match: parsed.catalog.no_match,
            criteria: parsed.criteria,
            conclusions: parsed.conclusions,
            rules: parsed.rules,
            source,
        })
    }

    /// Validate the catalog into a knowledge base and an ordered rule base.
    pub fn build(&self) -> AdvisorResult<(KnowledgeBase, RuleBase)> {
        let kb = KnowledgeBase::new(self.criteria.clone(), self.conclusions.clone())?;
        let rules = RuleBase::new(&kb, self.rules.clone())?;

        tracing::info!(
            catalog = %self.name,
            source = %self.source,
            criteria = kb.criteria_len(),
            conclusions = kb.conclusions_len(),
            rules = rules.len(),
            "catalog loaded"
        );

        Ok((kb, rules))
    }
}
