//! Rich diagnostic error types for the lang-advisor crate.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for lang-advisor.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum AdvisorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Knowledge base errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum KnowledgeError {
    #[error("unknown identifier: \"{id}\"")]
    #[diagnostic(
        code(advisor::knowledge::unknown_identifier),
        help(
            "The identifier is not registered as a criterion or a conclusion. \
             List the registered identifiers with `lang-advisor criteria` and \
             `lang-advisor conclusions`."
        )
    )]
    UnknownIdentifier { id: String },

    #[error("duplicate identifier: \"{id}\"")]
    #[diagnostic(
        code(advisor::knowledge::duplicate_identifier),
        help(
            "Criteria and conclusions share one identifier namespace. \
             Rename one of the entries so every identifier is unique."
        )
    )]
    DuplicateIdentifier { id: String },

    #[error("empty identifier for entry labelled \"{label}\"")]
    #[diagnostic(
        code(advisor::knowledge::empty_identifier),
        help("Every criterion and conclusion needs a non-blank `id`.")
    )]
    EmptyIdentifier { label: String },

    #[error("conclusion #{index} is not registered in this knowledge base")]
    #[diagnostic(
        code(advisor::knowledge::unknown_conclusion),
        help(
            "Render an inference outcome with the knowledge base its rule base \
             was built from."
        )
    )]
    UnknownConclusion { index: usize },
}

// ---------------------------------------------------------------------------
// Rule base errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RuleError {
    #[error("invalid rule '{rule}': {reason}")]
    #[diagnostic(
        code(advisor::rules::invalid_rule),
        help(
            "Every rule needs at least one premise and a conclusion, and every \
             identifier it references must be registered in the knowledge base. \
             Rule conclusions must name a conclusion, not a criterion."
        )
    )]
    InvalidRule { rule: String, reason: String },
}

// ---------------------------------------------------------------------------
// Input selection errors (strict policy only)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SelectionError {
    #[error("unknown criterion: \"{id}\"")]
    #[diagnostic(
        code(advisor::selection::unknown_identifier),
        help(
            "The strict input policy rejects identifiers that are not registered. \
             Run `lang-advisor criteria` to see valid codes, or switch to the \
             permissive policy to ignore unknown codes."
        )
    )]
    UnknownIdentifier { id: String },

    #[error("\"{id}\" is a conclusion, not a selectable criterion")]
    #[diagnostic(
        code(advisor::selection::not_selectable),
        help("Only criteria can be selected under the strict input policy.")
    )]
    NotSelectable { id: String },
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to read catalog file: {path}")]
    #[diagnostic(
        code(advisor::catalog::io),
        help("Ensure the catalog file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {message}")]
    #[diagnostic(
        code(advisor::catalog::parse),
        help(
            "Check the catalog TOML syntax: a [catalog] table followed by \
             [[criteria]], [[conclusions]] and [[rules]] arrays."
        )
    )]
    Parse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(advisor::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(advisor::config::parse),
        help(
            "Valid keys are `catalog`, `input_policy` (\"permissive\" or \"strict\"), \
             `locale` (\"en\" or \"id\") and `no_match_message`."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config for {path}: {message}")]
    #[diagnostic(
        code(advisor::config::serialize),
        help("The config could not be rendered as TOML. Check the values being saved.")
    )]
    Serialize { path: String, message: String },

    #[error("failed to write config file: {path}")]
    #[diagnostic(
        code(advisor::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for lang-advisor results.
pub type AdvisorResult<T> = std::result::Result<T, AdvisorError>;
