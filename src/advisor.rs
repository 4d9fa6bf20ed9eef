//! Advisor facade: top-level API for recommendation requests.
//!
//! The `Advisor` owns the shared knowledge and rule bases and turns raw
//! identifier strings from a caller into recommendation labels. It is cheap
//! to clone and safe to use from many threads at once: every request gets
//! its own inference working sets.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::{AdvisorConfig, InputPolicy};
use crate::error::{AdvisorResult, SelectionError};
use crate::inference::{InferenceEngine, InferenceOutcome};
use crate::knowledge::{FactRef, KnowledgeBase};
use crate::rules::RuleBase;

/// Caller input resolved against the knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Resolved facts, deduplicated, in input order.
    pub facts: Vec<FactRef>,
    /// Input identifiers that were dropped (permissive policy only).
    pub ignored: Vec<String>,
}

/// What the advisor tells the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "lines", rename_all = "snake_case")]
pub enum Recommendation {
    /// Labels of the proven conclusions in the order they were proven.
    Matches(Vec<String>),
    /// Nothing was proven; carries the "no match" message.
    NoMatch(String),
}

impl Recommendation {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matches(_))
    }

    /// The output list: one label per proven conclusion, or the single
    /// "no match" message.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Self::Matches(labels) => labels,
            Self::NoMatch(message) => vec![message],
        }
    }
}

/// Recommendation service over an immutable catalog.
#[derive(Debug, Clone)]
pub struct Advisor {
    knowledge: Arc<KnowledgeBase>,
    rules: Arc<RuleBase>,
    policy: InputPolicy,
    no_match: String,
}

impl Advisor {
    /// Create an advisor with the permissive policy and the English message.
    pub fn new(knowledge: KnowledgeBase, rules: RuleBase) -> Self {
        let config = AdvisorConfig::default();
        Self {
            knowledge: Arc::new(knowledge),
            rules: Arc::new(rules),
            policy: config.input_policy,
            no_match: config.locale.no_match_message().to_string(),
        }
    }

    /// Advisor over the bundled programming language catalog.
    pub fn builtin() -> AdvisorResult<Self> {
        Self::from_catalog(&Catalog::bundled()?, &AdvisorConfig::default())
    }

    /// Advisor over the catalog named in `config`, or the bundled one
    /// labelled for the configured locale.
    pub fn from_config(config: &AdvisorConfig) -> AdvisorResult<Self> {
        let catalog = match config.catalog {
            Some(ref path) => Catalog::load(path)?,
            None => Catalog::bundled_for(config.locale)?,
        };
        Self::from_catalog(&catalog, config)
    }

    /// Validate `catalog` and apply `config`.
    ///
    /// The "no match" message comes from the config override, then the
    /// catalog, then the configured locale.
    pub fn from_catalog(catalog: &Catalog, config: &AdvisorConfig) -> AdvisorResult<Self> {
        let (knowledge, rules) = catalog.build()?;
        let no_match = config
            .no_match_message
            .clone()
            .or_else(|| catalog.no_match.clone())
            .unwrap_or_else(|| config.locale.no_match_message().to_string());

        tracing::info!(
            catalog = %catalog.name,
            policy = ?config.input_policy,
            locale = ?config.locale,
            "advisor ready"
        );

        Ok(Self::new(knowledge, rules)
            .with_policy(config.input_policy)
            .with_no_match_message(no_match))
    }

    /// Set the input policy.
    pub fn with_policy(mut self, policy: InputPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the message returned when nothing is proven.
    pub fn with_no_match_message(mut self, message: impl Into<String>) -> Self {
        self.no_match = message.into();
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn no_match_message(&self) -> &str {
        &self.no_match
    }

    /// Resolve raw identifiers under the configured input policy.
    ///
    /// Identifiers are trimmed; blank ones are skipped and repeats collapse.
    pub fn resolve_selection<S: AsRef<str>>(&self, input: &[S]) -> AdvisorResult<Selection> {
        let mut selection = Selection::default();

        for raw in input {
            let code = raw.as_ref().trim();
            if code.is_empty() {
                continue;
            }

            match (self.knowledge.resolve(code), self.policy) {
                (Some(fact @ FactRef::Criterion(_)), _)
                | (Some(fact @ FactRef::Conclusion(_)), InputPolicy::Permissive) => {
                    if !selection.facts.contains(&fact) {
                        selection.facts.push(fact);
                    }
                }
                (Some(FactRef::Conclusion(_)), InputPolicy::Strict) => {
                    return Err(SelectionError::NotSelectable { id: code.to_string() }.into());
                }
                (None, InputPolicy::Strict) => {
                    return Err(SelectionError::UnknownIdentifier { id: code.to_string() }.into());
                }
                (None, InputPolicy::Permissive) => {
                    tracing::debug!(id = code, "ignoring unknown identifier");
                    selection.ignored.push(code.to_string());
                }
            }
        }

        Ok(selection)
    }

    /// Run inference for an already resolved selection.
    pub fn infer(&self, selection: &Selection) -> InferenceOutcome {
        InferenceEngine::new(&self.rules).run(selection.facts.iter().copied())
    }

    /// Recommend for an already resolved selection.
    ///
    /// Fails only if the rule base was built against a different knowledge
    /// base than the one passed to [`Advisor::new`].
    pub fn recommend_selection(&self, selection: &Selection) -> AdvisorResult<Recommendation> {
        let outcome = self.infer(selection);
        if outcome.is_empty() {
            Ok(Recommendation::NoMatch(self.no_match.clone()))
        } else {
            outcome.labels(&self.knowledge).map(Recommendation::Matches)
        }
    }

    /// Resolve `input` and recommend.
    ///
    /// Fails under the strict policy on input that is not a criterion.
    pub fn recommend<S: AsRef<str>>(&self, input: &[S]) -> AdvisorResult<Recommendation> {
        let selection = self.resolve_selection(input)?;
        self.recommend_selection(&selection)
    }

    /// Resolve `input` and return the output list directly.
    pub fn recommend_labels<S: AsRef<str>>(&self, input: &[S]) -> AdvisorResult<Vec<String>> {
        self.recommend(input).map(Recommendation::into_lines)
    }

    /// Recommend for many independent selections in parallel.
    ///
    /// Results are returned in input order.
    pub fn recommend_batch<S>(&self, inputs: &[Vec<S>]) -> Vec<AdvisorResult<Recommendation>>
    where
        S: AsRef<str> + Sync,
    {
        inputs
            .par_iter()
            .map(|input| self.recommend(input.as_slice()))
            .collect()
    }
}
