//! Knowledge base: the closed registries of criteria and conclusions.
//!
//! Criteria are the facts a user can select ("web project", "beginner
//! experience"); conclusions are the recommendations rules can derive.
//! Both live in one identifier namespace and are addressed internally by
//! dense typed indices wrapped in [`FactRef`], so the engine never inspects
//! identifier strings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorResult, KnowledgeError};

/// Index of a criterion in its [`KnowledgeBase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CriterionId(usize);

impl CriterionId {
    /// Position of the criterion in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a conclusion in its [`KnowledgeBase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ConclusionId(usize);

impl ConclusionId {
    /// Position of the conclusion in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A typed reference to anything that can be held true during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactRef {
    /// A user-selectable criterion.
    Criterion(CriterionId),
    /// A derivable conclusion.
    Conclusion(ConclusionId),
}

impl FactRef {
    /// Returns the conclusion id if this is a conclusion.
    pub fn as_conclusion(self) -> Option<ConclusionId> {
        match self {
            Self::Conclusion(id) => Some(id),
            Self::Criterion(_) => None,
        }
    }

    /// Returns `true` if this refers to a criterion.
    pub fn is_criterion(self) -> bool {
        matches!(self, Self::Criterion(_))
    }
}

impl From<CriterionId> for FactRef {
    fn from(id: CriterionId) -> Self {
        Self::Criterion(id)
    }
}

impl From<ConclusionId> for FactRef {
    fn from(id: ConclusionId) -> Self {
        Self::Conclusion(id)
    }
}

/// A registered identifier with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier code, e.g. `P_web` or `C_js`.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl Entry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Immutable registry of criteria and conclusions.
///
/// Safe to share across threads; nothing mutates it after [`KnowledgeBase::new`].
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    criteria: Vec<Entry>,
    conclusions: Vec<Entry>,
    /// Identifier code → typed reference, over both registries.
    index: HashMap<String, FactRef>,
}

impl KnowledgeBase {
    /// Build a knowledge base from criteria and conclusions in declaration order.
    ///
    /// Identifiers must be non-blank and unique across both registries.
    pub fn new(criteria: Vec<Entry>, conclusions: Vec<Entry>) -> AdvisorResult<Self> {
        let mut index = HashMap::with_capacity(criteria.len() + conclusions.len());

        let refs = criteria
            .iter()
            .enumerate()
            .map(|(i, e)| (e, FactRef::Criterion(CriterionId(i))))
            .chain(
                conclusions
                    .iter()
                    .enumerate()
                    .map(|(i, e)| (e, FactRef::Conclusion(ConclusionId(i)))),
            );

        for (entry, fact) in refs {
            if entry.id.trim().is_empty() {
                return Err(KnowledgeError::EmptyIdentifier {
                    label: entry.label.clone(),
                }
                .into());
            }
            if index.insert(entry.id.clone(), fact).is_some() {
                return Err(KnowledgeError::DuplicateIdentifier {
                    id: entry.id.clone(),
                }
                .into());
            }
        }

        Ok(Self {
            criteria,
            conclusions,
            index,
        })
    }

    /// Resolve an identifier code to a typed reference.
    pub fn resolve(&self, id: &str) -> Option<FactRef> {
        self.index.get(id).copied()
    }

    /// Display label for an identifier code.
    pub fn label_of(&self, id: &str) -> AdvisorResult<&str> {
        self.resolve(id)
            .map(|fact| self.label(fact))
            .ok_or_else(|| KnowledgeError::UnknownIdentifier { id: id.to_string() }.into())
    }

    /// Display label for a typed reference.
    ///
    /// # Panics
    ///
    /// If `fact` was minted by a different, smaller knowledge base.
    pub fn label(&self, fact: FactRef) -> &str {
        &self.entry(fact).label
    }

    /// Identifier code for a typed reference.
    ///
    /// # Panics
    ///
    /// If `fact` was minted by a different, smaller knowledge base.
    pub fn code(&self, fact: FactRef) -> &str {
        &self.entry(fact).id
    }

    /// Display label of a conclusion, or `None` if `id` is out of range.
    pub fn conclusion_label(&self, id: ConclusionId) -> Option<&str> {
        self.conclusions.get(id.0).map(|e| e.label.as_str())
    }

    fn entry(&self, fact: FactRef) -> &Entry {
        match fact {
            FactRef::Criterion(id) => &self.criteria[id.0],
            FactRef::Conclusion(id) => &self.conclusions[id.0],
        }
    }

    /// Criteria in declaration order.
    pub fn criteria(&self) -> impl Iterator<Item = (CriterionId, &Entry)> {
        self.criteria
            .iter()
            .enumerate()
            .map(|(i, e)| (CriterionId(i), e))
    }

    /// Conclusions in declaration order.
    pub fn conclusions(&self) -> impl Iterator<Item = (ConclusionId, &Entry)> {
        self.conclusions
            .iter()
            .enumerate()
            .map(|(i, e)| (ConclusionId(i), e))
    }

    pub fn criteria_len(&self) -> usize {
        self.criteria.len()
    }

    pub fn conclusions_len(&self) -> usize {
        self.conclusions.len()
    }
}
