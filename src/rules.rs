//! Data-driven rules for forward-chaining recommendation.
//!
//! Rules are declared as plain data ([`RuleSpec`]: identifier strings, as found
//! in a catalog file) and validated against a [`KnowledgeBase`] into typed
//! [`Rule`]s. A [`RuleBase`] keeps them ordered by specificity: rules with more
//! premises come first, and rules of equal size keep their declaration order.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorResult, RuleError};
use crate::knowledge::{ConclusionId, FactRef, KnowledgeBase};

// ---------------------------------------------------------------------------
// Rule declaration
// ---------------------------------------------------------------------------

/// An unvalidated rule as declared in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Optional display name; defaults to `rule-<n>` by declaration position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Premise identifiers (criteria or conclusions).
    pub premises: Vec<String>,
    /// Conclusion identifier.
    pub conclusion: String,
}

impl RuleSpec {
    pub fn new<I, S>(premises: I, conclusion: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            premises: premises.into_iter().map(Into::into).collect(),
            conclusion: conclusion.into(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Validated rule
// ---------------------------------------------------------------------------

/// A validated rule: if every premise holds, the conclusion is proven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    /// Deduplicated premises, in declaration order.
    premises: Vec<FactRef>,
    conclusion: ConclusionId,
    /// Position in the original declaration list.
    declared_at: usize,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn premises(&self) -> &[FactRef] {
        &self.premises
    }

    pub fn conclusion(&self) -> ConclusionId {
        self.conclusion
    }

    /// Number of distinct premises.
    pub fn specificity(&self) -> usize {
        self.premises.len()
    }

    pub fn declared_at(&self) -> usize {
        self.declared_at
    }

    /// Whether every premise is contained in `facts`.
    pub fn is_satisfied_by(&self, facts: &HashSet<FactRef>) -> bool {
        self.premises.iter().all(|p| facts.contains(p))
    }

    fn validate(spec: RuleSpec, declared_at: usize, kb: &KnowledgeBase) -> AdvisorResult<Self> {
        let name = spec
            .name
            .unwrap_or_else(|| format!("rule-{}", declared_at + 1));

        if spec.premises.is_empty() {
            return Err(RuleError::InvalidRule {
                rule: name,
                reason: "rule has no premises".into(),
            }
            .into());
        }

        let mut premises = Vec::with_capacity(spec.premises.len());
        for code in &spec.premises {
            let fact = kb.resolve(code).ok_or_else(|| RuleError::InvalidRule {
                rule: name.clone(),
                reason: format!("premise \"{code}\" is not in the knowledge base"),
            })?;
            if !premises.contains(&fact) {
                premises.push(fact);
            }
        }

        let conclusion = match kb.resolve(&spec.conclusion) {
            Some(FactRef::Conclusion(id)) => id,
            Some(FactRef::Criterion(_)) => {
                return Err(RuleError::InvalidRule {
                    rule: name,
                    reason: format!(
                        "conclusion \"{}\" is a criterion, not a conclusion",
                        spec.conclusion
                    ),
                }
                .into());
            }
            None => {
                return Err(RuleError::InvalidRule {
                    rule: name,
                    reason: format!(
                        "conclusion \"{}\" is not in the knowledge base",
                        spec.conclusion
                    ),
                }
                .into());
            }
        };

        Ok(Self {
            name,
            premises,
            conclusion,
            declared_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Rule base
// ---------------------------------------------------------------------------

/// Validated rules ordered by descending specificity.
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Validate `specs` against `kb` and order them by specificity.
    ///
    /// The sort is stable, so rules with the same number of premises keep
    /// their declaration order. Any invalid rule aborts construction.
    pub fn new(kb: &KnowledgeBase, specs: Vec<RuleSpec>) -> AdvisorResult<Self> {
        let mut rules = specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| Rule::validate(spec, i, kb))
            .collect::<AdvisorResult<Vec<_>>>()?;

        rules.sort_by_key(|r| Reverse(r.specificity()));

        Ok(Self { rules })
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::knowledge::Entry;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::new(
            vec![
                Entry::new("P_a", "A"),
                Entry::new("P_b", "B"),
                Entry::new("P_c", "C"),
            ],
            vec![Entry::new("C_x", "X"), Entry::new("C_y", "Y")],
        )
        .unwrap()
    }

    fn names(rb: &RuleBase) -> Vec<&str> {
        rb.rules().iter().map(|r| r.name()).collect()
    }

    #[test]
    fn sorted_by_descending_specificity() {
        let rb = RuleBase::new(
            &kb(),
            vec![
                RuleSpec::new(["P_a"], "C_x").with_name("one"),
                RuleSpec::new(["P_a", "P_b", "P_c"], "C_y").with_name("three"),
                RuleSpec::new(["P_a", "P_b"], "C_x").with_name("two"),
            ],
        )
        .unwrap();
        assert_eq!(names(&rb), ["three", "two", "one"]);
    }

    #[test]
    fn equal_specificity_keeps_declaration_order() {
        let rb = RuleBase::new(
            &kb(),
            vec![
                RuleSpec::new(["P_c"], "C_y").with_name("first"),
                RuleSpec::new(["P_a", "P_b"], "C_x").with_name("pair-1"),
                RuleSpec::new(["P_a"], "C_x").with_name("second"),
                RuleSpec::new(["P_b", "P_c"], "C_y").with_name("pair-2"),
                RuleSpec::new(["P_b"], "C_y").with_name("third"),
            ],
        )
        .unwrap();
        assert_eq!(names(&rb), ["pair-1", "pair-2", "first", "second", "third"]);
        assert_eq!(rb.rules()[0].declared_at(), 1);
    }

    #[test]
    fn default_names_follow_declaration_position() {
        let rb = RuleBase::new(
            &kb(),
            vec![RuleSpec::new(["P_a"], "C_x"), RuleSpec::new(["P_b"], "C_y")],
        )
        .unwrap();
        assert_eq!(names(&rb), ["rule-1", "rule-2"]);
    }

    #[test]
    fn duplicate_premises_collapse() {
        let rb = RuleBase::new(
            &kb(),
            vec![
                RuleSpec::new(["P_a", "P_a"], "C_x").with_name("dup"),
                RuleSpec::new(["P_b", "P_c"], "C_y").with_name("pair"),
            ],
        )
        .unwrap();
        // The duplicated premise counts once, so the real pair sorts first.
        assert_eq!(names(&rb), ["pair", "dup"]);
        assert_eq!(rb.rules()[1].specificity(), 1);
    }

    #[test]
    fn unknown_premise_is_invalid() {
        let err = RuleBase::new(&kb(), vec![RuleSpec::new(["P_zzz"], "C_x")]).unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::Rule(RuleError::InvalidRule { ref rule, ref reason })
                if rule == "rule-1" && reason.contains("P_zzz")
        ));
    }

    #[test]
    fn unknown_conclusion_is_invalid() {
        let err = RuleBase::new(&kb(), vec![RuleSpec::new(["P_a"], "C_zzz")]).unwrap_err();
        assert!(matches!(err, AdvisorError::Rule(RuleError::InvalidRule { .. })));
    }

    #[test]
    fn criterion_as_conclusion_is_invalid() {
        let err = RuleBase::new(&kb(), vec![RuleSpec::new(["P_a"], "P_b")]).unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::Rule(RuleError::InvalidRule { ref reason, .. }) if reason.contains("criterion")
        ));
    }

    #[test]
    fn empty_premises_are_invalid() {
        let err = RuleBase::new(
            &kb(),
            vec![RuleSpec::new(Vec::<String>::new(), "C_x").with_name("bare")],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::Rule(RuleError::InvalidRule { ref rule, .. }) if rule == "bare"
        ));
    }

    #[test]
    fn conclusion_may_be_a_premise() {
        let kb = kb();
        let rb = RuleBase::new(&kb, vec![RuleSpec::new(["C_x", "P_c"], "C_y")]).unwrap();
        let rule = &rb.rules()[0];
        assert_eq!(rule.premises()[0], kb.resolve("C_x").unwrap());
        assert_eq!(FactRef::from(rule.conclusion()), kb.resolve("C_y").unwrap());
    }

    #[test]
    fn satisfaction_is_subset_test() {
        let kb = kb();
        let rb = RuleBase::new(&kb, vec![RuleSpec::new(["P_a", "P_b"], "C_x")]).unwrap();
        let rule = &rb.rules()[0];

        let mut facts: HashSet<FactRef> = [kb.resolve("P_a").unwrap()].into_iter().collect();
        assert!(!rule.is_satisfied_by(&facts));
        facts.insert(kb.resolve("P_b").unwrap());
        facts.insert(kb.resolve("P_c").unwrap());
        assert!(rule.is_satisfied_by(&facts));
    }
}
