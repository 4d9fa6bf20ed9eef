//! Forward-chaining inference with specificity priority.
//!
//! Runs the rule base to a fixpoint over a per-run fact set. Each pass walks
//! a snapshot of the rules that have not yet been consumed, in rule base
//! order, and builds the list for the next pass explicitly. A rule is
//! consumed the first time its premises hold: it either proves its
//! conclusion or, if that conclusion is already proven, is dropped without
//! firing. Conclusions are recorded in the order they are first proven.

use std::collections::HashSet;

use crate::error::{AdvisorError, AdvisorResult, KnowledgeError};
use crate::knowledge::{ConclusionId, FactRef, KnowledgeBase};
use crate::rules::RuleBase;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of one inference run.
#[derive(Debug, Clone)]
pub struct InferenceOutcome {
    /// Proven conclusions in the order they were first proven. No duplicates.
    pub proven: Vec<ConclusionId>,
    /// Final fact set: the seeds plus every proven conclusion.
    pub facts: HashSet<FactRef>,
    /// Number of passes over the remaining rules.
    pub passes: usize,
}

impl InferenceOutcome {
    /// Whether no conclusion was proven.
    pub fn is_empty(&self) -> bool {
        self.proven.is_empty()
    }

    /// Display labels of the proven conclusions, in proof order.
    ///
    /// `kb` must be the knowledge base the rule base was built from; a
    /// conclusion it does not register is an `UnknownConclusion` error.
    pub fn labels(&self, kb: &KnowledgeBase) -> AdvisorResult<Vec<String>> {
        self.proven
            .iter()
            .map(|&id| {
                kb.conclusion_label(id)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AdvisorError::from(KnowledgeError::UnknownConclusion { index: id.index() })
                    })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Forward-chaining engine over a borrowed rule base.
///
/// Holds no per-run state, so one engine can serve any number of
/// concurrent runs.
#[derive(Debug, Clone, Copy)]
pub struct InferenceEngine<'a> {
    rules: &'a RuleBase,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(rules: &'a RuleBase) -> Self {
        Self { rules }
    }

    /// Run forward chaining from `seeds` to a fixpoint.
    ///
    /// Total for any input: every firing consumes a rule, and a pass that
    /// fires nothing ends the run, so there are at most `rules + 1` passes.
    pub fn run<I>(&self, seeds: I) -> InferenceOutcome
    where
        I: IntoIterator<Item = FactRef>,
    {
        let rules = self.rules.rules();
        let mut facts: HashSet<FactRef> = seeds.into_iter().collect();
        let seeded = facts.len();
        let mut proven: Vec<ConclusionId> = Vec::new();
        let mut proven_set: HashSet<ConclusionId> = HashSet::new();
        let mut remaining: Vec<usize> = (0..rules.len()).collect();
        let mut passes = 0;

        while !remaining.is_empty() {
            passes += 1;
            let mut fired = false;
            let mut next = Vec::with_capacity(remaining.len());

            for &idx in &remaining {
                let rule = &rules[idx];
                if !rule.is_satisfied_by(&facts) {
                    next.push(idx);
                    continue;
                }

                let conclusion = rule.conclusion();
                if proven_set.contains(&conclusion) {
                    // Already proven by a more specific rule; consume without firing.
                    tracing::trace!(
                        rule = rule.name(),
                        pass = passes,
                        "rule satisfied, conclusion already proven"
                    );
                    continue;
                }

                tracing::trace!(rule = rule.name(), pass = passes, "rule fired");
                proven_set.insert(conclusion);
                proven.push(conclusion);
                // Visible to the rules after this one in the same pass.
                facts.insert(FactRef::Conclusion(conclusion));
                fired = true;
            }

            remaining = next;
            if !fired {
                break;
            }
        }

        tracing::debug!(
            seeds = seeded,
            proven = proven.len(),
            passes,
            "forward chaining reached fixpoint"
        );

        InferenceOutcome {
            proven,
            facts,
            passes,
        }
    }
}
