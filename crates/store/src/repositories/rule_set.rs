//! Rule set repository.
//!
//! Stores the latest version of each rule set. Older versions live on inside
//! the claims that were bound to them.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use spendflow_core::workflow::{RuleSet, RuleSetDefinition, WorkflowError};
use spendflow_shared::types::RuleSetId;

/// Rule set repository.
#[derive(Debug, Default)]
pub struct RuleSetRepository {
    rule_sets: DashMap<RuleSetId, RuleSet>,
}

impl RuleSetRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates version 1 of `id`, or the next version if it exists.
    ///
    /// The write happens under the entry lock, so concurrent edits of the
    /// same rule set produce consecutive versions.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the definition violates the rule set
    /// invariants; the stored version is left as it was.
    pub fn create_or_update(
        &self,
        id: RuleSetId,
        definition: RuleSetDefinition,
    ) -> Result<RuleSet, WorkflowError> {
        let RuleSetDefinition {
            name,
            steps,
            conditional,
        } = definition;

        match self.rule_sets.entry(id) {
            Entry::Occupied(mut current) => {
                let next = current.get().revise(name, steps, conditional)?;
                current.insert(next.clone());
                Ok(next)
            }
            Entry::Vacant(slot) => {
                let created = RuleSet::new(id, name, steps, conditional)?;
                slot.insert(created.clone());
                Ok(created)
            }
        }
    }

    /// Finds the latest version of a rule set.
    #[must_use]
    pub fn find_by_id(&self, id: RuleSetId) -> Option<RuleSet> {
        self.rule_sets.get(&id).map(|entry| entry.value().clone())
    }

    /// Lists the latest version of every rule set, ordered by name.
    #[must_use]
    pub fn list(&self) -> Vec<RuleSet> {
        let mut rule_sets: Vec<RuleSet> =
            self.rule_sets.iter().map(|e| e.value().clone()).collect();
        rule_sets.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        rule_sets
    }

    /// Number of rule sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    /// Returns true if no rule set exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}
