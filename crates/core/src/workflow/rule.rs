//! Approval rule model.
//!
//! A rule set is an ordered sequence of required-approver steps plus one
//! conditional auto-approval spec. Rule sets are immutable values: an edit
//! produces a new version, and claims keep the version they were bound to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendflow_shared::types::RuleSetId;
use std::fmt;

use crate::workflow::actor::Role;
use crate::workflow::error::{RuleValidationError, WorkflowError};

/// Who must approve a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum RoleSpecifier {
    /// Any actor holding this role.
    Fixed(Role),
    /// The submitting employee's direct manager, resolved per claim.
    SubmitterManager,
}

impl RoleSpecifier {
    /// Parses a step specifier.
    ///
    /// `"manager"`, `"submitter_manager"` and `"employee's manager"` select
    /// the submitter's direct manager; anything else must name a role.
    /// A `"role:"` prefix always names a role, so `"role:manager"` is any
    /// holder of the Manager role.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if let Some(role) = s.strip_prefix("role:") {
            return Role::parse(role).map(Self::Fixed);
        }
        match s.as_str() {
            "manager" | "submitter_manager" | "employee's manager" => Some(Self::SubmitterManager),
            other => Role::parse(other).map(Self::Fixed),
        }
    }

    /// Returns the label shown for a pending step.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fixed(role) => role.as_str(),
            Self::SubmitterManager => "Employee's Manager",
        }
    }
}

impl fmt::Display for RoleSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One position in the sequential approval chain.
///
/// The step's ordinal is its index in [`RuleSet::steps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStep {
    /// Required approver for this step.
    pub approver: RoleSpecifier,
}

impl RuleStep {
    /// A step approved by any holder of `role`.
    #[must_use]
    pub const fn fixed(role: Role) -> Self {
        Self {
            approver: RoleSpecifier::Fixed(role),
        }
    }

    /// A step approved by the submitter's direct manager.
    #[must_use]
    pub const fn submitter_manager() -> Self {
        Self {
            approver: RoleSpecifier::SubmitterManager,
        }
    }
}

/// How the percentage and specific-approver conditions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    /// Conditional rules are inactive.
    #[default]
    None,
    /// Either condition auto-approves.
    Or,
    /// Both conditions must hold.
    And,
}

impl Combinator {
    /// Parses a combinator, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "or" => Some(Self::Or),
            "and" => Some(Self::And),
            _ => None,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Or => "OR",
            Self::And => "AND",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auto-approval shortcut rules layered over the step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionalSpec {
    /// Percentage (1..=100) of steps whose approval auto-approves the claim.
    pub percentage_threshold: Option<u8>,
    /// Role whose single approval auto-approves the claim.
    pub specific_approver: Option<Role>,
    /// Combination logic. `None` disables both conditions.
    pub combinator: Combinator,
}

impl ConditionalSpec {
    /// A spec with no effect on evaluation.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            percentage_threshold: None,
            specific_approver: None,
            combinator: Combinator::None,
        }
    }

    /// Percentage OR specific approver.
    #[must_use]
    pub const fn any_of(percentage_threshold: u8, specific_approver: Role) -> Self {
        Self {
            percentage_threshold: Some(percentage_threshold),
            specific_approver: Some(specific_approver),
            combinator: Combinator::Or,
        }
    }

    /// Percentage AND specific approver.
    #[must_use]
    pub const fn all_of(percentage_threshold: u8, specific_approver: Role) -> Self {
        Self {
            percentage_threshold: Some(percentage_threshold),
            specific_approver: Some(specific_approver),
            combinator: Combinator::And,
        }
    }

    /// Returns true if the spec participates in evaluation.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.combinator != Combinator::None
    }

    /// Checks combinator/field consistency.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if let Some(threshold) = self.percentage_threshold
            && !(1..=100).contains(&threshold)
        {
            return Err(RuleValidationError::ThresholdOutOfRange(threshold));
        }

        if self.is_active() {
            if self.percentage_threshold.is_none() {
                return Err(RuleValidationError::MissingThreshold(self.combinator));
            }
            if self.specific_approver.is_none() {
                return Err(RuleValidationError::MissingSpecificApprover(
                    self.combinator,
                ));
            }
        }

        Ok(())
    }
}

/// A named, versioned approval flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Stable rule set id shared by every version.
    pub id: RuleSetId,
    /// Display name.
    pub name: String,
    /// Version, starting at 1 and incremented on each accepted edit.
    pub version: u32,
    /// Ordered approval steps.
    pub steps: Vec<RuleStep>,
    /// Conditional auto-approval rules.
    pub conditional: ConditionalSpec,
    /// When this version was created.
    pub updated_at: DateTime<Utc>,
}

impl RuleSet {
    /// Creates version 1 of a rule set, rejecting invalid definitions.
    pub fn new(
        id: RuleSetId,
        name: impl Into<String>,
        steps: Vec<RuleStep>,
        conditional: ConditionalSpec,
    ) -> Result<Self, RuleValidationError> {
        let rule_set = Self {
            id,
            name: name.into().trim().to_string(),
            version: 1,
            steps,
            conditional,
            updated_at: Utc::now(),
        };
        rule_set.validate()?;
        Ok(rule_set)
    }

    /// Produces the next version with new contents. `self` is left untouched.
    pub fn revise(
        &self,
        name: impl Into<String>,
        steps: Vec<RuleStep>,
        conditional: ConditionalSpec,
    ) -> Result<Self, RuleValidationError> {
        let mut next = Self::new(self.id, name, steps, conditional)?;
        next.version = self.version + 1;
        Ok(next)
    }

    /// Enforces the rule set invariants.
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.name.trim().is_empty() {
            return Err(RuleValidationError::EmptyName);
        }
        if self.steps.is_empty() {
            return Err(RuleValidationError::NoSteps);
        }
        self.conditional.validate()
    }

    /// Returns the step at `index`, if any.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&RuleStep> {
        self.steps.get(index)
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if `index` is the final step.
    #[must_use]
    pub fn is_last_step(&self, index: usize) -> bool {
        index + 1 >= self.steps.len()
    }
}

/// Rule set contents as authored by an administrator, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetDefinition {
    /// Display name.
    pub name: String,
    /// Ordered approval steps.
    pub steps: Vec<RuleStep>,
    /// Conditional auto-approval rules.
    #[serde(default)]
    pub conditional: ConditionalSpec,
}

impl RuleSetDefinition {
    /// Builds a definition from textual step and combinator names.
    ///
    /// Steps go through [`RoleSpecifier::parse`], so `"manager"` selects the
    /// submitter's manager. Structural validation happens later, when the
    /// definition is turned into a [`RuleSet`].
    pub fn parse<S: AsRef<str>>(
        name: impl Into<String>,
        steps: &[S],
        combinator: &str,
        percentage_threshold: Option<u8>,
        specific_approver: Option<&str>,
    ) -> Result<Self, WorkflowError> {
        let steps = steps
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                RoleSpecifier::parse(raw)
                    .map(|approver| RuleStep { approver })
                    .ok_or_else(|| WorkflowError::UnknownRole(raw.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let combinator = Combinator::parse(combinator)
            .ok_or_else(|| WorkflowError::UnknownCombinator(combinator.to_string()))?;

        let specific_approver = specific_approver
            .map(|raw| Role::parse(raw).ok_or_else(|| WorkflowError::UnknownRole(raw.to_string())))
            .transpose()?;

        Ok(Self {
            name: name.into(),
            steps,
            conditional: ConditionalSpec {
                percentage_threshold,
                specific_approver,
                combinator,
            },
        })
    }
}
