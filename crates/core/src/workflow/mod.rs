//! Expense claim approval workflow.
//!
//! This module implements the rule model, the claim state machine and the
//! approval evaluation engine.
//!
//! # Modules
//!
//! - `actor` - Actors, roles and the directory the engine resolves them through
//! - `rule` - Versioned rule sets and conditional auto-approval specs
//! - `claim` - Claim state and submission data
//! - `types` - Status, decisions and audit records
//! - `service` - Claim intake
//! - `approval` - Decision evaluation
//! - `query` - Pending and history listings
//! - `error` - Workflow-specific error types

pub mod actor;
pub mod approval;
pub mod claim;
pub mod error;
pub mod query;
pub mod rule;
pub mod service;
pub mod types;

#[cfg(test)]
mod approval_props;
#[cfg(test)]
mod testing;

pub use actor::{Actor, ActorDirectory, Role};
pub use approval::{ApprovalEngine, RequiredApprover};
pub use claim::{COMPLETED_LABEL, Claim, ClaimSubmission};
pub use error::{RuleValidationError, WorkflowError};
pub use query::ClaimQueries;
pub use rule::{Combinator, ConditionalSpec, RoleSpecifier, RuleSet, RuleSetDefinition, RuleStep};
pub use service::WorkflowService;
pub use types::{AutoApprovalTrigger, ClaimStatus, Decision, DecisionEntry, Resolution};
