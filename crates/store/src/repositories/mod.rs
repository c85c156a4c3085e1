//! In-memory repositories.
//!
//! Each repository owns one kind of record and enforces its own write rules.
//! The [`ExpenseStore`](crate::ExpenseStore) composes them.

pub mod actor;
pub mod claim;
pub mod exchange_rate;
pub mod rule_set;

pub use actor::{ActorRepository, NewActor};
pub use claim::ClaimRepository;
pub use exchange_rate::ExchangeRateRepository;
pub use rule_set::RuleSetRepository;
