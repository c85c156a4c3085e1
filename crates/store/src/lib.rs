//! In-memory storage for Spendflow.
//!
//! This crate provides:
//! - Repositories for actors, rule sets, claims and exchange rates
//! - The [`ExpenseStore`] facade that applies workflow operations under
//!   per-claim serialization
//! - Seeding from [`AppConfig`](spendflow_shared::AppConfig)

pub mod repositories;
pub mod seed;
pub mod store;

pub use repositories::NewActor;
pub use seed::SeedError;
pub use store::ExpenseStore;
