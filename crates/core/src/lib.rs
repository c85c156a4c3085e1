//! Core business logic for Spendflow.
//!
//! This crate contains pure business logic with ZERO web or storage dependencies.
//! All domain types, validation rules and approval evaluation live here.
//!
//! # Modules
//!
//! - `currency` - Normalization of claim amounts into the base currency
//! - `workflow` - Rule sets, claims and the approval engine

pub mod currency;
pub mod workflow;
