//! Claim repository with per-claim write serialization.
//!
//! Every claim sits behind its own mutex. A decision holds that mutex for the
//! whole read-evaluate-write cycle, so two decisions on one claim are applied
//! one after the other while decisions on different claims never contend.

use dashmap::DashMap;
use spendflow_core::workflow::{Claim, WorkflowError};
use spendflow_shared::types::ClaimId;
use std::sync::{Arc, Mutex, PoisonError};

/// Claim repository.
#[derive(Debug, Default)]
pub struct ClaimRepository {
    claims: DashMap<ClaimId, Arc<Mutex<Claim>>>,
}

impl ClaimRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a newly submitted claim.
    pub fn insert(&self, claim: Claim) {
        self.claims.insert(claim.id, Arc::new(Mutex::new(claim)));
    }

    /// Returns a copy of the claim's current state.
    #[must_use]
    pub fn find_by_id(&self, id: ClaimId) -> Option<Claim> {
        let slot = self.slot(id)?;
        let claim = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(claim.clone())
    }

    /// Returns a copy of every claim.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Claim> {
        let slots: Vec<Arc<Mutex<Claim>>> =
            self.claims.iter().map(|e| Arc::clone(e.value())).collect();
        slots
            .iter()
            .map(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect()
    }

    /// Applies `transition` to the claim under its lock.
    ///
    /// `transition` receives the current state and returns the complete next
    /// state. The stored claim is replaced only if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ClaimNotFound` for an unknown id, or whatever `transition`
    /// returns.
    pub fn update<F>(&self, id: ClaimId, transition: F) -> Result<Claim, WorkflowError>
    where
        F: FnOnce(&Claim) -> Result<Claim, WorkflowError>,
    {
        let slot = self.slot(id).ok_or(WorkflowError::ClaimNotFound(id))?;
        // The stored claim is only ever replaced wholesale, so a panic in
        // another holder cannot have left it half-written.
        let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let next = transition(&current)?;
        *current = next.clone();
        Ok(next)
    }

    /// Number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns true if no claim exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    fn slot(&self, id: ClaimId) -> Option<Arc<Mutex<Claim>>> {
        self.claims.get(&id).map(|entry| Arc::clone(entry.value()))
    }
}
