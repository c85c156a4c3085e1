//! Actor repository for user administration.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Deserialize;
use spendflow_core::workflow::{Actor, ActorDirectory, Role, WorkflowError};
use spendflow_shared::types::ActorId;

/// Input for registering an actor.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActor {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Organizational role.
    pub role: Role,
    /// Direct manager. Must already be registered.
    #[serde(default)]
    pub manager_id: Option<ActorId>,
}

/// Actor repository.
#[derive(Debug, Default)]
pub struct ActorRepository {
    actors: DashMap<ActorId, Actor>,
}

impl ActorRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidActor` if the name or email is blank or the manager
    /// is not registered.
    pub fn register(&self, input: NewActor) -> Result<Actor, WorkflowError> {
        self.register_with_id(ActorId::new(), input)
    }

    /// Registers an actor under a caller-chosen id (used by seeding).
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register), plus `InvalidActor` if the id
    /// is taken.
    pub fn register_with_id(&self, id: ActorId, input: NewActor) -> Result<Actor, WorkflowError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(WorkflowError::InvalidActor("name is required".to_string()));
        }
        let email = input.email.trim();
        if email.is_empty() {
            return Err(WorkflowError::InvalidActor("email is required".to_string()));
        }
        if let Some(manager_id) = input.manager_id {
            if manager_id == id {
                return Err(WorkflowError::InvalidActor(
                    "an actor cannot be their own manager".to_string(),
                ));
            }
            if !self.actors.contains_key(&manager_id) {
                return Err(WorkflowError::InvalidActor(format!(
                    "manager {manager_id} is not registered"
                )));
            }
        }

        let actor = Actor {
            id,
            name: name.to_string(),
            email: email.to_lowercase(),
            role: input.role,
            manager_id: input.manager_id,
        };

        match self.actors.entry(id) {
            Entry::Occupied(_) => Err(WorkflowError::InvalidActor(format!(
                "actor {id} already exists"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(actor.clone());
                Ok(actor)
            }
        }
    }

    /// Finds an actor by id.
    #[must_use]
    pub fn find_by_id(&self, id: ActorId) -> Option<Actor> {
        self.actors.get(&id).map(|entry| entry.value().clone())
    }

    /// Lists all actors ordered by name.
    #[must_use]
    pub fn list(&self) -> Vec<Actor> {
        let mut actors: Vec<Actor> = self.actors.iter().map(|e| e.value().clone()).collect();
        actors.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        actors
    }

    /// Number of registered actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Returns true if no actor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl ActorDirectory for ActorRepository {
    fn find_actor(&self, id: ActorId) -> Option<Actor> {
        self.find_by_id(id)
    }
}
