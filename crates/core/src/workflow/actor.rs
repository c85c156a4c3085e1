//! Actors and their roles.
//!
//! Actors are owned by user administration. Claims only reference them by id,
//! and the engine looks them up through an [`ActorDirectory`].

use serde::{Deserialize, Serialize};
use spendflow_shared::types::ActorId;
use std::collections::HashMap;
use std::fmt;

/// Organizational role of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Submits claims.
    Employee,
    /// Line manager.
    Manager,
    /// Finance department.
    Finance,
    /// Director.
    Director,
    /// Human resources.
    Hr,
    /// President.
    President,
    /// Chief financial officer.
    Cfo,
    /// Chief executive officer.
    Ceo,
    /// Administrator with override authority at every step.
    Admin,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 9] = [
        Self::Employee,
        Self::Manager,
        Self::Finance,
        Self::Director,
        Self::Hr,
        Self::President,
        Self::Cfo,
        Self::Ceo,
        Self::Admin,
    ];

    /// Parse a role from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "manager" => Some(Self::Manager),
            "finance" => Some(Self::Finance),
            "director" => Some(Self::Director),
            "hr" => Some(Self::Hr),
            "president" => Some(Self::President),
            "cfo" => Some(Self::Cfo),
            "ceo" => Some(Self::Ceo),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the display name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Manager => "Manager",
            Self::Finance => "Finance",
            Self::Director => "Director",
            Self::Hr => "HR",
            Self::President => "President",
            Self::Cfo => "CFO",
            Self::Ceo => "CEO",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("Unknown role: {value}"))
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// An identity that submits or decides on claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Organizational role.
    pub role: Role,
    /// Direct manager, used to resolve "employee's manager" steps.
    pub manager_id: Option<ActorId>,
}

impl Actor {
    /// Returns true if the actor holds override authority.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Read access to registered actors.
///
/// The engine only needs point lookups; whoever owns the actors decides how
/// they are stored.
pub trait ActorDirectory {
    /// Returns the actor with the given id, if registered.
    fn find_actor(&self, id: ActorId) -> Option<Actor>;
}

impl ActorDirectory for HashMap<ActorId, Actor> {
    fn find_actor(&self, id: ActorId) -> Option<Actor> {
        self.get(&id).cloned()
    }
}
