//! Request middleware.

pub mod auth;

pub use auth::{ACTOR_HEADER, AuthActor, auth_middleware};
