//! Generic record actor framework.
//!
//! - [`ActorEntity`] - Trait that record types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns the records of one type
//! - [`ResourceClient`] - Typed handle for sending requests to an actor
//! - [`FrameworkError`] - Plumbing errors shared by every actor
//! - [`ActorClient`] - Default read operations for typed client wrappers
//!
//! See [`mock`] for test doubles that answer requests without a real actor.

pub mod client_trait;
pub mod core;
pub mod mock;

pub use self::client_trait::*;
pub use self::core::*;
