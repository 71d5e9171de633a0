//! # Platform Lifecycle
//!
//! Starting, wiring and shutting down the record actors and the services on top of
//! them.
//!
//! ## Wiring
//!
//! Actors are created first, without dependencies, then started with their context
//! injected into `run(context)`:
//!
//! ```rust,ignore
//! let (plan_actor, plans) = catalog_actor::new_plans(buffer);
//! let (store_actor, stores) = store_actor::new(buffer);
//!
//! tokio::spawn(plan_actor.run(()));
//! tokio::spawn(store_actor.run(plans.clone())); // Store::Context = PlanClient
//! ```
//!
//! The dependency graph is acyclic (stores read plans, the website adapter reads
//! themes), so dropping every client shuts the actors down in any order.
//!
//! ## Graceful Shutdown
//!
//! 1. Cancel the shared token; an in-flight provisioning run stops at the next step
//!    boundary and is recorded as FAILED (retryable).
//! 2. Drop all clients, closing the actor channels.
//! 3. Await every actor task.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the `tracing` subscriber for the whole process.

pub mod platform;
pub mod tracing;

pub use platform::*;
pub use self::tracing::*;
