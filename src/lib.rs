//! # Storefront Provisioning
//!
//! Turns a merchant's signup into a live store: an onboarding wizard collects the
//! brand, business and storefront details, then the provisioning orchestrator runs
//! an eight-step pipeline that creates the workspace, dashboard and website, seeds
//! the store's records and emails the merchant their links.
//!
//! ## Architecture
//!
//! Every record type lives in its own resource actor: a [`ResourceActor<T>`](framework::ResourceActor)
//! owning a map of `T` and processing one request at a time. Mutual exclusion and
//! idempotency follow from that:
//!
//! - A provisioning run claims its row with a conditional action (PENDING -> IN_PROGRESS)
//!   evaluated inside the actor, so two concurrent activations cannot both start.
//! - One-to-one records (deployment, settings, customization, onboarding) are keyed by
//!   [`StoreId`](model::StoreId) and written with upserts, so retries never duplicate them.
//! - An update is applied to a staged copy and committed only if it succeeded.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic actor, its client, and [`MockClient`](framework::mock::MockClient) for tests.
//!
//! ### 2. The Records ([`model`], [`store_actor`], [`provisioning_actor`], [`deployment_actor`],
//! [`settings_actor`], [`onboarding_actor`], [`catalog_actor`])
//! Record types and their [`ActorEntity`](framework::ActorEntity) implementations.
//!
//! ### 3. The Interface ([`clients`])
//! Typed clients per record type, bundled as [`TenantRecords`](clients::TenantRecords).
//!
//! ### 4. The Workflows ([`provisioning`], [`onboarding`], [`notification`])
//! The pipeline orchestrator, its deployment adapters, and the onboarding state machine.
//!
//! ### 5. The Surface ([`api`], [`lifecycle`], [`config`])
//! Endpoint operations with their error mapping, process wiring and shutdown, and
//! environment configuration.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod api;
pub mod catalog_actor;
pub mod clients;
pub mod config;
pub mod deployment_actor;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notification;
pub mod onboarding;
pub mod onboarding_actor;
pub mod provisioning;
pub mod provisioning_actor;
pub mod settings_actor;
pub mod store_actor;
