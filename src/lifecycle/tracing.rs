//! Structured logging setup.
//!
//! Record actors log with an `entity_type` field (`Store`, `MerchantProvisioning`, ...)
//! and the orchestrator's spans carry `store_id`, so module targets are left out.
//!
//! ```bash
//! RUST_LOG=info cargo run      # state changes and checkpoints
//! RUST_LOG=debug cargo run     # full request payloads
//! ```

/// Installs the global subscriber. Call once, at process start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
