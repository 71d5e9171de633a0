//! # Core Record Actor Framework
//!
//! Generic building blocks for the tenant record store. Every persisted entity type
//! (stores, provisioning rows, deployment metadata, onboarding rows, ...) is owned by
//! one [`ResourceActor`] that processes requests sequentially.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait every record type implements.
//! - [`ResourceActor`]: The generic actor that owns the records of one type.
//! - [`ResourceClient`]: The cloneable handle used to talk to an actor.
//! - [`FrameworkError`]: Plumbing errors (closed channels, missing records, conflicts).
//!
//! ## Atomicity
//!
//! Because an actor handles one message at a time, a request that reads and then writes
//! a record (an upsert, or a conditional action such as "claim this run only if it is
//! PENDING") is atomic with respect to every other request for that entity type.
//! Mutations are staged on a copy of the record and committed only when the hook
//! succeeds and no unique key collides, so a failed request never leaves a half-applied
//! record behind.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any record type must implement to be managed by [`ResourceActor`].
///
/// # Async & Context
/// Hooks are async so they can call other actors through the injected `Context`.
/// The context is passed to `run()` rather than `new()` so actors can be wired after
/// they are all constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this record. One-to-one records reuse the owning
    /// store's id.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Payload used when the record does not exist yet.
    type Create: Send + Sync + Debug;

    /// Payload used to modify an existing record.
    type Update: Send + Sync + Debug;

    /// Record-specific operations (conditional transitions, counters, ...).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// Per-record error type, boxed into [`FrameworkError::EntityError`] on the wire.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full record from its id and creation payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// A value that must be unique across all records of this type, if any.
    ///
    /// The actor rejects any create, update, upsert or action whose result would share
    /// this key with a different record.
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the record is built and before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update payload to the record.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Handle a record-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the record framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unique key already taken: {0}")]
    Conflict(String),
    #[error("Actor has no id generator; records must be keyed explicitly")]
    MissingIdGenerator,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recover the typed record error carried by [`FrameworkError::EntityError`].
    pub fn entity_error<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take ownership of the typed record error, or hand back the plumbing error.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => inner
                .downcast::<E>()
                .map(|e| *e)
                .map_err(FrameworkError::EntityError),
            other => Err(other),
        }
    }
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message sent to a [`ResourceActor`].
///
/// Records are created, read and updated, never removed. `List` scans every record,
/// `Upsert` creates or updates by key and `Action` runs record-specific logic.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Upsert {
        id: T::Id,
        create: T::Create,
        update: T::Update,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

type IdGenerator<Id> = Box<dyn Fn() -> Id + Send + Sync>;

/// The generic actor that owns every record of one type.
///
/// The actor owns its `store` exclusively inside its task, so no `Mutex` is needed and
/// every request observes the effects of all requests processed before it.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Option<IdGenerator<T::Id>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates an actor for records that are always addressed by an explicit id
    /// (upserts keyed by store id). `Create` requests are rejected.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates an actor that assigns ids to `Create` requests with `next_id_fn`.
    pub fn with_id_generator(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (mut actor, client) = Self::new(buffer_size);
        actor.next_id_fn = Some(Box::new(next_id_fn));
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(&id, update, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Upsert {
                    id,
                    create,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?create, ?update, "Upsert");
                    let existed = self.store.contains_key(&id);
                    let result = self.upsert(&id, create, update, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, existed, size = self.store.len(), "Upserted"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Upsert failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self.action(&id, action, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let next_id = self
            .next_id_fn
            .as_ref()
            .ok_or(FrameworkError::MissingIdGenerator)?;
        let id = next_id();
        let mut item = T::from_create_params(id.clone(), params).map_err(entity_error)?;
        item.on_create(context).await.map_err(entity_error)?;
        self.commit(id.clone(), item)?;
        Ok(id)
    }

    async fn update(
        &mut self,
        id: &T::Id,
        update: T::Update,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let mut staged = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        staged.on_update(update, context).await.map_err(entity_error)?;
        self.commit(id.clone(), staged.clone())?;
        Ok(staged)
    }

    async fn upsert(
        &mut self,
        id: &T::Id,
        create: T::Create,
        update: T::Update,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let staged = match self.store.get(id).cloned() {
            Some(mut existing) => {
                existing
                    .on_update(update, context)
                    .await
                    .map_err(entity_error)?;
                existing
            }
            None => {
                let mut item = T::from_create_params(id.clone(), create).map_err(entity_error)?;
                item.on_create(context).await.map_err(entity_error)?;
                item
            }
        };
        self.commit(id.clone(), staged.clone())?;
        Ok(staged)
    }

    async fn action(
        &mut self,
        id: &T::Id,
        action: T::Action,
        context: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let mut staged = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let result = staged
            .handle_action(action, context)
            .await
            .map_err(entity_error)?;
        self.commit(id.clone(), staged)?;
        Ok(result)
    }

    /// Stores `item` under `id` unless its unique key belongs to another record.
    fn commit(&mut self, id: T::Id, item: T) -> Result<(), FrameworkError> {
        if let Some(key) = item.unique_key() {
            let taken = self
                .store
                .iter()
                .any(|(other_id, other)| *other_id != id && other.unique_key().as_ref() == Some(&key));
            if taken {
                return Err(FrameworkError::Conflict(key));
            }
        }
        self.store.insert(id, item);
        Ok(())
    }
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a [`ResourceActor`].
///
/// Holds only the channel sender, so cloning is cheap.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    /// Create the record under `id` from `create`, or apply `update` if it exists.
    pub async fn upsert(
        &self,
        id: T::Id,
        create: T::Create,
        update: T::Update,
    ) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Upsert {
            id,
            create,
            update,
            respond_to,
        })
        .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Tenant {
        id: String,
        slug: String,
        activations: u32,
    }

    #[derive(Debug)]
    struct TenantCreate {
        slug: String,
    }

    #[derive(Debug)]
    struct TenantUpdate {
        slug: Option<String>,
    }

    #[derive(Debug)]
    enum TenantAction {
        Activate,
    }

    #[derive(Debug, thiserror::Error)]
    enum TenantError {
        #[error("already active")]
        AlreadyActive,
    }

    #[async_trait]
    impl ActorEntity for Tenant {
        type Id = String;
        type Create = TenantCreate;
        type Update = TenantUpdate;
        type Action = TenantAction;
        type ActionResult = u32;
        type Context = ();
        type Error = TenantError;

        fn from_create_params(id: String, params: TenantCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                slug: params.slug,
                activations: 0,
            })
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.slug.clone())
        }

        async fn on_update(&mut self, update: TenantUpdate, _ctx: &()) -> Result<(), Self::Error> {
            if let Some(slug) = update.slug {
                self.slug = slug;
            }
            Ok(())
        }

        async fn handle_action(&mut self, action: TenantAction, _ctx: &()) -> Result<u32, Self::Error> {
            match action {
                TenantAction::Activate => {
                    self.activations += 1;
                    if self.activations > 1 {
                        return Err(TenantError::AlreadyActive);
                    }
                    Ok(self.activations)
                }
            }
        }
    }

    fn spawn_tenants() -> ResourceClient<Tenant> {
        let counter = Arc::new(AtomicU64::new(1));
        let (actor, client) = ResourceActor::<Tenant>::with_id_generator(10, move || {
            format!("tenant_{}", counter.fetch_add(1, Ordering::SeqCst))
        });
        tokio::spawn(actor.run(()));
        client
    }

    #[tokio::test]
    async fn test_create_get_update() {
        let client = spawn_tenants();

        let id = client
            .create(TenantCreate { slug: "acme".into() })
            .await
            .unwrap();
        assert_eq!(id, "tenant_1");

        let updated = client
            .update(id.clone(), TenantUpdate { slug: Some("acme-shop".into()) })
            .await
            .unwrap();
        assert_eq!(updated.slug, "acme-shop");

        let fetched = client.get(id).await.unwrap().expect("Tenant should exist");
        assert_eq!(fetched, updated);
        assert!(client.get("tenant_9".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_once_then_updates() {
        let (actor, client) = ResourceActor::<Tenant>::new(10);
        tokio::spawn(actor.run(()));

        let first = client
            .upsert(
                "store_1".into(),
                TenantCreate { slug: "acme".into() },
                TenantUpdate { slug: None },
            )
            .await
            .unwrap();
        assert_eq!(first.slug, "acme");

        let second = client
            .upsert(
                "store_1".into(),
                TenantCreate { slug: "ignored".into() },
                TenantUpdate { slug: Some("acme-2".into()) },
            )
            .await
            .unwrap();
        assert_eq!(second.slug, "acme-2");
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_without_generator_is_rejected() {
        let (actor, client) = ResourceActor::<Tenant>::new(10);
        tokio::spawn(actor.run(()));

        let result = client.create(TenantCreate { slug: "acme".into() }).await;
        assert!(matches!(result, Err(FrameworkError::MissingIdGenerator)));
    }

    #[tokio::test]
    async fn test_unique_key_conflict_leaves_record_untouched() {
        let client = spawn_tenants();
        let first = client.create(TenantCreate { slug: "acme".into() }).await.unwrap();
        let second = client.create(TenantCreate { slug: "globex".into() }).await.unwrap();

        let dup = client.create(TenantCreate { slug: "acme".into() }).await;
        assert!(matches!(dup, Err(FrameworkError::Conflict(ref key)) if key == "acme"));

        let clash = client
            .update(second.clone(), TenantUpdate { slug: Some("acme".into()) })
            .await;
        assert!(matches!(clash, Err(FrameworkError::Conflict(_))));
        assert_eq!(client.get(second).await.unwrap().unwrap().slug, "globex");

        // Re-saving a record with its own key is not a conflict.
        let same = client
            .update(first, TenantUpdate { slug: Some("acme".into()) })
            .await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn test_failed_action_is_not_committed() {
        let client = spawn_tenants();
        let id = client.create(TenantCreate { slug: "acme".into() }).await.unwrap();

        assert_eq!(client.perform_action(id.clone(), TenantAction::Activate).await.unwrap(), 1);

        let err = client
            .perform_action(id.clone(), TenantAction::Activate)
            .await
            .unwrap_err();
        assert!(matches!(err.entity_error::<TenantError>(), Some(TenantError::AlreadyActive)));

        let tenant = client.get(id).await.unwrap().unwrap();
        assert_eq!(tenant.activations, 1);
    }

    #[tokio::test]
    async fn test_missing_record_reports_not_found() {
        let client = spawn_tenants();
        let result = client
            .perform_action("tenant_404".into(), TenantAction::Activate)
            .await;
        assert!(matches!(result, Err(FrameworkError::NotFound(id)) if id == "tenant_404"));
    }
}
