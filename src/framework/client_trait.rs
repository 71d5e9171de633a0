//! # ActorClient Trait
//!
//! Common interface for record-specific clients, adding default `get` and `list`
//! methods on top of a generic [`ResourceClient`].

use crate::framework::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for record-specific clients to inherit the standard read operations.
///
/// Implementors only provide access to the inner client and a mapping from
/// [`FrameworkError`] to their own error type.
///
/// ```rust,ignore
/// #[async_trait]
/// impl ActorClient<Store> for StoreClient {
///     type Error = StoreError;
///
///     fn inner(&self) -> &ResourceClient<Store> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> StoreError {
///         StoreError::ActorCommunicationError(e.to_string())
///     }
/// }
///
/// // get() and list() are provided automatically
/// let store = client.get(StoreId(1)).await?;
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The record-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the record-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every record of this type.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }
}
