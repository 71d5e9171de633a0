//! # Mock Framework
//!
//! Utilities for testing record clients and services without spawning real actors.
//!
//! - [`MockClient`] answers requests from a queue of expectations and counts what it
//!   received, so tests can assert that a step issued (or did not issue) a request.
//! - [`create_mock_client`] plus [`expect_get`], [`expect_upsert`] and
//!   [`expect_action`] hand the raw request to the test for inspection.

use crate::framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    List(Result<Vec<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Upsert(Result<T, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are matched against expectations in FIFO order. A request that arrives
/// with no matching expectation is answered with `FrameworkError::NotFound` and
/// recorded as a mismatch, which fails [`MockClient::verify`].
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Store>::new();
/// mock.expect_get().return_ok(Some(store));
/// let client = StoreClient::new(mock.client());
/// // ... exercise code under test ...
/// mock.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    received: Arc<AtomicUsize>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(AtomicUsize::new(0));
        let mismatches = Arc::new(Mutex::new(Vec::new()));

        let queue = expectations.clone();
        let counter = received.clone();
        let errors = mismatches.clone();
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let next = queue.lock().ok().and_then(|mut q| q.pop_front());
                if let Some(unexpected) = answer(request, next) {
                    if let Ok(mut errors) = errors.lock() {
                        errors.push(unexpected);
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            received,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Number of requests the mock has received so far.
    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    pub fn expect_get(&mut self) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Get)
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::List)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Create)
    }

    pub fn expect_update(&mut self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Update)
    }

    pub fn expect_upsert(&mut self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Upsert)
    }

    pub fn expect_action(&mut self) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Action)
    }

    /// Panics unless every expectation was consumed by a matching request.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().map(|m| m.clone()).unwrap_or_default();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", mismatches);
        }
        let remaining = self.expectations.lock().map(|q| q.len()).unwrap_or_default();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Replies to `request` from `expectation`; returns a description on mismatch.
fn answer<T: ActorEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
) -> Option<String> {
    fn reply<R>(respond_to: Response<R>, response: Result<R, FrameworkError>) -> Option<String> {
        let _ = respond_to.send(response);
        None
    }
    fn reject<R>(respond_to: Response<R>, kind: &str) -> Option<String> {
        let _ = respond_to.send(Err(FrameworkError::NotFound(format!("unexpected {kind}"))));
        Some(kind.to_string())
    }

    match (request, expectation) {
        (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get(r))) => reply(respond_to, r),
        (ResourceRequest::List { respond_to }, Some(Expectation::List(r))) => reply(respond_to, r),
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => reply(respond_to, r),
        (ResourceRequest::Update { respond_to, .. }, Some(Expectation::Update(r))) => reply(respond_to, r),
        (ResourceRequest::Upsert { respond_to, .. }, Some(Expectation::Upsert(r))) => reply(respond_to, r),
        (ResourceRequest::Action { respond_to, .. }, Some(Expectation::Action(r))) => reply(respond_to, r),
        (ResourceRequest::Get { respond_to, .. }, _) => reject(respond_to, "get"),
        (ResourceRequest::List { respond_to }, _) => reject(respond_to, "list"),
        (ResourceRequest::Create { respond_to, .. }, _) => reject(respond_to, "create"),
        (ResourceRequest::Update { respond_to, .. }, _) => reject(respond_to, "update"),
        (ResourceRequest::Upsert { respond_to, .. }, _) => reject(respond_to, "upsert"),
        (ResourceRequest::Action { respond_to, .. }, _) => reject(respond_to, "action"),
    }
}

/// Builder that queues one expectation returning `R`.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(expectations: Queue<T>, wrap: fn(Result<R, FrameworkError>) -> Expectation<T>) -> Self {
        Self { expectations, wrap }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        if let Ok(mut queue) = self.expectations.lock() {
            queue.push_back((self.wrap)(response));
        }
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client whose requests arrive on the returned receiver.
///
/// Useful when a test needs to inspect the payload a client sent (for example the
/// exact update a service applied) before replying.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Upsert request
pub async fn expect_upsert<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Create, T::Update, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Upsert {
            id,
            create,
            update,
            respond_to,
        }) => Some((id, create, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Theme, ThemeCreate, ThemeId};

    fn theme(id: &str) -> Theme {
        Theme {
            id: ThemeId::new(id),
            slug: format!("{id}-slug"),
            name: "Minimal".to_string(),
            default_customization: serde_json::json!({ "palette": "light" }),
        }
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Theme>::new();
        mock.expect_get().return_ok(Some(theme("t1")));
        mock.expect_list().return_ok(vec![theme("t1"), theme("t2")]);

        let client = mock.client();
        let fetched = client.get(ThemeId::new("t1")).await.unwrap();
        assert_eq!(fetched.unwrap().slug, "t1-slug");
        assert_eq!(client.list().await.unwrap().len(), 2);

        assert_eq!(mock.received(), 2);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected requests")]
    async fn test_unexpected_request_fails_verify() {
        let mock = MockClient::<Theme>::new();
        let result = mock.client().get(ThemeId::new("t1")).await;
        assert!(result.is_err());
        mock.verify();
    }

    #[tokio::test]
    async fn test_raw_upsert_inspection() {
        let (client, mut receiver) = create_mock_client::<Theme>(10);

        let task = tokio::spawn(async move {
            let create = ThemeCreate {
                slug: "minimal".into(),
                name: "Minimal".into(),
                default_customization: serde_json::Value::Null,
            };
            client.upsert(ThemeId::new("t1"), create.clone(), create).await
        });

        let (id, create, _update, responder) = expect_upsert(&mut receiver)
            .await
            .expect("Expected Upsert request");
        assert_eq!(id, ThemeId::new("t1"));
        assert_eq!(create.slug, "minimal");
        responder.send(Ok(theme("t1"))).unwrap();

        let stored = task.await.unwrap().unwrap();
        assert_eq!(stored.id, ThemeId::new("t1"));
    }
}
