//! The entity store: remote calls composed with reducer updates.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{ApiError, Page, PageRequest, ResourceApi};
use crate::config::StoreConfig;
use crate::entity::{Entity, EntityId};
use crate::mvi::Reducer;

use super::intent::EntityIntent;
use super::reducer::EntityReducer;
use super::state::EntityState;

/// State container for one entity type.
///
/// Each operation applies its pending intent before returning, so the
/// `loading`/`updating` flags are visible to the caller before any network
/// I/O happens. The request itself runs on a spawned task: dropping the
/// returned future does not cancel it, and its completion intent is still
/// applied. Failures are recorded in [`EntityState::error_message`] and also
/// returned to the caller.
///
/// Operations must be called from within a Tokio runtime.
///
/// Stores are owned by the composition root and shared by reference; views
/// observe changes through [`subscribe`](Self::subscribe).
pub struct EntityStore<E: Entity, A> {
    shared: Arc<Shared<E, A>>,
}

/// Everything a spawned request needs after the caller has moved on.
struct Shared<E: Entity, A> {
    api: A,
    config: StoreConfig,
    state: watch::Sender<EntityState<E>>,
    /// Latest issued List ticket (refreshes included).
    list_ticket: AtomicU64,
    /// Latest issued Get ticket.
    get_ticket: AtomicU64,
}

impl<E: Entity, A: ResourceApi<E> + 'static> EntityStore<E, A> {
    pub fn new(api: A, config: StoreConfig) -> Self {
        let (state, _) = watch::channel(EntityState::default());
        Self {
            shared: Arc::new(Shared {
                api,
                config,
                state,
                list_ticket: AtomicU64::new(0),
                get_ticket: AtomicU64::new(0),
            }),
        }
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<EntityState<E>> {
        self.shared.state.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> EntityState<E> {
        self.shared.state.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.shared.api
    }

    /// Fetch one page into `entities` / `total_items`.
    pub fn list(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Page<E>, ApiError>> + Send + 'static {
        let shared = Arc::clone(&self.shared);
        let ticket = shared.start_read(&shared.list_ticket, EntityIntent::ListPending);
        settle(tokio::spawn(async move {
            let result = shared.api.list(&request).await;
            shared.finish_list(ticket, result)
        }))
    }

    /// Fetch one record into `entity`.
    pub fn get(
        &self,
        id: EntityId,
    ) -> impl Future<Output = Result<E, ApiError>> + Send + 'static {
        let shared = Arc::clone(&self.shared);
        let ticket = shared.start_read(&shared.get_ticket, EntityIntent::GetPending);
        settle(tokio::spawn(async move {
            let result = shared.api.get(id).await;
            shared.finish_get(id, ticket, result)
        }))
    }

    /// POST a new record, then refresh the list.
    ///
    /// A record that already carries an id is rejected without a request.
    pub fn create(&self, record: E) -> impl Future<Output = Result<E, ApiError>> + Send + 'static {
        self.spawn_write(require_new(&record), move |shared| async move {
            let result = shared.api.create(&record).await;
            shared.finish_write(result).await
        })
    }

    /// PUT a persisted record, then refresh the list.
    pub fn update(&self, record: E) -> impl Future<Output = Result<E, ApiError>> + Send + 'static {
        self.spawn_write(require_id(&record).map(drop), move |shared| async move {
            let result = shared.api.update(&record).await;
            shared.finish_write(result).await
        })
    }

    /// PATCH only the fields set on `record`, then refresh the list.
    pub fn partial_update(
        &self,
        record: E,
    ) -> impl Future<Output = Result<E, ApiError>> + Send + 'static {
        self.spawn_write(require_id(&record).map(drop), move |shared| async move {
            let result = shared.api.partial_update(&record).await;
            shared.finish_write(result).await
        })
    }

    /// Create when `record` is new, update otherwise.
    pub fn save(&self, record: E) -> impl Future<Output = Result<E, ApiError>> + Send + 'static {
        self.spawn_write(Ok(()), move |shared| async move {
            let result = if record.is_new() {
                shared.api.create(&record).await
            } else {
                shared.api.update(&record).await
            };
            shared.finish_write(result).await
        })
    }

    /// DELETE a record, then refresh the list.
    pub fn delete(
        &self,
        id: EntityId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send + 'static {
        self.spawn_write(Ok(()), move |shared| async move {
            match shared.api.delete(id).await {
                Ok(()) => {
                    tracing::info!(resource = E::RESOURCE, id, "Entity deleted");
                    shared.dispatch(EntityIntent::DeleteFulfilled);
                    shared.refresh().await;
                    Ok(())
                }
                Err(err) => Err(shared.reject(err)),
            }
        })
    }

    /// Return to the initial state so a "new" form starts empty.
    ///
    /// A request still in flight applies its result afterwards.
    pub fn reset(&self) {
        if self.shared.state.borrow().is_busy() {
            tracing::debug!(resource = E::RESOURCE, "Reset while a request is in flight");
        }
        self.shared.dispatch(EntityIntent::Reset);
    }

    /// Apply `WritePending` (or the validation failure) now and run `op` on a task.
    fn spawn_write<T, F, Fut>(
        &self,
        check: Result<(), ApiError>,
        op: F,
    ) -> impl Future<Output = Result<T, ApiError>> + Send + 'static
    where
        T: Send + 'static,
        F: FnOnce(Arc<Shared<E, A>>) -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let task = self
            .shared
            .start_write(check)
            .map(|()| tokio::spawn(op(Arc::clone(&self.shared))));
        async move { settle(task?).await }
    }
}

impl<E: Entity, A: ResourceApi<E>> Shared<E, A> {
    fn dispatch(&self, intent: EntityIntent<E>) {
        self.state.send_modify(|state| {
            *state = EntityReducer::<E>::reduce(std::mem::take(state), intent);
        });
    }

    fn reject(&self, err: ApiError) -> ApiError {
        tracing::warn!(resource = E::RESOURCE, error = %err, kind = err.error_type(), "Operation failed");
        self.dispatch(EntityIntent::Rejected {
            message: err.to_string(),
        });
        err
    }

    fn start_read(&self, counter: &AtomicU64, pending: EntityIntent<E>) -> u64 {
        let ticket = counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.dispatch(pending);
        ticket
    }

    fn is_stale(&self, counter: &AtomicU64, ticket: u64) -> bool {
        self.config.sequence_reads && counter.load(Ordering::SeqCst) != ticket
    }

    fn finish_list(
        &self,
        ticket: u64,
        result: Result<Page<E>, ApiError>,
    ) -> Result<Page<E>, ApiError> {
        if self.is_stale(&self.list_ticket, ticket) {
            tracing::debug!(resource = E::RESOURCE, ticket, "Discarding superseded list response");
            return result;
        }
        match result {
            Ok(page) => {
                self.dispatch(EntityIntent::ListFulfilled {
                    entities: page.entities.clone(),
                    total_items: page.total_items,
                });
                Ok(page)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn finish_get(&self, id: EntityId, ticket: u64, result: Result<E, ApiError>) -> Result<E, ApiError> {
        if self.is_stale(&self.get_ticket, ticket) {
            tracing::debug!(resource = E::RESOURCE, id, ticket, "Discarding superseded get response");
            return result;
        }
        match result {
            Ok(entity) => {
                self.dispatch(EntityIntent::GetFulfilled(entity.clone()));
                Ok(entity)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn start_write(&self, check: Result<(), ApiError>) -> Result<(), ApiError> {
        match check {
            Ok(()) => {
                self.dispatch(EntityIntent::WritePending);
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    async fn finish_write(&self, result: Result<E, ApiError>) -> Result<E, ApiError> {
        match result {
            Ok(saved) => {
                tracing::info!(resource = E::RESOURCE, id = ?saved.id(), "Entity saved");
                self.dispatch(EntityIntent::WriteFulfilled(saved.clone()));
                self.refresh().await;
                Ok(saved)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Best-effort reload of the first page after a write.
    async fn refresh(&self) {
        let request = PageRequest::first_page(self.config.default_page_size);
        let ticket = self.start_read(&self.list_ticket, EntityIntent::RefreshPending);
        let result = self.api.list(&request).await;
        if let Err(err) = self.finish_list(ticket, result) {
            tracing::warn!(resource = E::RESOURCE, error = %err, "Refresh after write failed");
        }
    }
}

/// Wait for a spawned operation, surfacing its panic if it had one.
async fn settle<T>(task: JoinHandle<Result<T, ApiError>>) -> Result<T, ApiError> {
    match task.await {
        Ok(result) => result,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(_) => Err(ApiError::Cancelled),
    }
}

fn require_new<E: Entity>(record: &E) -> Result<(), ApiError> {
    match record.id() {
        None => Ok(()),
        Some(_) => Err(ApiError::Validation(format!(
            "A new {} cannot already have an ID",
            E::NAME
        ))),
    }
}

fn require_id<E: Entity>(record: &E) -> Result<EntityId, ApiError> {
    record
        .id()
        .ok_or_else(|| ApiError::Validation(format!("{} id is required", E::NAME)))
}
