//! In-memory data store
//!
//! Holds the four public collections (events, team, faculty, gallery) with an
//! independent loading flag each. A collection that already holds items is
//! not fetched again unless forced. Failed fetches keep the previous snapshot.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::backend::{extract_list, Backend, Collection};
use crate::error::{Error, Result};
use crate::models::{Event, FacultyMember, GalleryItem, TeamMember};

/// Default upper bound for a single list request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a successful `fetch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Collection already populated, no request made
    Cached,
    /// Request made, this many items stored
    Fetched(usize),
}

/// Per-collection loading flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub events: bool,
    pub team: bool,
    pub faculty: bool,
    pub gallery: bool,
}

impl LoadingFlags {
    pub fn get(&self, collection: Collection) -> bool {
        match collection {
            Collection::Events => self.events,
            Collection::Team => self.team,
            Collection::Faculty => self.faculty,
            Collection::Gallery => self.gallery,
        }
    }

    pub fn any(&self) -> bool {
        self.events || self.team || self.faculty || self.gallery
    }
}

/// Requests in flight per collection. A collection is loading while its
/// count is above zero, so overlapping fetches keep the flag raised until
/// the last one settles.
#[derive(Debug, Default, Clone, Copy)]
struct InFlight {
    events: usize,
    team: usize,
    faculty: usize,
    gallery: usize,
}

impl InFlight {
    fn count(&mut self, collection: Collection) -> &mut usize {
        match collection {
            Collection::Events => &mut self.events,
            Collection::Team => &mut self.team,
            Collection::Faculty => &mut self.faculty,
            Collection::Gallery => &mut self.gallery,
        }
    }

    fn flags(&self) -> LoadingFlags {
        LoadingFlags {
            events: self.events > 0,
            team: self.team > 0,
            faculty: self.faculty > 0,
            gallery: self.gallery > 0,
        }
    }
}

#[derive(Debug)]
struct StoreState {
    events: Arc<[Event]>,
    team: Arc<[TeamMember]>,
    faculty: Arc<[FacultyMember]>,
    gallery: Arc<[GalleryItem]>,
    in_flight: InFlight,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            events: empty(),
            team: empty(),
            faculty: empty(),
            gallery: empty(),
            in_flight: InFlight::default(),
        }
    }
}

fn empty<T>() -> Arc<[T]> {
    Arc::from(Vec::new())
}

/// Record type stored in one of the collections
trait CollectionItem: DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn slot(state: &mut StoreState) -> &mut Arc<[Self]>;
}

impl CollectionItem for Event {
    const COLLECTION: Collection = Collection::Events;

    fn slot(state: &mut StoreState) -> &mut Arc<[Self]> {
        &mut state.events
    }
}

impl CollectionItem for TeamMember {
    const COLLECTION: Collection = Collection::Team;

    fn slot(state: &mut StoreState) -> &mut Arc<[Self]> {
        &mut state.team
    }
}

impl CollectionItem for FacultyMember {
    const COLLECTION: Collection = Collection::Faculty;

    fn slot(state: &mut StoreState) -> &mut Arc<[Self]> {
        &mut state.faculty
    }
}

impl CollectionItem for GalleryItem {
    const COLLECTION: Collection = Collection::Gallery;

    fn slot(state: &mut StoreState) -> &mut Arc<[Self]> {
        &mut state.gallery
    }
}

/// Shared data container, injected into every view that lists entities
pub struct DataStore<B> {
    backend: B,
    request_timeout: Duration,
    state: RwLock<StoreState>,
}

impl<B: Backend> DataStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_timeout(backend, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(backend: B, request_timeout: Duration) -> Self {
        Self {
            backend,
            request_timeout,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch a collection unless it is already populated (or `force` is set)
    pub async fn fetch(&self, collection: Collection, force: bool) -> Result<FetchOutcome> {
        match collection {
            Collection::Events => self.fetch_typed::<Event>(force).await,
            Collection::Team => self.fetch_typed::<TeamMember>(force).await,
            Collection::Faculty => self.fetch_typed::<FacultyMember>(force).await,
            Collection::Gallery => self.fetch_typed::<GalleryItem>(force).await,
        }
    }

    /// Re-fetch a collection regardless of its contents
    pub async fn refresh(&self, collection: Collection) -> Result<FetchOutcome> {
        self.fetch(collection, true).await
    }

    /// Initial load: all four collections concurrently, independent of each other
    pub async fn load_all(&self) -> Vec<(Collection, Result<FetchOutcome>)> {
        let (events, team, faculty, gallery) = tokio::join!(
            self.fetch(Collection::Events, false),
            self.fetch(Collection::Team, false),
            self.fetch(Collection::Faculty, false),
            self.fetch(Collection::Gallery, false),
        );
        vec![
            (Collection::Events, events),
            (Collection::Team, team),
            (Collection::Faculty, faculty),
            (Collection::Gallery, gallery),
        ]
    }

    /// Drop every cached collection so the next plain fetch hits the network
    pub fn clear(&self) {
        let mut state = self.write();
        state.events = empty();
        state.team = empty();
        state.faculty = empty();
        state.gallery = empty();
        debug!("Cleared all collections");
    }

    pub fn events(&self) -> Arc<[Event]> {
        self.read().events.clone()
    }

    pub fn team(&self) -> Arc<[TeamMember]> {
        self.read().team.clone()
    }

    pub fn faculty(&self) -> Arc<[FacultyMember]> {
        self.read().faculty.clone()
    }

    pub fn gallery(&self) -> Arc<[GalleryItem]> {
        self.read().gallery.clone()
    }

    pub fn loading(&self) -> LoadingFlags {
        self.read().in_flight.flags()
    }

    pub fn is_loading(&self, collection: Collection) -> bool {
        self.read().in_flight.flags().get(collection)
    }

    pub fn is_loading_any(&self) -> bool {
        self.read().in_flight.flags().any()
    }

    #[instrument(skip(self), fields(collection = %T::COLLECTION))]
    async fn fetch_typed<T: CollectionItem>(&self, force: bool) -> Result<FetchOutcome> {
        let collection = T::COLLECTION;

        let loading = {
            let mut state = self.write();
            if !force && !T::slot(&mut state).is_empty() {
                debug!("Collection already loaded");
                return Ok(FetchOutcome::Cached);
            }
            LoadingGuard::acquire(&self.state, &mut state, collection)
        };

        let response =
            tokio::time::timeout(self.request_timeout, self.backend.get_json(collection.path()))
                .await;

        let result = match response {
            Ok(Ok(body)) => {
                let items: Vec<T> = extract_list(body, collection.name());
                let count = items.len();
                *T::slot(&mut self.write()) = Arc::from(items);
                info!(count, "Fetched collection");
                Ok(FetchOutcome::Fetched(count))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::Timeout(self.request_timeout)),
        };

        drop(loading);

        if let Err(e) = &result {
            warn!(error = %e, "Failed to fetch collection");
        }
        result
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts one in-flight request for its lifetime.
///
/// Releasing on drop covers cancelled fetches as well as finished ones.
struct LoadingGuard<'a> {
    state: &'a RwLock<StoreState>,
    collection: Collection,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(
        lock: &'a RwLock<StoreState>,
        state: &mut StoreState,
        collection: Collection,
    ) -> Self {
        *state.in_flight.count(collection) += 1;
        Self {
            state: lock,
            collection,
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let count = state.in_flight.count(self.collection);
        *count = count.saturating_sub(1);
    }
}
