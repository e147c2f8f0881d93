use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use super::{CacheConfig, CacheEntry, CacheError, CacheStatus, KindStatus};
use crate::api::ResourceFetcher;
use crate::guard::GuardedStore;
use crate::kinds::{InvalidateTarget, ResourceKind};
use crate::models::{CompanySummary, DashboardStats, ResourceData, Round, Student, StudentRef};
use crate::store::KeyValueStore;

type FetchResult = Result<Arc<ResourceData>, CacheError>;

/// Handle every caller of one kind awaits while its fetch is outstanding.
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// Memory, then durable store, then network, for every resource kind.
///
/// Construct one per process and hand out clones; clones share all state.
/// Methods that may fetch must run inside a Tokio runtime.
#[derive(Clone)]
pub struct CacheManager {
    inner: Arc<Inner>,
}

struct Inner {
    fetcher: Arc<dyn ResourceFetcher>,
    store: GuardedStore,
    config: CacheConfig,
    memory: Mutex<MemoryTable>,
    in_flight: Mutex<HashMap<ResourceKind, SharedFetch>>,
}

#[derive(Default)]
struct MemoryTable {
    entries: HashMap<ResourceKind, CacheEntry>,
    /// Bumped every time a kind is invalidated
    generations: HashMap<ResourceKind, u64>,
}

impl MemoryTable {
    fn generation(&self, kind: ResourceKind) -> u64 {
        self.generations.get(&kind).copied().unwrap_or(0)
    }
}

/// Outcome of promoting a durable copy into memory
#[derive(Debug)]
enum Promotion {
    Stored(Arc<ResourceData>),
    /// A fetch landed first; its value is kept
    Superseded(Arc<ResourceData>),
    /// The kind was invalidated after the durable copy was read
    Invalidated,
}

/// Poisoning is ignored: no critical section leaves a table half-updated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Removes the in-flight marker for `kind` when dropped, so the marker goes
/// away even if the fetch task panics or is cancelled.
struct InFlightMarker {
    inner: Arc<Inner>,
    kind: ResourceKind,
}

impl Drop for InFlightMarker {
    fn drop(&mut self) {
        lock(&self.inner.in_flight).remove(&self.kind);
    }
}

impl Inner {
    fn remember(&self, data: Arc<ResourceData>) {
        let entry = CacheEntry::new(data);
        lock(&self.memory).entries.insert(entry.kind, entry);
    }

    fn generation(&self, kind: ResourceKind) -> u64 {
        lock(&self.memory).generation(kind)
    }

    /// Put a durable copy read at `generation` into memory, unless a fetch
    /// or an invalidation got there first.
    fn promote(&self, kind: ResourceKind, generation: u64, data: Arc<ResourceData>) -> Promotion {
        let mut memory = lock(&self.memory);
        if let Some(entry) = memory.entries.get(&kind) {
            return Promotion::Superseded(Arc::clone(&entry.data));
        }
        if memory.generation(kind) != generation {
            return Promotion::Invalidated;
        }
        memory.entries.insert(kind, CacheEntry::new(Arc::clone(&data)));
        Promotion::Stored(data)
    }

    fn persist(&self, data: &ResourceData) {
        let kind = data.kind();
        let json = match data.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to serialize resource for durable cache");
                return;
            }
        };
        if let Err(e) = self.store.set(&kind.storage_key(), &json) {
            warn!(kind = %kind, error = %e, "Failed to write durable cache entry");
        }
    }

    /// Durable copy of `kind`, or `None` if absent or unreadable
    fn load_durable(&self, kind: ResourceKind) -> Option<ResourceData> {
        let raw = match self.store.get(&kind.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to read durable cache entry");
                return None;
            }
        };
        match ResourceData::from_json(kind, &raw) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!(kind = %kind, error = %e, "Corrupt durable cache entry, treating as miss");
                None
            }
        }
    }

    async fn run_fetch(&self, kind: ResourceKind) -> FetchResult {
        let timeout = self.config.timeout_for(kind);
        match tokio::time::timeout(timeout, self.fetcher.fetch(kind)).await {
            Ok(Ok(data)) if data.kind() == kind => Ok(Arc::new(data)),
            Ok(Ok(data)) => Err(CacheError::UnexpectedPayload {
                kind,
                actual: data.kind(),
            }),
            Ok(Err(e)) => Err(CacheError::Fetch {
                kind,
                message: format!("{:#}", e),
            }),
            Err(_) => Err(CacheError::Timeout {
                kind,
                after: timeout,
            }),
        }
    }
}

impl CacheManager {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, store: GuardedStore, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                store,
                config,
                memory: Mutex::new(MemoryTable::default()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Serve `kind`.
    ///
    /// 1. A memory entry is returned without suspending.
    /// 2. An outstanding fetch for `kind` is joined.
    /// 3. A readable durable copy is promoted to memory and returned; kinds
    ///    whose policy says so also start a background refresh.
    /// 4. Otherwise a network fetch is started and awaited. Its outcome,
    ///    success or failure, is shared by every caller that joined it.
    pub async fn get(&self, kind: ResourceKind) -> Result<Arc<ResourceData>, CacheError> {
        if let Some(data) = self.peek(kind) {
            return Ok(data);
        }

        let pending = lock(&self.inner.in_flight).get(&kind).cloned();
        if let Some(pending) = pending {
            debug!(kind = %kind, "Joining in-flight fetch");
            return pending.await;
        }

        let generation = self.inner.generation(kind);
        if let Some(data) = self.inner.load_durable(kind) {
            match self.inner.promote(kind, generation, Arc::new(data)) {
                Promotion::Stored(data) => {
                    debug!(kind = %kind, "Serving from durable cache");
                    if kind.policy().revalidate_on_durable_hit {
                        self.revalidate_in_background(kind);
                    }
                    return Ok(data);
                }
                Promotion::Superseded(data) => return Ok(data),
                Promotion::Invalidated => {
                    debug!(kind = %kind, "Durable copy invalidated while loading");
                }
            }
        }

        self.start_fetch(kind).await
    }

    /// Memory-only lookup; never touches the store or the network
    pub fn peek(&self, kind: ResourceKind) -> Option<Arc<ResourceData>> {
        lock(&self.inner.memory)
            .entries
            .get(&kind)
            .map(|entry| Arc::clone(&entry.data))
    }

    pub fn is_in_flight(&self, kind: ResourceKind) -> bool {
        lock(&self.inner.in_flight).contains_key(&kind)
    }

    /// Join the outstanding fetch for `kind`, or start one.
    ///
    /// Check and insert happen under one lock, so two callers can never both
    /// start a fetch for the same kind.
    fn start_fetch(&self, kind: ResourceKind) -> SharedFetch {
        let mut in_flight = lock(&self.inner.in_flight);
        if let Some(existing) = in_flight.get(&kind) {
            return existing.clone();
        }

        debug!(kind = %kind, "Fetching from network");
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let marker = InFlightMarker {
                inner: Arc::clone(&inner),
                kind,
            };
            let result = inner.run_fetch(kind).await;
            if let Ok(ref data) = result {
                inner.remember(Arc::clone(data));
                inner.persist(data);
            }
            // Waiters are released only after the marker is gone
            drop(marker);
            result
        });

        let shared = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(CacheError::TaskFailed {
                    kind,
                    message: e.to_string(),
                }),
            }
        }
        .boxed()
        .shared();

        in_flight.insert(kind, shared.clone());
        shared
    }

    fn revalidate_in_background(&self, kind: ResourceKind) {
        let pending = self.start_fetch(kind);
        tokio::spawn(async move {
            match pending.await {
                Ok(_) => debug!(kind = %kind, "Background revalidation complete"),
                Err(e) => warn!(kind = %kind, error = %e, "Background revalidation failed"),
            }
        });
    }

    /// Drop the memory and durable entries of the target kinds.
    ///
    /// A fetch already in flight is not cancelled; when it lands it
    /// repopulates its kind. A durable copy read before this call is never
    /// promoted afterwards.
    pub fn invalidate(&self, target: impl Into<InvalidateTarget>) {
        let kinds = target.into().kinds();
        // Durable entries go first so a reader that sees the new generation
        // can no longer load the old copy
        for kind in &kinds {
            if let Err(e) = self.inner.store.remove(&kind.storage_key()) {
                warn!(kind = %kind, error = %e, "Failed to remove durable cache entry");
            }
        }
        {
            let mut memory = lock(&self.inner.memory);
            for &kind in &kinds {
                memory.entries.remove(&kind);
                *memory.generations.entry(kind).or_insert(0) += 1;
            }
        }
        info!(kinds = ?kinds, "Invalidated cache");
    }

    /// Forget everything cached for the signed-in user
    pub fn clear_for_logout(&self) {
        self.invalidate(InvalidateTarget::All);
    }

    /// Warm several kinds concurrently
    pub async fn prefetch(&self, kinds: &[ResourceKind]) -> Vec<(ResourceKind, Result<Arc<ResourceData>, CacheError>)> {
        let results = future::join_all(kinds.iter().map(|&kind| self.get(kind))).await;
        kinds.iter().copied().zip(results).collect()
    }

    /// Wait for every fetch outstanding right now, including background
    /// revalidations, to settle
    pub async fn wait_in_flight(&self) {
        let pending: Vec<SharedFetch> = lock(&self.inner.in_flight).values().cloned().collect();
        future::join_all(pending).await;
    }

    pub fn status(&self) -> CacheStatus {
        let memory = lock(&self.inner.memory);
        let in_flight = lock(&self.inner.in_flight);
        let kinds = ResourceKind::ALL
            .iter()
            .map(|&kind| {
                let entry = memory.entries.get(&kind);
                KindStatus {
                    kind,
                    in_memory: entry.is_some(),
                    in_flight: in_flight.contains_key(&kind),
                    durable: matches!(self.inner.store.get(&kind.storage_key()), Ok(Some(_))),
                    age: entry.map(CacheEntry::age_display),
                }
            })
            .collect();
        CacheStatus { kinds }
    }

    // ===== Typed accessors =====

    async fn typed<T>(
        &self,
        kind: ResourceKind,
        extract: impl FnOnce(&ResourceData) -> Option<T>,
    ) -> Result<T, CacheError> {
        let data = self.get(kind).await?;
        extract(&*data).ok_or(CacheError::UnexpectedPayload {
            kind,
            actual: data.kind(),
        })
    }

    pub async fn fetch_companies(&self) -> Result<Vec<String>, CacheError> {
        self.typed(ResourceKind::Companies, |d| match d {
            ResourceData::Companies(v) => Some(v.clone()),
            _ => None,
        })
        .await
    }

    pub async fn fetch_years(&self) -> Result<Vec<i32>, CacheError> {
        self.typed(ResourceKind::Years, |d| match d {
            ResourceData::Years(v) => Some(v.clone()),
            _ => None,
        })
        .await
    }

    pub async fn fetch_students(&self) -> Result<Vec<StudentRef>, CacheError> {
        self.typed(ResourceKind::Students, |d| match d {
            ResourceData::Students(v) => Some(v.clone()),
            _ => None,
        })
        .await
    }

    pub async fn fetch_all_students(&self) -> Result<Vec<Student>, CacheError> {
        self.typed(ResourceKind::AllStudents, |d| match d {
            ResourceData::AllStudents(v) => Some(v.clone()),
            _ => None,
        })
        .await
    }

    pub async fn fetch_all_companies(&self) -> Result<Vec<CompanySummary>, CacheError> {
        self.typed(ResourceKind::AllCompanies, |d| match d {
            ResourceData::AllCompanies(v) => Some(v.clone()),
            _ => None,
        })
        .await
    }

    pub async fn fetch_rounds(&self) -> Result<Vec<Round>, CacheError> {
        self.typed(ResourceKind::Rounds, |d| match d {
            ResourceData::Rounds(v) => Some(v.clone()),
            _ => None,
        })
        .await
    }

    pub async fn fetch_dashboard(&self) -> Result<DashboardStats, CacheError> {
        self.typed(ResourceKind::Dashboard, |d| match d {
            ResourceData::Dashboard(v) => Some(v.clone()),
            _ => None,
        })
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================
