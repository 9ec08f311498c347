use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

/// Order token handed out when a fetch starts.
///
/// Tickets grow monotonically per cache, so a response carrying an older
/// ticket can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
    ticket: Ticket,
    invalidated: bool,
}

#[derive(Debug)]
struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    next_ticket: u64,
    /// Last ticket handed out when each key was invalidated.
    invalidated_through: HashMap<K, u64>,
    /// Last ticket handed out at the latest `invalidate_all`.
    all_invalidated_through: u64,
}

impl<K: Eq + Hash, V> CacheState<K, V> {
    /// Whether a fetch holding `ticket` started before an invalidation of `key`.
    fn started_before_invalidation(&self, key: &K, ticket: Ticket) -> bool {
        let per_key = self.invalidated_through.get(key).copied().unwrap_or(0);
        ticket.0 <= per_key.max(self.all_invalidated_through)
    }
}

/// Per-parameter cache of fetched responses.
///
/// - One entry per distinct key (query parameters), so the same range/id is
///   not requested twice while fresh.
/// - An entry is fresh for `stale_after`; stale or invalidated entries are
///   still returned by [`QueryCache::last_known`] so the last value can stay
///   on screen while a refetch is in flight.
/// - Last write wins by request order: a completed fetch is dropped if a
///   fetch started later for the same key has already been stored.
/// - A fetch started before an invalidation is stored but never counts as
///   fresh, so its pre-invalidation data is refetched on the next read.
///
/// The lock is never held across an await point.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    stale_after: Duration,
    state: Mutex<CacheState<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> QueryCache<K, V> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                next_ticket: 0,
                invalidated_through: HashMap::new(),
                all_invalidated_through: 0,
            }),
        }
    }

    pub fn with_stale_secs(secs: u64) -> Self {
        Self::new(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)))
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        // A panic while holding the lock can't leave an entry half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The cached value if it was fetched less than `stale_after` ago.
    pub fn get_fresh(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let state = self.lock();
        let entry = state.entries.get(key)?;
        if entry.invalidated || now - entry.fetched_at >= self.stale_after {
            return None;
        }
        Some(entry.value.clone())
    }

    /// The cached value regardless of age.
    pub fn last_known(&self, key: &K) -> Option<V> {
        self.lock().entries.get(key).map(|e| e.value.clone())
    }

    /// When the value for `key` was stored.
    pub fn fetched_at(&self, key: &K) -> Option<DateTime<Utc>> {
        self.lock().entries.get(key).map(|e| e.fetched_at)
    }

    /// Start a fetch: take the next ticket.
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        state.next_ticket += 1;
        Ticket(state.next_ticket)
    }

    /// Store a completed fetch. Returns `false` (and keeps the current value)
    /// if a fetch started after this one has already been stored.
    ///
    /// A fetch that started before the key was invalidated is stored as
    /// already invalidated.
    pub fn complete(&self, key: K, ticket: Ticket, value: V, now: DateTime<Utc>) -> bool {
        let mut state = self.lock();
        if let Some(existing) = state.entries.get(&key) {
            if existing.ticket > ticket {
                return false;
            }
        }
        let invalidated = state.started_before_invalidation(&key, ticket);
        state.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
                ticket,
                invalidated,
            },
        );
        true
    }

    /// Force the next read of `key` to refetch, including reads answered by
    /// fetches already in flight. The value stays available through
    /// [`QueryCache::last_known`]. Returns whether a value was cached.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut state = self.lock();
        let through = state.next_ticket;
        state.invalidated_through.insert(key.clone(), through);
        match state.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    /// Invalidate every entry.
    pub fn invalidate_all(&self) {
        let mut state = self.lock();
        state.all_invalidated_through = state.next_ticket;
        for entry in state.entries.values_mut() {
            entry.invalidated = true;
        }
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
