//! Projection results cached per snapshot revision.
//!
//! Interactive callers re-project after every edit. The cache keeps the
//! results of the newest revision it has seen and drops everything older the
//! first time a newer snapshot arrives. Results for a snapshot older than the
//! cached revision are computed but not stored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use qcanvas_ir::{CircuitSnapshot, QubitId};

use crate::projection::Projector;
use crate::state::BlochState;

/// Thread-safe cache of projected states, shared by every reader of one
/// store.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    state: RwLock<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Default)]
struct CacheState {
    /// Revision the entries belong to.
    revision: Option<u64>,
    entries: FxHashMap<QubitId, BlochState>,
}

impl CacheState {
    /// Make `revision` current if it is not older than the cached one.
    /// Returns whether results for `revision` may be stored.
    fn admit(&mut self, revision: u64) -> bool {
        match self.revision {
            Some(current) if current > revision => false,
            Some(current) if current == revision => true,
            _ => {
                if !self.entries.is_empty() {
                    debug!(
                        evicted = self.entries.len(),
                        old_revision = ?self.revision,
                        revision,
                        "dropping stale projections"
                    );
                }
                self.entries.clear();
                self.revision = Some(revision);
                true
            }
        }
    }
}

impl ProjectionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Projected state of `qubit` in `snapshot`.
    pub fn get(&self, snapshot: &CircuitSnapshot, qubit: QubitId) -> BlochState {
        if let Some(state) = self.lookup(snapshot.revision(), qubit) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(revision = snapshot.revision(), qubit = %qubit, "projection cache hit");
            return state;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let state = Projector::for_snapshot(snapshot).project(qubit);
        let mut cached = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if cached.admit(snapshot.revision()) {
            cached.entries.insert(qubit, state);
        }
        state
    }

    /// Projected state of every qubit in `snapshot`.
    ///
    /// Missing entries are computed with one shared [`Projector`].
    pub fn project_all(&self, snapshot: &CircuitSnapshot) -> Vec<BlochState> {
        let revision = snapshot.revision();
        let qubits = (0..snapshot.circuit().num_qubits()).map(QubitId);

        let found: Vec<Option<BlochState>> = {
            let cached = self.state.read().unwrap_or_else(PoisonError::into_inner);
            qubits
                .clone()
                .map(|q| {
                    (cached.revision == Some(revision))
                        .then(|| cached.entries.get(&q).copied())
                        .flatten()
                })
                .collect()
        };

        let hits = found.iter().filter(|s| s.is_some()).count() as u64;
        let misses = found.len() as u64 - hits;
        self.hits.fetch_add(hits, Ordering::Relaxed);
        self.misses.fetch_add(misses, Ordering::Relaxed);
        if misses == 0 {
            return found.into_iter().flatten().collect();
        }

        let mut projector = Projector::for_snapshot(snapshot);
        let states: Vec<BlochState> = qubits
            .zip(found)
            .map(|(q, hit)| hit.unwrap_or_else(|| projector.project(q)))
            .collect();

        let mut cached = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if cached.admit(revision) {
            for (q, state) in states.iter().enumerate() {
                cached.entries.insert(QubitId(q as u32), *state);
            }
        }
        debug!(revision, hits, misses, "projected all qubits");
        states
    }

    /// Revision whose results are currently cached.
    pub fn revision(&self) -> Option<u64> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .revision
    }

    /// Number of cached states.
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and forget the cached revision.
    pub fn clear(&self) {
        let mut cached = self.state.write().unwrap_or_else(PoisonError::into_inner);
        cached.entries.clear();
        cached.revision = None;
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that required a projection.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn lookup(&self, revision: u64, qubit: QubitId) -> Option<BlochState> {
        let cached = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if cached.revision != Some(revision) {
            return None;
        }
        cached.entries.get(&qubit).copied()
    }
}
