//! Process-local resolution cache
//!
//! Keyed by the raw URL. Unresolved outcomes are stored too, so a URL that
//! timed out once is not attempted again in the same process.
//!
//! Each URL owns one slot. Concurrent lookups of the same URL share the slot,
//! so only the first caller computes the outcome and the rest wait for it.

use citesweep_domain::ResolutionResult;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<ResolutionResult>>;

/// Cache of resolution outcomes
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<String, Slot>>,
}

impl ResolutionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, url: &str) -> Slot {
        Arc::clone(self.lock().entry(url.to_string()).or_default())
    }

    /// Look up a previous outcome
    pub fn get(&self, url: &str) -> Option<ResolutionResult> {
        self.lock().get(url).and_then(|slot| slot.get().cloned())
    }

    /// Return the outcome for `url`, running `resolve` only if no other
    /// caller has produced (or is producing) it
    ///
    /// The flag is true when this call ran `resolve`. If the running caller
    /// is dropped mid-flight, the next waiter takes over.
    pub async fn get_or_resolve<F, Fut>(&self, url: &str, resolve: F) -> (ResolutionResult, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ResolutionResult>,
    {
        let slot = self.slot(url);
        let mut computed = false;
        let result = slot
            .get_or_init(|| {
                computed = true;
                resolve()
            })
            .await
            .clone();
        (result, computed)
    }

    /// Store an outcome
    pub fn insert(&self, url: impl Into<String>, result: ResolutionResult) {
        self.lock()
            .insert(url.into(), Arc::new(OnceCell::new_with(Some(result))));
    }

    /// Number of cached URLs
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.initialized()).count()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.lock().clear();
    }
}
