//! Recent-search history: bounded, deduplicating, most-recent-first.

use crate::storage::KvStore;

/// Maximum number of remembered searches.
pub const MAX_RECENT_SEARCHES: usize = 5;

const HISTORY_KEY: &str = "recent_searches";

/// In-memory history list written through to storage on every mutation.
///
/// The in-memory list is the source of truth; persistence failures are
/// logged and swallowed so weather display is never blocked by them.
#[derive(Debug)]
pub struct SearchHistoryStore {
    store: KvStore,
    entries: Vec<String>,
}

impl SearchHistoryStore {
    /// Load the persisted history, or start empty when the stored value
    /// is absent or malformed.
    pub fn load(store: KvStore) -> Self {
        let entries = store.read(HISTORY_KEY).unwrap_or_default();
        Self { store, entries }
    }

    /// Record a search for `city`: an existing exact-match entry moves to
    /// the front instead of duplicating, and the list is truncated to
    /// [`MAX_RECENT_SEARCHES`]. The full list is rewritten to storage.
    pub fn record_search(&mut self, city: &str) {
        self.entries.retain(|entry| entry != city);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(MAX_RECENT_SEARCHES);
        self.save();
    }

    /// Current entries, front = most recent.
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    fn save(&self) {
        if let Err(err) = self.store.write(HISTORY_KEY, &self.entries) {
            tracing::warn!(%err, "failed to persist recent searches");
        }
    }
}
