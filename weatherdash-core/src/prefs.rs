//! Display theme preference, persisted as a single boolean.

use crate::storage::KvStore;

const THEME_KEY: &str = "dark_mode";

/// `true` = dark theme. Defaults to dark when nothing (or garbage) is
/// persisted.
#[derive(Debug)]
pub struct PreferenceStore {
    store: KvStore,
    dark_mode: bool,
}

impl PreferenceStore {
    pub fn load(store: KvStore) -> Self {
        let dark_mode = store.read(THEME_KEY).unwrap_or(true);
        Self { store, dark_mode }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Set the theme and persist it immediately. Persistence failures are
    /// logged and swallowed.
    pub fn set_dark_mode(&mut self, dark: bool) {
        self.dark_mode = dark;
        if let Err(err) = self.store.write(THEME_KEY, &self.dark_mode) {
            tracing::warn!(%err, "failed to persist theme preference");
        }
    }

    /// Flip the theme, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }
}
