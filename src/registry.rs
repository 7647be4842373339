//! Configured entries keyed by locale.
//!
//! Owned by the integration: an entry is inserted when it is set up and
//! removed when it is unloaded. At most one entry exists per locale.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::api::Locale;
use crate::coordinator::MedalCoordinator;
use crate::setup::ConfigEntry;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Locale '{locale}' is already configured")]
    AlreadyConfigured { locale: Locale },
}

/// A live entry and the coordinator backing its sensors.
#[derive(Clone)]
pub struct RegisteredEntry {
    pub entry: ConfigEntry,
    pub coordinator: MedalCoordinator,
}

#[derive(Clone, Default)]
pub struct EntryRegistry {
    inner: Arc<RwLock<HashMap<Locale, RegisteredEntry>>>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entry under its locale.
    ///
    /// # Errors
    /// Returns `AlreadyConfigured` if the locale is taken. The registry is
    /// unchanged on error.
    pub fn insert(&self, entry: ConfigEntry, coordinator: MedalCoordinator) -> Result<(), RegistryError> {
        let mut entries = self.inner.write();
        let locale = entry.locale;
        if entries.contains_key(&locale) {
            return Err(RegistryError::AlreadyConfigured { locale });
        }

        tracing::info!(locale = %locale, entry_id = %entry.entry_id, "Entry registered");
        entries.insert(locale, RegisteredEntry { entry, coordinator });
        Ok(())
    }

    pub fn remove(&self, locale: Locale) -> Option<RegisteredEntry> {
        let removed = self.inner.write().remove(&locale);
        if let Some(registered) = &removed {
            tracing::info!(locale = %locale, entry_id = %registered.entry.entry_id, "Entry removed");
        }
        removed
    }

    pub fn get(&self, locale: Locale) -> Option<RegisteredEntry> {
        self.inner.read().get(&locale).cloned()
    }

    pub fn contains(&self, locale: Locale) -> bool {
        self.inner.read().contains_key(&locale)
    }

    /// Configured locales, sorted.
    pub fn locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self.inner.read().keys().copied().collect();
        locales.sort();
        locales
    }

    pub fn entries(&self) -> Vec<ConfigEntry> {
        let mut entries: Vec<ConfigEntry> = self.inner.read().values().map(|r| r.entry.clone()).collect();
        entries.sort_by_key(|e| e.locale);
        entries
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
