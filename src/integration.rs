//! Entry lifecycle: configure, set up, unload.

use thiserror::Error;

use crate::api::{FetchError, Locale, MedalsClient, TimeoutConfig};
use crate::config::Config;
use crate::coordinator::MedalCoordinator;
use crate::registry::{EntryRegistry, RegistryError};
use crate::sensor::SensorPlatform;
use crate::setup::{AbortReason, ConfigEntry, ConfigFlow, FlowResult, FormError, UserInput};

#[derive(Debug, Error)]
pub enum SetupError {
    /// First refresh of a freshly created entry failed
    #[error("Entry for locale '{locale}' is not ready: {source}")]
    NotReady {
        locale: Locale,
        #[source]
        source: FetchError,
    },

    #[error("Locale '{locale}' is already configured")]
    AlreadyConfigured { locale: Locale },
}

impl From<RegistryError> for SetupError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyConfigured { locale } => SetupError::AlreadyConfigured { locale },
        }
    }
}

/// Result of running the setup flow for one locale.
pub enum ConfigureOutcome {
    Loaded(SensorPlatform),
    Aborted(AbortReason),
    Rejected(FormError),
}

/// Hosts every configured entry of the integration.
pub struct Integration {
    config: Config,
    registry: EntryRegistry,
}

impl Integration {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: EntryRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &EntryRegistry {
        &self.registry
    }

    pub fn config_flow(&self) -> ConfigFlow {
        ConfigFlow::new(self.config.clone(), self.registry.clone())
    }

    /// Runs the setup flow and, on success, sets the new entry up.
    pub async fn configure(&self, locale: Locale) -> Result<ConfigureOutcome, SetupError> {
        match self.config_flow().submit(UserInput { locale }).await {
            FlowResult::CreateEntry(entry) => match self.setup_entry(entry).await {
                Ok(platform) => Ok(ConfigureOutcome::Loaded(platform)),
                // Lost a race with a concurrent setup of the same locale
                Err(SetupError::AlreadyConfigured { .. }) => Ok(ConfigureOutcome::Aborted(AbortReason::AlreadyConfigured)),
                Err(err) => Err(err),
            },
            FlowResult::Abort(reason) => Ok(ConfigureOutcome::Aborted(reason)),
            FlowResult::ShowForm { errors } => Ok(ConfigureOutcome::Rejected(errors.unwrap_or(FormError::Unknown))),
        }
    }

    /// Creates the coordinator, performs the first refresh, registers the
    /// entry, starts periodic refreshes and builds its sensors.
    ///
    /// Nothing is registered if the first refresh fails.
    pub async fn setup_entry(&self, entry: ConfigEntry) -> Result<SensorPlatform, SetupError> {
        let locale = entry.locale;
        if self.registry.contains(locale) {
            return Err(SetupError::AlreadyConfigured { locale });
        }

        let client = MedalsClient::new(&self.config.api, TimeoutConfig::refresh(&self.config.defaults))
            .map_err(|source| SetupError::NotReady { locale, source })?;
        let coordinator = MedalCoordinator::new(locale, client, self.config.update_interval());

        if let Err(source) = coordinator.first_refresh().await {
            coordinator.shutdown().await;
            return Err(SetupError::NotReady { locale, source });
        }

        if let Err(err) = self.registry.insert(entry.clone(), coordinator.clone()) {
            coordinator.shutdown().await;
            return Err(err.into());
        }

        coordinator.start();
        tracing::info!(locale = %locale, title = %entry.title, "Entry set up");
        Ok(SensorPlatform::setup(coordinator, &entry.entry_id))
    }

    /// Stops the entry's refresh task and forgets it.
    ///
    /// Returns false if no entry exists for `locale`.
    pub async fn unload_entry(&self, locale: Locale) -> bool {
        let Some(registered) = self.registry.remove(locale) else {
            return false;
        };
        registered.coordinator.shutdown().await;
        tracing::info!(locale = %locale, "Entry unloaded");
        true
    }

    /// Unloads every entry.
    pub async fn shutdown(&self) {
        for locale in self.registry.locales() {
            self.unload_entry(locale).await;
        }
    }
}
