//! Configuration flow for a new entry.
//!
//! The user picks a locale; the flow rejects locales that are already
//! configured, probes the API once and either creates an entry or reports
//! one of the `cannot_connect`, `invalid_data` or `unknown` errors.

use serde::{Deserialize, Serialize};

use crate::api::{FailureKind, FetchError, Locale, MedalPayload, MedalsClient, TimeoutConfig};
use crate::config::Config;
use crate::registry::EntryRegistry;

pub const CONF_LOCALE: &str = "locale";

/// A configured instance of the integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub title: String,
    pub locale: Locale,
}

impl ConfigEntry {
    pub fn new(locale: Locale) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().simple().to_string(),
            title: format!("Milano Cortina 2026 ({})", locale),
            locale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserInput {
    pub locale: Locale,
}

/// Error shown on the setup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormError {
    CannotConnect,
    InvalidData,
    Unknown,
}

impl FormError {
    pub fn as_str(self) -> &'static str {
        match self {
            FormError::CannotConnect => "cannot_connect",
            FormError::InvalidData => "invalid_data",
            FormError::Unknown => "unknown",
        }
    }
}

impl From<FailureKind> for FormError {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::ConnectionFailure => FormError::CannotConnect,
            FailureKind::InvalidResponseShape => FormError::InvalidData,
            FailureKind::Unknown => FormError::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    AlreadyConfigured,
}

impl AbortReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AbortReason::AlreadyConfigured => "already_configured",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowResult {
    CreateEntry(ConfigEntry),
    Abort(AbortReason),
    ShowForm { errors: Option<FormError> },
}

/// The single `locale` field of the setup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    pub field: &'static str,
    pub default: Locale,
    pub choices: Vec<(Locale, &'static str)>,
}

pub struct ConfigFlow {
    config: Config,
    registry: EntryRegistry,
}

impl ConfigFlow {
    pub fn new(config: Config, registry: EntryRegistry) -> Self {
        Self { config, registry }
    }

    pub fn form_schema(&self) -> FormSchema {
        FormSchema {
            field: CONF_LOCALE,
            default: self.config.defaults.locale,
            choices: Locale::ALL.iter().map(|l| (*l, l.label())).collect(),
        }
    }

    /// Handles the user step. `None` shows the empty form.
    pub async fn step_user(&self, input: Option<UserInput>) -> FlowResult {
        let Some(input) = input else {
            return FlowResult::ShowForm { errors: None };
        };

        if self.registry.contains(input.locale) {
            tracing::info!(locale = %input.locale, "Locale already configured");
            return FlowResult::Abort(AbortReason::AlreadyConfigured);
        }

        match self.probe(input.locale).await {
            Ok(_) => FlowResult::CreateEntry(ConfigEntry::new(input.locale)),
            Err(err) => {
                let form_error = FormError::from(err.kind());
                if form_error == FormError::Unknown {
                    tracing::error!(locale = %input.locale, error = %err, "Unexpected exception during setup");
                } else {
                    tracing::warn!(locale = %input.locale, error = %err, "Setup probe failed");
                }
                FlowResult::ShowForm {
                    errors: Some(form_error),
                }
            }
        }
    }

    /// Submits the form with a chosen locale.
    pub async fn submit(&self, input: UserInput) -> FlowResult {
        self.step_user(Some(input)).await
    }

    /// One fetch with the probe timeout.
    pub async fn probe(&self, locale: Locale) -> Result<MedalPayload, FetchError> {
        let client = MedalsClient::new(&self.config.api, TimeoutConfig::probe(&self.config.defaults))?;
        client.fetch(locale).await
    }
}
