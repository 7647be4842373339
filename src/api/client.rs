use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use tokio::time::timeout;

use crate::api::error::FetchError;
use crate::api::locale::Locale;
use crate::api::payload::MedalPayload;
use crate::config::{ApiConfig, Defaults};

/// Timeouts applied to a single fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Bound on the whole request, body included.
    pub request: Duration,
    pub connect: Duration,
}

impl TimeoutConfig {
    /// Timeouts for the periodic refresh.
    pub fn refresh(defaults: &Defaults) -> Self {
        Self {
            request: Duration::from_secs(u64::from(defaults.timeout_seconds)),
            connect: Duration::from_secs(u64::from(defaults.connect_timeout_seconds)),
        }
    }

    /// Timeouts for the one-shot setup probe.
    pub fn probe(defaults: &Defaults) -> Self {
        let request = Duration::from_secs(u64::from(defaults.probe_timeout_seconds));
        let connect = Duration::from_secs(u64::from(defaults.connect_timeout_seconds));
        Self {
            request,
            connect: connect.min(request),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::refresh(&Defaults::default())
    }
}

/// HTTP client for the medal standings endpoint.
///
/// One attempt per call: retry policy belongs to whoever schedules fetches.
#[derive(Debug, Clone)]
pub struct MedalsClient {
    client: Client,
    base_url: String,
    endpoint: String,
    user_agent: String,
    accept_language: String,
    timeouts: TimeoutConfig,
}

impl MedalsClient {
    pub fn new(api: &ApiConfig, timeouts: TimeoutConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| FetchError::ClientInit { source: e })?;

        Ok(Self {
            client,
            base_url: api.base_url.trim().trim_end_matches('/').to_string(),
            endpoint: api.endpoint.trim().trim_matches('/').to_string(),
            user_agent: api.user_agent.clone(),
            accept_language: api.accept_language.clone(),
            timeouts,
        })
    }

    /// `{base_url}/{locale}/{endpoint}`
    pub fn url(&self, locale: Locale) -> String {
        format!("{}/{}/{}", self.base_url, locale.code(), self.endpoint)
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Fetches and validates the standings for `locale`.
    pub async fn fetch(&self, locale: Locale) -> Result<MedalPayload, FetchError> {
        let url = self.url(locale);
        tracing::debug!(%url, "Fetching medal standings");

        match timeout(self.timeouts.request, self.do_fetch(&url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                duration: self.timeouts.request.as_secs(),
            }),
        }
    }

    async fn do_fetch(&self, url: &str) -> Result<MedalPayload, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        MedalPayload::from_slice(&body)
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                duration: self.timeouts.request.as_secs(),
            }
        } else {
            FetchError::Transport { source: err }
        }
    }
}
