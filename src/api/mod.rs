//! Client for the Milano Cortina 2026 medal standings API.
//!
//! One call builds `{base_url}/{locale}/{endpoint}`, issues a single GET
//! bounded by a timeout and returns a validated [`MedalPayload`].

mod client;
mod error;
mod locale;
mod payload;

pub use client::{MedalsClient, TimeoutConfig};
pub use error::{FailureKind, FetchError};
pub use locale::{Locale, LocaleError};
pub use payload::{validate_payload, MedalPayload, MEDAL_STANDINGS_KEY};
