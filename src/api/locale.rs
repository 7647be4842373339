use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language of the medal standings feed.
///
/// Selected once when an entry is configured; also the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "ENG")]
    English,
    #[serde(rename = "FRA")]
    French,
}

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("Unknown locale '{0}' (expected one of: ENG, FRA)")]
    Unknown(String),
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::English, Locale::French];

    /// Code used in the request path and the registry.
    pub fn code(self) -> &'static str {
        match self {
            Locale::English => "ENG",
            Locale::French => "FRA",
        }
    }

    /// Label shown next to the code in the setup form.
    pub fn label(self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::French => "Français",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LocaleError::Unknown(trimmed.to_string()))
    }
}
