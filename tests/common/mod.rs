//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_upstream;

use cortina_medals::api::{Locale, MedalsClient, TimeoutConfig};
use cortina_medals::config::{ApiConfig, Config, Defaults};
use cortina_medals::coordinator::{CoordinatorEvent, MedalCoordinator};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;

pub use mock_upstream::{CapturedRequest, MockResponse, MockUpstream};

pub const FIXTURE: &str = include_str!("../fixtures/medals_two_countries.json");

/// Find an available port for testing.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// Config pointing at `base_url` with short timeouts.
pub fn test_config(base_url: &str, update_interval_seconds: u64) -> Config {
    Config {
        defaults: Defaults {
            locale: Locale::English,
            update_interval_seconds,
            timeout_seconds: 2,
            connect_timeout_seconds: 1,
            probe_timeout_seconds: 2,
        },
        api: ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        },
    }
}

/// Coordinator for `locale` backed by `config`, not yet refreshed.
pub fn coordinator(config: &Config, locale: Locale) -> MedalCoordinator {
    let client = MedalsClient::new(&config.api, TimeoutConfig::refresh(&config.defaults))
        .expect("Failed to build client");
    MedalCoordinator::new(locale, client, config.update_interval())
}

/// Create a temporary config file with the given contents.
pub fn temp_config_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

pub fn fixture_value() -> Value {
    serde_json::from_str(FIXTURE).expect("fixture is valid JSON")
}

/// Fixture with one more country appended to the medals table.
pub fn fixture_with_country(code: &str, name: &str, gold: i64, silver: i64, bronze: i64) -> String {
    let mut value = fixture_value();
    let table = value["medalStandings"]["medalsTable"]
        .as_array_mut()
        .expect("fixture has a medals table");
    let rank = table.len() + 1;
    table.push(json!({
        "organisation": code,
        "description": name,
        "rank": rank,
        "medalsNumber": [
            { "type": "Total", "gold": gold, "silver": silver, "bronze": bronze, "total": gold + silver + bronze }
        ],
        "disciplines": []
    }));
    value.to_string()
}

/// Fixture with the "Total" gold count of `code` replaced.
pub fn fixture_with_gold(code: &str, gold: i64) -> String {
    let mut value = fixture_value();
    let table = value["medalStandings"]["medalsTable"]
        .as_array_mut()
        .expect("fixture has a medals table");
    for country in table.iter_mut() {
        if country["organisation"] == code {
            for entry in country["medalsNumber"].as_array_mut().unwrap() {
                if entry["type"] == "Total" {
                    entry["gold"] = json!(gold);
                }
            }
        }
    }
    value.to_string()
}

/// Next coordinator event, failing the test after `timeout`.
pub async fn next_event(events: &mut broadcast::Receiver<CoordinatorEvent>, timeout: Duration) -> CoordinatorEvent {
    tokio::time::timeout(timeout, events.recv())
        .await
        .expect("Timed out waiting for coordinator event")
        .expect("Coordinator event channel closed")
}
