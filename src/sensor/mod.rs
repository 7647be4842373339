//! Read-only sensors derived from the coordinator's cached payload.
//!
//! Sensors never fetch. Every read takes one snapshot from the coordinator
//! and projects it into a primary value and a flat attribute map.

mod country;
mod event_info;
mod fields;

pub use country::{
    discipline_breakdown, medal_counts, medal_winners, project_country, strip_medal_prefix,
    CountryMedalSensor, MedalCounts, MEDAL_KIND_PREFIX, TOTAL_ENTRY_TYPE,
};
pub use event_info::{project_event_info, EventInfoSensor, EVENT_INFO_NAME};

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::api::MedalPayload;
use crate::coordinator::MedalCoordinator;

pub const ATTR_RANK: &str = "rank";
pub const ATTR_GOLD: &str = "gold";
pub const ATTR_SILVER: &str = "silver";
pub const ATTR_BRONZE: &str = "bronze";
pub const ATTR_TOTAL: &str = "total";
pub const ATTR_COUNTRY_CODE: &str = "country_code";
pub const ATTR_COUNTRY_NAME: &str = "country_name";
pub const ATTR_DISCIPLINES: &str = "disciplines";
pub const ATTR_MEDAL_WINNERS: &str = "medal_winners";
pub const ATTR_TOTAL_EVENTS: &str = "total_events";
pub const ATTR_FINISHED_EVENTS: &str = "finished_events";
pub const ATTR_LAST_UPDATE: &str = "last_update";

pub type AttributeMap = serde_json::Map<String, Value>;

/// Primary value and attributes computed from one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// `None` means unknown.
    pub value: Option<i64>,
    pub attributes: AttributeMap,
}

impl Projection {
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Everything the host needs to display one sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: String,
    pub icon: String,
    pub value: Option<i64>,
    pub available: bool,
    pub attributes: AttributeMap,
}

pub trait Sensor: Send + Sync {
    fn unique_id(&self) -> &str;

    fn name(&self) -> &str;

    fn icon(&self) -> &'static str;

    fn coordinator(&self) -> &MedalCoordinator;

    /// Pure projection of a payload; `None` is an empty cache.
    fn project(&self, payload: Option<&MedalPayload>) -> Projection;

    fn native_value(&self) -> Option<i64> {
        self.project(self.coordinator().snapshot().as_deref()).value
    }

    fn attributes(&self) -> AttributeMap {
        self.project(self.coordinator().snapshot().as_deref()).attributes
    }

    /// False after a failed refresh; the last good value is still shown.
    fn available(&self) -> bool {
        self.coordinator().last_update_success()
    }

    /// Value, attributes and availability from the same cache read.
    fn state(&self) -> SensorState {
        let (snapshot, available) = self.coordinator().snapshot_with_status();
        let projection = self.project(snapshot.as_deref());
        SensorState {
            unique_id: self.unique_id().to_string(),
            name: self.name().to_string(),
            icon: self.icon().to_string(),
            value: projection.value,
            available,
            attributes: projection.attributes,
        }
    }
}

/// Sensors of one configured entry.
///
/// Starts with the event-info sensor and one sensor per country in the
/// cache. [`SensorPlatform::sync`] adds sensors for countries that show up
/// in later refreshes.
pub struct SensorPlatform {
    coordinator: MedalCoordinator,
    entry_id: String,
    known_countries: HashSet<String>,
    sensors: Vec<Arc<dyn Sensor>>,
}

impl SensorPlatform {
    pub fn setup(coordinator: MedalCoordinator, entry_id: &str) -> Self {
        let event_info: Arc<dyn Sensor> = Arc::new(EventInfoSensor::new(coordinator.clone(), entry_id));
        let mut platform = Self {
            coordinator,
            entry_id: entry_id.to_string(),
            known_countries: HashSet::new(),
            sensors: vec![event_info],
        };
        let added = platform.sync();
        tracing::debug!(entry_id, countries = added.len(), "Sensor platform set up");
        platform
    }

    /// Creates sensors for countries not seen before and returns them.
    pub fn sync(&mut self) -> Vec<Arc<dyn Sensor>> {
        let Some(payload) = self.coordinator.snapshot() else {
            return Vec::new();
        };

        let mut added: Vec<Arc<dyn Sensor>> = Vec::new();
        for record in payload.medals_table() {
            let Some(sensor) = CountryMedalSensor::from_record(self.coordinator.clone(), &self.entry_id, record) else {
                tracing::debug!("Skipping medals table record without a country code");
                continue;
            };
            if !self.known_countries.insert(sensor.country_code().to_string()) {
                continue;
            }
            tracing::info!(
                country = sensor.country_code(),
                unique_id = sensor.unique_id(),
                "Adding country sensor"
            );
            let sensor: Arc<dyn Sensor> = Arc::new(sensor);
            self.sensors.push(sensor.clone());
            added.push(sensor);
        }
        added
    }

    pub fn sensors(&self) -> &[Arc<dyn Sensor>] {
        &self.sensors
    }

    pub fn sensor(&self, unique_id: &str) -> Option<Arc<dyn Sensor>> {
        self.sensors.iter().find(|s| s.unique_id() == unique_id).cloned()
    }

    pub fn country_count(&self) -> usize {
        self.known_countries.len()
    }

    pub fn states(&self) -> Vec<SensorState> {
        self.sensors.iter().map(|s| s.state()).collect()
    }

    pub fn coordinator(&self) -> &MedalCoordinator {
        &self.coordinator
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }
}
