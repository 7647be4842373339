use serde_json::{json, Value};

use crate::api::MedalPayload;
use crate::coordinator::MedalCoordinator;
use crate::sensor::fields::{count_field, list_field, raw_field, str_field};
use crate::sensor::{
    AttributeMap, Projection, Sensor, ATTR_BRONZE, ATTR_COUNTRY_CODE, ATTR_COUNTRY_NAME,
    ATTR_DISCIPLINES, ATTR_GOLD, ATTR_MEDAL_WINNERS, ATTR_RANK, ATTR_SILVER, ATTR_TOTAL,
};

/// Label of the `medalsNumber` entry that sums all medal types.
pub const TOTAL_ENTRY_TYPE: &str = "Total";

/// Prefix the API puts in front of medal kinds (`ME_GOLD`).
pub const MEDAL_KIND_PREFIX: &str = "ME_";

/// Medal count of one country, identified by its code.
pub struct CountryMedalSensor {
    coordinator: MedalCoordinator,
    country_code: String,
    name: String,
    unique_id: String,
}

impl CountryMedalSensor {
    pub fn new(coordinator: MedalCoordinator, entry_id: &str, country_code: &str, country_name: Option<&str>) -> Self {
        let name = format!("{} Medals", country_name.unwrap_or(country_code));
        Self {
            coordinator,
            country_code: country_code.to_string(),
            name,
            unique_id: format!("{}_{}_medals", entry_id, country_code),
        }
    }

    /// Builds a sensor from a `medalsTable` record.
    ///
    /// Returns `None` when the record has no string `organisation` code.
    pub fn from_record(coordinator: MedalCoordinator, entry_id: &str, record: &Value) -> Option<Self> {
        let code = str_field(record, "organisation")?;
        Some(Self::new(coordinator, entry_id, code, str_field(record, "description")))
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

impl Sensor for CountryMedalSensor {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &'static str {
        "mdi:medal"
    }

    fn coordinator(&self) -> &MedalCoordinator {
        &self.coordinator
    }

    fn project(&self, payload: Option<&MedalPayload>) -> Projection {
        project_country(payload, &self.country_code)
    }
}

/// Gold, silver and bronze counts of one "Total" entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MedalCounts {
    pub gold: i64,
    pub silver: i64,
    pub bronze: i64,
}

impl MedalCounts {
    /// Computed sum, clamped at `i64::MAX`; the total reported by the API
    /// is ignored.
    pub fn total(&self) -> i64 {
        self.gold.saturating_add(self.silver).saturating_add(self.bronze)
    }
}

/// Counts from the country's "Total" entry, all zero if there is none.
pub fn medal_counts(country: &Value) -> MedalCounts {
    list_field(country, "medalsNumber")
        .iter()
        .find(|entry| str_field(entry, "type") == Some(TOTAL_ENTRY_TYPE))
        .map(|entry| MedalCounts {
            gold: count_field(entry, "gold"),
            silver: count_field(entry, "silver"),
            bronze: count_field(entry, "bronze"),
        })
        .unwrap_or_default()
}

pub fn strip_medal_prefix(kind: &str) -> &str {
    kind.strip_prefix(MEDAL_KIND_PREFIX).unwrap_or(kind)
}

pub fn discipline_breakdown(country: &Value) -> Vec<Value> {
    list_field(country, "disciplines")
        .iter()
        .map(|discipline| {
            json!({
                "code": raw_field(discipline, "code"),
                "name": raw_field(discipline, "name"),
                "gold": count_field(discipline, "gold"),
                "silver": count_field(discipline, "silver"),
                "bronze": count_field(discipline, "bronze"),
                "total": count_field(discipline, "total"),
            })
        })
        .collect()
}

/// Every medal-winning performance, across all disciplines, in feed order.
pub fn medal_winners(country: &Value) -> Vec<Value> {
    list_field(country, "disciplines")
        .iter()
        .flat_map(|discipline| {
            let discipline_name = raw_field(discipline, "name");
            list_field(discipline, "medalWinners").iter().map(move |winner| {
                let medal = str_field(winner, "medalType").map(strip_medal_prefix).unwrap_or("");
                json!({
                    "athlete": raw_field(winner, "competitorDisplayName"),
                    "discipline": discipline_name.clone(),
                    "event": raw_field(winner, "eventDescription"),
                    "medal": medal,
                    "date": raw_field(winner, "date"),
                    "gender": raw_field(winner, "eventCategory"),
                })
            })
        })
        .collect()
}

pub fn project_country(payload: Option<&MedalPayload>, country_code: &str) -> Projection {
    let Some(country) = payload.and_then(|p| p.country(country_code)) else {
        return Projection::unknown();
    };

    let counts = medal_counts(country);

    let mut attributes = AttributeMap::new();
    attributes.insert(ATTR_RANK.to_string(), raw_field(country, "rank"));
    attributes.insert(ATTR_COUNTRY_CODE.to_string(), raw_field(country, "organisation"));
    attributes.insert(ATTR_COUNTRY_NAME.to_string(), raw_field(country, "description"));
    attributes.insert(ATTR_GOLD.to_string(), json!(counts.gold));
    attributes.insert(ATTR_SILVER.to_string(), json!(counts.silver));
    attributes.insert(ATTR_BRONZE.to_string(), json!(counts.bronze));
    attributes.insert(ATTR_TOTAL.to_string(), json!(counts.total()));
    attributes.insert(ATTR_DISCIPLINES.to_string(), Value::Array(discipline_breakdown(country)));
    attributes.insert(ATTR_MEDAL_WINNERS.to_string(), Value::Array(medal_winners(country)));

    Projection {
        value: Some(counts.total()),
        attributes,
    }
}
