use serde_json::Value;

use crate::api::MedalPayload;
use crate::coordinator::MedalCoordinator;
use crate::sensor::fields::{int_field, raw_field};
use crate::sensor::{
    AttributeMap, Projection, Sensor, ATTR_FINISHED_EVENTS, ATTR_LAST_UPDATE, ATTR_TOTAL_EVENTS,
};

pub const EVENT_INFO_NAME: &str = "Milano Cortina 2026 Event Info";

/// Finished-event count plus overall progress of the Games.
pub struct EventInfoSensor {
    coordinator: MedalCoordinator,
    unique_id: String,
}

impl EventInfoSensor {
    pub fn new(coordinator: MedalCoordinator, entry_id: &str) -> Self {
        Self {
            coordinator,
            unique_id: format!("{}_event_info", entry_id),
        }
    }
}

impl Sensor for EventInfoSensor {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        EVENT_INFO_NAME
    }

    fn icon(&self) -> &'static str {
        "mdi:information"
    }

    fn coordinator(&self) -> &MedalCoordinator {
        &self.coordinator
    }

    fn project(&self, payload: Option<&MedalPayload>) -> Projection {
        project_event_info(payload)
    }
}

pub fn project_event_info(payload: Option<&MedalPayload>) -> Projection {
    let Some(payload) = payload else {
        return Projection::unknown();
    };

    let info = payload.event_info().unwrap_or(&Value::Null);

    let mut attributes = AttributeMap::new();
    attributes.insert(ATTR_TOTAL_EVENTS.to_string(), raw_field(info, "totalEvents"));
    attributes.insert(ATTR_FINISHED_EVENTS.to_string(), raw_field(info, "finishedEvents"));
    attributes.insert(ATTR_LAST_UPDATE.to_string(), raw_field(info, "dateTime"));

    Projection {
        value: int_field(info, "finishedEvents"),
        attributes,
    }
}
