// Sensor device domain model
use super::reading::deserialize_optional_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDevice {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SensorDevice {
    pub fn status(&self) -> &'static str {
        if self.is_active { "active" } else { "inactive" }
    }
}
