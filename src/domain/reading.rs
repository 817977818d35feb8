// Sensor reading domain model
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Fields probed, in order, for a reading's timestamp.
const TIMESTAMP_FIELDS: [&str; 3] = ["created_at", "timestamp", "time"];

/// Naive (zone-less) layouts the backend emits; interpreted as UTC.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    #[serde(alias = "temp")]
    Temperature,
    Humidity,
    #[serde(alias = "ph_value")]
    Ph,
    Salinity,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Ph,
        Metric::Salinity,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Ph => "ph",
            Metric::Salinity => "salinity",
        }
    }

    /// Legacy field names older firmware used for the same quantity.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Metric::Temperature => &["temp"],
            Metric::Humidity => &["humidity"],
            Metric::Ph => &["ph_value"],
            Metric::Salinity => &["salinity"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Ph => "pH",
            Metric::Salinity => "Salinity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Ph => "pH",
            Metric::Salinity => "ppm",
        }
    }

    fn slot(self) -> usize {
        match self {
            Metric::Temperature => 0,
            Metric::Humidity => 1,
            Metric::Ph => 2,
            Metric::Salinity => 3,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a record keeps its metric values. Classified once at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadShape {
    /// Metric fields sit directly on the record.
    Flat,
    /// Metric fields live under `raw_data`.
    Nested,
    /// Some metrics resolved at top level, others under `raw_data`.
    Mixed,
    /// No recognised metric field at all.
    Empty,
}

/// One decoded sensor sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub shape: PayloadShape,
    values: [Option<f64>; 4],
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            shape: PayloadShape::Empty,
            values: [None; 4],
        }
    }

    pub fn with_value(mut self, metric: Metric, value: f64) -> Self {
        self.values[metric.slot()] = Some(value).filter(|v| v.is_finite());
        self
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values[metric.slot()]
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Decode a single upstream record.
    ///
    /// Returns `None` when the record is not an object or carries no
    /// parseable timestamp. Metric values resolve through the chain
    /// top-level key, `raw_data[key]`, then the legacy aliases (top level
    /// first, then `raw_data`). Values that are not finite numbers are absent.
    pub fn decode(record: &Value) -> Option<Self> {
        let fields = record.as_object()?;
        let timestamp = TIMESTAMP_FIELDS
            .iter()
            .find_map(|name| fields.get(*name).filter(|v| !v.is_null()))
            .and_then(parse_timestamp)?;
        let raw = fields.get("raw_data").and_then(Value::as_object);

        let mut reading = Reading::new(timestamp);
        let (mut top_level, mut nested) = (false, false);
        for metric in Metric::ALL {
            if let Some((value, source)) = resolve_metric(fields, raw, metric) {
                reading.values[metric.slot()] = Some(value);
                match source {
                    Source::TopLevel => top_level = true,
                    Source::RawData => nested = true,
                }
            }
        }
        reading.shape = match (top_level, nested) {
            (true, true) => PayloadShape::Mixed,
            (true, false) => PayloadShape::Flat,
            (false, true) => PayloadShape::Nested,
            (false, false) => PayloadShape::Empty,
        };
        Some(reading)
    }
}

/// Decode an upstream readings payload. Anything other than a JSON array
/// yields no readings; undecodable records are skipped.
pub fn decode_readings(payload: &Value) -> Vec<Reading> {
    let Some(records) = payload.as_array() else {
        tracing::debug!("Readings payload is not an array, ignoring it");
        return Vec::new();
    };

    let readings: Vec<Reading> = records.iter().filter_map(Reading::decode).collect();
    let skipped = records.len() - readings.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} readings without a usable timestamp", skipped);
    }
    readings
}

#[derive(Debug, Clone, Copy)]
enum Source {
    TopLevel,
    RawData,
}

fn resolve_metric(
    fields: &Map<String, Value>,
    raw: Option<&Map<String, Value>>,
    metric: Metric,
) -> Option<(f64, Source)> {
    let lookup = |name: &str| {
        fields
            .get(name)
            .and_then(parse_number)
            .map(|v| (v, Source::TopLevel))
            .or_else(|| {
                raw.and_then(|r| r.get(name))
                    .and_then(parse_number)
                    .map(|v| (v, Source::RawData))
            })
    };

    lookup(metric.key()).or_else(|| metric.aliases().iter().find_map(|alias| lookup(*alias)))
}

fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Parse a timestamp given as an RFC 3339 string, a naive ISO-8601 string
/// (taken as UTC) or a number of epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

/// Serde helper for optional upstream datetimes, which may lack a zone.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_flat_record() {
        let reading = Reading::decode(&json!({
            "created_at": "2024-05-01T10:00:00",
            "temperature": 21.5,
            "humidity": 40,
            "ph": "6.8",
        }))
        .unwrap();

        assert_eq!(reading.shape, PayloadShape::Flat);
        assert_eq!(reading.value(Metric::Temperature), Some(21.5));
        assert_eq!(reading.value(Metric::Humidity), Some(40.0));
        assert_eq!(reading.value(Metric::Ph), Some(6.8));
        assert_eq!(reading.value(Metric::Salinity), None);
        assert_eq!(reading.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_decode_nested_record() {
        let reading = Reading::decode(&json!({
            "timestamp": "2024-05-01T10:00:00Z",
            "temperature": null,
            "raw_data": { "temperature": 19.0, "salinity": 310 },
        }))
        .unwrap();

        assert_eq!(reading.shape, PayloadShape::Nested);
        assert_eq!(reading.value(Metric::Temperature), Some(19.0));
        assert_eq!(reading.value(Metric::Salinity), Some(310.0));
    }

    #[test]
    fn test_top_level_wins_over_raw_data() {
        let reading = Reading::decode(&json!({
            "time": 1_714_557_600_000i64,
            "temperature": 20.0,
            "raw_data": { "temperature": 99.0, "humidity": 55 },
        }))
        .unwrap();

        assert_eq!(reading.shape, PayloadShape::Mixed);
        assert_eq!(reading.value(Metric::Temperature), Some(20.0));
        assert_eq!(reading.value(Metric::Humidity), Some(55.0));
        assert_eq!(reading.timestamp_ms(), 1_714_557_600_000);
    }

    #[test]
    fn test_legacy_aliases() {
        let reading = Reading::decode(&json!({
            "created_at": "2024-05-01 10:00:00.250",
            "temp": 18.25,
            "raw_data": { "ph_value": 7.1 },
        }))
        .unwrap();

        assert_eq!(reading.value(Metric::Temperature), Some(18.25));
        assert_eq!(reading.value(Metric::Ph), Some(7.1));
    }

    #[test]
    fn test_unparseable_values_are_absent() {
        let reading = Reading::decode(&json!({
            "created_at": "2024-05-01T10:00:00",
            "temperature": "warm",
            "humidity": true,
            "salinity": "",
        }))
        .unwrap();

        assert_eq!(reading.shape, PayloadShape::Empty);
        for metric in Metric::ALL {
            assert_eq!(reading.value(metric), None);
        }
    }

    #[test]
    fn test_record_without_timestamp_is_discarded() {
        assert!(Reading::decode(&json!({ "temperature": 20.0 })).is_none());
        assert!(Reading::decode(&json!({ "created_at": "yesterday", "temperature": 20.0 })).is_none());
        assert!(Reading::decode(&json!(42)).is_none());
    }

    #[test]
    fn test_first_present_timestamp_field_is_used() {
        // created_at is present but broken, so the record is dropped
        // rather than falling through to `time`.
        let record = json!({ "created_at": "nope", "time": "2024-05-01T10:00:00Z" });
        assert!(Reading::decode(&record).is_none());

        let record = json!({ "created_at": null, "time": "2024-05-01T10:00:00Z" });
        assert!(Reading::decode(&record).is_some());
    }

    #[test]
    fn test_decode_readings_tolerates_bad_payloads() {
        assert!(decode_readings(&json!({ "detail": "oops" })).is_empty());

        let readings = decode_readings(&json!([
            { "created_at": "2024-05-01T10:00:00", "temperature": 20 },
            { "temperature": 21 },
            "garbage",
        ]));
        assert_eq!(readings.len(), 1);
    }

    #[test]
    fn test_metric_deserialize_aliases() {
        let metric: Metric = serde_json::from_value(json!("temp")).unwrap();
        assert_eq!(metric, Metric::Temperature);
        let metric: Metric = serde_json::from_value(json!("ph")).unwrap();
        assert_eq!(metric, Metric::Ph);
    }
}
