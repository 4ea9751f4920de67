use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized telemetry record as delivered to the sink.
///
/// Serialized with camelCase field names; `enqueuedTime` is always UTC with
/// millisecond precision (`2024-01-02T03:04:05.000Z`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    pub device_id: String,
    #[serde(with = "millis")]
    pub enqueued_time: DateTime<Utc>,
    pub battery: f64,
    pub barometer: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub accel_magnitude: f64,
    pub gyro_magnitude: f64,
    pub mag_magnitude: f64,
    pub anomaly: f64,
}

mod millis {
    use crate::core::time;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time::format_millis(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        time::parse_utc(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn serializes_with_camel_case_and_millis() {
        let record = TelemetryRecord {
            device_id: "dev-1".into(),
            enqueued_time: Utc
                .with_ymd_and_hms(2024, 3, 4, 5, 6, 7)
                .unwrap()
                .with_nanosecond(89_000_000)
                .unwrap(),
            battery: 87.5,
            barometer: 1013.2,
            latitude: 47.6,
            longitude: -122.3,
            altitude: 12.0,
            accel_magnitude: 1.0,
            gyro_magnitude: 0.1,
            mag_magnitude: 42.0,
            anomaly: 1.0,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["deviceId"], "dev-1");
        assert_eq!(json["enqueuedTime"], "2024-03-04T05:06:07.089Z");
        assert_eq!(json["accelMagnitude"], 1.0);
        assert_eq!(json["gyroMagnitude"], 0.1);
        assert_eq!(json["magMagnitude"], 42.0);
        assert_eq!(json["anomaly"], 1.0);
        assert_eq!(json.as_object().unwrap().len(), 11);
    }
}
