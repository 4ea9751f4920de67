use chrono::{DateTime, Utc};
use connectors::sql::base::query::{
    COL_ACCEL_MAGNITUDE, COL_ALTITUDE, COL_ANOMALY, COL_BAROMETER, COL_BATTERY, COL_DEVICE_ID,
    COL_ENQUEUED_TIME, COL_GYRO_MAGNITUDE, COL_LATITUDE, COL_LONGITUDE, COL_MAG_MAGNITUDE,
};
use model::records::{batch::Batch, row::RowData, telemetry::TelemetryRecord};

pub mod coerce;

use coerce::{coerce_anomaly, coerce_device_id, coerce_number, coerce_timestamp};

/// Maps a raw row to a record, stamping rows without a readable event time
/// with `now`.
pub fn transform_at(row: &RowData, now: DateTime<Utc>) -> TelemetryRecord {
    let number = |column: &str| coerce_number(&row.get_value(column));

    TelemetryRecord {
        device_id: coerce_device_id(&row.get_value(COL_DEVICE_ID)),
        enqueued_time: coerce_timestamp(&row.get_value(COL_ENQUEUED_TIME), now),
        battery: number(COL_BATTERY),
        barometer: number(COL_BAROMETER),
        latitude: number(COL_LATITUDE),
        longitude: number(COL_LONGITUDE),
        altitude: number(COL_ALTITUDE),
        accel_magnitude: number(COL_ACCEL_MAGNITUDE),
        gyro_magnitude: number(COL_GYRO_MAGNITUDE),
        mag_magnitude: number(COL_MAG_MAGNITUDE),
        anomaly: coerce_anomaly(&row.get_value(COL_ANOMALY)),
    }
}

pub fn transform(row: &RowData) -> TelemetryRecord {
    transform_at(row, Utc::now())
}

/// Transforms a page of rows with a single shared `now`.
pub fn transform_rows(rows: &[RowData], now: DateTime<Utc>) -> Batch {
    rows.iter().map(|row| transform_at(row, now)).collect()
}
