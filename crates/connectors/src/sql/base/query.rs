use crate::sql::base::dialect::Dialect;
use model::pagination::offset::PageRequest;

pub const COL_DEVICE_ID: &str = "deviceId";
pub const COL_ENQUEUED_TIME: &str = "enqueuedTime";
pub const COL_BATTERY: &str = "battery";
pub const COL_BAROMETER: &str = "barometer";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_ALTITUDE: &str = "altitude";
pub const COL_ACCEL_MAGNITUDE: &str = "AccelMagnitude";
pub const COL_GYRO_MAGNITUDE: &str = "GyroMagnitude";
pub const COL_MAG_MAGNITUDE: &str = "MagMagnitude";
pub const COL_ANOMALY: &str = "Anomaly";

/// Columns read from the source table, in select order.
pub const TELEMETRY_COLUMNS: [&str; 11] = [
    COL_DEVICE_ID,
    COL_ENQUEUED_TIME,
    COL_BATTERY,
    COL_BAROMETER,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_ALTITUDE,
    COL_ACCEL_MAGNITUDE,
    COL_GYRO_MAGNITUDE,
    COL_MAG_MAGNITUDE,
    COL_ANOMALY,
];

/// Renders the three telemetry queries for a dialect.
pub struct QueryGenerator<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn count(&self, table: &str) -> String {
        format!("SELECT COUNT(*) FROM {}", self.dialect.quote_identifier(table))
    }

    /// Rows strictly newer than the bound watermark, oldest first.
    pub fn select_since(&self, table: &str) -> String {
        let ts = self.dialect.quote_identifier(COL_ENQUEUED_TIME);
        format!(
            "SELECT {} FROM {} WHERE {ts} > {} ORDER BY {ts} ASC",
            self.select_list(),
            self.dialect.quote_identifier(table),
            self.dialect.timestamp_placeholder(0),
        )
    }

    /// One page of the full table, oldest first.
    pub fn select_page(&self, table: &str, page: PageRequest) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {} ASC LIMIT {} OFFSET {}",
            self.select_list(),
            self.dialect.quote_identifier(table),
            self.dialect.quote_identifier(COL_ENQUEUED_TIME),
            page.limit,
            page.offset,
        )
    }

    fn select_list(&self) -> String {
        TELEMETRY_COLUMNS
            .iter()
            .map(|col| self.dialect.quote_identifier(col))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::base::dialect::Postgres;

    #[test]
    fn renders_incremental_query() {
        let dialect = Postgres;
        let sql = QueryGenerator::new(&dialect).select_since("telemetry");
        assert!(sql.starts_with(r#"SELECT "deviceId", "enqueuedTime", "battery""#));
        assert!(sql.contains(r#"FROM "telemetry" WHERE "enqueuedTime" > $1::text::timestamptz"#));
        assert!(sql.ends_with(r#"ORDER BY "enqueuedTime" ASC"#));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn renders_page_query() {
        let dialect = Postgres;
        let sql = QueryGenerator::new(&dialect).select_page(
            "telemetry",
            PageRequest {
                offset: 1000,
                limit: 500,
            },
        );
        assert!(sql.ends_with(r#"ORDER BY "enqueuedTime" ASC LIMIT 500 OFFSET 1000"#));
        assert!(sql.contains(r#""AccelMagnitude", "GyroMagnitude", "MagMagnitude", "Anomaly""#));
    }

    #[test]
    fn renders_count_query() {
        let dialect = Postgres;
        assert_eq!(
            QueryGenerator::new(&dialect).count("iot.telemetry"),
            r#"SELECT COUNT(*) FROM "iot"."telemetry""#
        );
    }
}
