pub mod batch;
pub mod row;
pub mod telemetry;
pub mod watermark;
