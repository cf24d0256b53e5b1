pub mod paths;
pub mod telemetry;
