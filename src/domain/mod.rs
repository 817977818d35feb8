// Domain layer - Sensor readings and chart models, no I/O
pub mod dashboard;
pub mod device;
pub mod reading;
pub mod telemetry;
pub mod time_window;
