pub mod config;
pub mod telemetry;
pub mod time;

pub use config::{LogFormat, RecorderConfig};
pub use telemetry::recorder::LatencyRecorder;
