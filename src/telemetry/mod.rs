//! Telemetry module for logging, metrics and packet traces.
//!
//! Provides:
//! - Logging configuration and initialization
//! - Verdict counters
//! - Non-blocking trace sinks

mod logging;
mod metrics;
mod trace;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use metrics::{Counter, FilterMetrics};
pub use trace::{ChannelSink, NullSink, TraceRecord, TraceSink, TracingSink};
