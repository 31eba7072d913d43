//! Configuration types

use crate::telemetry::LogConfig;
use serde::Deserialize;
use std::net::Ipv4Addr;

/// Runtime record the rule evaluator consults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// Address this filter treats as "this host"
    pub local_address: Ipv4Addr,
}

impl Configuration {
    pub fn new(local_address: Ipv4Addr) -> Self {
        Self { local_address }
    }
}

/// User-defined configuration file (config.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub local_address: Option<Ipv4Addr>,
    #[serde(default)]
    pub logging: LogConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

impl Config {
    /// Runtime record, if a local address is configured
    pub fn configuration(&self) -> Option<Configuration> {
        self.local_address.map(Configuration::new)
    }
}

/// Trace record delivery settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_enabled")]
    pub enabled: bool,
    /// Records buffered before new ones are discarded
    #[serde(default = "default_trace_capacity")]
    pub capacity: usize,
}

fn default_trace_enabled() -> bool {
    true
}

fn default_trace_capacity() -> usize {
    1024
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: default_trace_enabled(),
            capacity: default_trace_capacity(),
        }
    }
}
