//! Configuration validation

use super::Config;
use crate::telemetry::LogLevel;

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn print_diagnostics(&self) {
        for warning in &self.warnings {
            println!("[WARN] {}", warning);
        }
        for error in &self.errors {
            println!("[ERROR] {}", error);
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate configuration and return warnings/errors
pub fn validate(config: &Config) -> ValidationResult {
    let mut result = ValidationResult::new();

    validate_local_address(config, &mut result);
    validate_logging(config, &mut result);
    validate_trace(config, &mut result);

    result
}

fn validate_local_address(config: &Config, result: &mut ValidationResult) {
    let Some(addr) = config.local_address else {
        result.warn("local_address not specified, frames addressed past the SSH rule will abort");
        return;
    };

    if addr.is_unspecified() {
        result.error(format!("local_address: {} is unspecified", addr));
    } else if addr.is_broadcast() {
        result.error(format!("local_address: {} is the broadcast address", addr));
    } else if addr.is_multicast() {
        result.error(format!("local_address: {} is a multicast address", addr));
    } else if addr.is_loopback() {
        result.warn(format!(
            "local_address: {} is a loopback address, only loopback traffic will be policed",
            addr
        ));
    }
}

fn validate_logging(config: &Config, result: &mut ValidationResult) {
    // Trace records are logged at info
    if config.trace.enabled && config.logging.level < LogLevel::Info {
        result.warn(format!(
            "logging.level: {} hides trace records, set info or noisier, or disable [trace]",
            config.logging.level
        ));
    }
}

fn validate_trace(config: &Config, result: &mut ValidationResult) {
    if config.trace.enabled && config.trace.capacity == 0 {
        result.error("trace.capacity: must be greater than 0 when tracing is enabled");
    }
}
