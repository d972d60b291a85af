//! Server Configuration

use std::time::Duration;

use crate::protocol::DEFAULT_MAX_LINE_LENGTH;
use crate::storage::{DEFAULT_SWEEP_INTERVAL, MIN_SWEEP_INTERVAL};

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub bind: String,

    /// Port number
    pub port: u16,

    /// Pause between two expiration sweeps
    pub sweep_interval: Duration,

    /// Longest accepted request line in bytes
    pub max_line_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 6380,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl Config {
    /// Create a new config with custom port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Create a new config with custom bind address
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Set the expiration sweep interval, raised to at least
    /// `MIN_SWEEP_INTERVAL`
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(MIN_SWEEP_INTERVAL);
        self
    }

    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// `bind:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
