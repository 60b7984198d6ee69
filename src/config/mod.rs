//! Configuration management
//!
//! Handles loading and validation of gateway configuration from TOML files,
//! with programmatic overrides for embedding applications.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::tracking::Viewport;

/// Conventional UDP port trackers deliver on.
pub const DEFAULT_TRACKING_PORT: u16 = 3333;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,
    /// Viewport configuration
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Event sink configuration
    #[serde(default)]
    pub sink: SinkConfig,
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// UDP endpoint the tracker delivers to
    pub listen_addr: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_TRACKING_PORT),
        }
    }
}

/// Viewport extent snapshot used for coordinate projection.
///
/// Captured once at gateway construction; runtime resizing is not supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            width: 1920,
            height: 1080,
        }
    }
}

/// Event sink configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Maximum queued events before appends fail fast.
    /// `None` leaves the sink unbounded.
    pub capacity: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config {
            transport: TransportConfig::default(),
            viewport: ViewportConfig::default(),
            sink: SinkConfig::default(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.transport
            .listen_addr
            .parse::<SocketAddr>()
            .context("Invalid listen address")?;

        if self.viewport.width == 0 || self.viewport.height == 0 {
            anyhow::bail!(
                "Viewport must be non-zero: {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }

        if self.sink.capacity == Some(0) {
            anyhow::bail!("Sink capacity must be greater than zero when set");
        }

        Ok(())
    }

    /// Apply programmatic overrides
    pub fn with_overrides(
        mut self,
        listen_addr: Option<String>,
        viewport: Option<(u32, u32)>,
    ) -> Self {
        if let Some(listen_addr) = listen_addr {
            self.transport.listen_addr = listen_addr;
        }
        if let Some((width, height)) = viewport {
            self.viewport.width = width;
            self.viewport.height = height;
        }
        self
    }

    /// Parsed listening endpoint
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.transport
            .listen_addr
            .parse()
            .context("Invalid listen address")
    }

    /// Viewport snapshot for the projector
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height)
    }
}
