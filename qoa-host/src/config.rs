//! Host memory layout configuration
//!
//! Defaults mirror the browser host the decoder was first embedded in: input
//! placed 4 KiB into a 64 KiB-paged memory with a 1 KiB gap before output.

use serde::{Deserialize, Serialize};

use crate::HostError;

/// Shared memory layout for a [`DecoderSession`](crate::DecoderSession)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Offset at which [`DecoderSession::decode`](crate::DecoderSession::decode) places input
    pub input_offset: usize,
    /// Gap between the end of input and the start of output
    pub guard_bytes: usize,
    /// Growth granularity in bytes
    pub page_size: usize,
    /// Pages allocated when the session is created
    pub initial_pages: usize,
    /// Hard limit on memory growth
    pub max_pages: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            input_offset: 4096,
            guard_bytes: 1024,
            page_size: 65536,
            initial_pages: 4,
            max_pages: 16384,
        }
    }
}

impl HostConfig {
    /// Parse from TOML; missing keys take their defaults
    ///
    /// ```
    /// let config = qoa_host::HostConfig::from_toml_str("max_pages = 64").unwrap();
    /// assert_eq!(config.max_pages, 64);
    /// assert_eq!(config.page_size, 65536);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, HostError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HostError> {
        if self.page_size == 0 {
            return Err(HostError::InvalidConfig("page_size must be non-zero".into()));
        }
        if self.initial_pages > self.max_pages {
            return Err(HostError::InvalidConfig(format!(
                "initial_pages ({}) exceeds max_pages ({})",
                self.initial_pages, self.max_pages
            )));
        }
        let limit = self.max_bytes();
        if self.input_offset >= limit {
            return Err(HostError::InvalidConfig(format!(
                "input_offset ({}) lies beyond the memory limit ({limit} bytes)",
                self.input_offset
            )));
        }
        Ok(())
    }

    /// Largest memory size the session may grow to
    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_pages.saturating_mul(self.page_size)
    }
}
