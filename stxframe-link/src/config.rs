//! Link configuration
//!
//! Stored as postcard-serialized binary data, so it can live in flash next to
//! other persisted settings.

use core::fmt;

use serde::{Deserialize, Serialize};
use stxframe_protocol::ChecksumPolicy;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Upper bound on the serialized size of [`LinkConfig`]
pub const MAX_CONFIG_SIZE: usize = 8;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Deserialization failed
    Deserialize,
    /// Serialization failed (usually a short buffer)
    Serialize,
    /// Config version mismatch
    VersionMismatch { found: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Deserialize => f.write_str("malformed link config"),
            ConfigError::Serialize => f.write_str("link config does not fit buffer"),
            ConfigError::VersionMismatch { found } => write!(
                f,
                "link config version {} (expected {})",
                found, CONFIG_VERSION
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Receive link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Format version, must equal [`CONFIG_VERSION`]
    pub version: u8,
    /// Checksum check applied to every completed frame
    pub checksum: ChecksumPolicy,
    /// Publish frames that fail the checksum check instead of dropping them
    pub deliver_unverified: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            checksum: ChecksumPolicy::Unchecked,
            deliver_unverified: false,
        }
    }
}

impl LinkConfig {
    /// Default settings with a specific checksum policy
    pub fn with_checksum(checksum: ChecksumPolicy) -> Self {
        Self {
            checksum,
            ..Self::default()
        }
    }

    /// Load configuration from binary postcard format
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: LinkConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            warn!(
                "Config version mismatch: found {}, expected {}",
                config.version,
                CONFIG_VERSION
            );
            return Err(ConfigError::VersionMismatch {
                found: config.version,
            });
        }

        debug!("Link config loaded: {:?}", config);
        Ok(config)
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }
}
