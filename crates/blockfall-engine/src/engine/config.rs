use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::PIECE_SIZE};

/// Engine parameters, fixed for the lifetime of a [`GameEngine`](super::GameEngine).
///
/// Omitted fields take their default when deserialized:
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "height": 20 }"#).unwrap();
/// assert_eq!(config.width, 10);
/// assert_eq!(config.height, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of visible rows.
    pub height: usize,
    /// Tick interval while the piece falls on its own.
    pub normal_interval_ms: u64,
    /// Tick interval after a soft drop, until the piece locks.
    pub quick_interval_ms: u64,
    /// Points awarded per cleared row.
    pub line_bonus: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 15,
            normal_interval_ms: 500,
            quick_interval_ms: 50,
            line_bonus: 100,
        }
    }
}

impl EngineConfig {
    /// Largest supported width or height.
    pub const MAX_DIMENSION: usize = 256;

    #[must_use]
    pub fn normal_interval(&self) -> Duration {
        Duration::from_millis(self.normal_interval_ms)
    }

    #[must_use]
    pub fn quick_interval(&self) -> Duration {
        Duration::from_millis(self.quick_interval_ms)
    }

    /// Checks the parameters.
    ///
    /// The grid must be at least [`PIECE_SIZE`] columns wide so every shape can spawn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(PIECE_SIZE..=Self::MAX_DIMENSION).contains(&self.width) {
            return Err(ConfigError::InvalidWidth {
                width: self.width,
                min: PIECE_SIZE,
                max: Self::MAX_DIMENSION,
            });
        }
        if !(1..=Self::MAX_DIMENSION).contains(&self.height) {
            return Err(ConfigError::InvalidHeight {
                height: self.height,
                max: Self::MAX_DIMENSION,
            });
        }
        if self.normal_interval_ms == 0 || self.quick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.quick_interval_ms > self.normal_interval_ms {
            return Err(ConfigError::QuickSlowerThanNormal {
                quick_ms: self.quick_interval_ms,
                normal_ms: self.normal_interval_ms,
            });
        }
        Ok(())
    }
}
