use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(
        "breakpoints must be non-zero and ascending (small_mobile={small_mobile}, tablet={tablet}, desktop={desktop})"
    )]
    Breakpoints {
        small_mobile: u32,
        tablet: u32,
        desktop: u32,
    },
    #[error("resize debounce must be at least 1ms")]
    ZeroDebounce,
}

/// Width thresholds (in pixels) where each size bucket begins.
///
/// Widths below `small_mobile` are small mobile, below `tablet` large
/// mobile, below `desktop` tablet, and everything else desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Breakpoints {
    #[serde(alias = "small_mobile")]
    pub small_mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
}

impl Breakpoints {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_mobile == 0
            || self.small_mobile >= self.tablet
            || self.tablet >= self.desktop
        {
            return Err(ConfigError::Breakpoints {
                small_mobile: self.small_mobile,
                tablet: self.tablet,
                desktop: self.desktop,
            });
        }
        Ok(())
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            small_mobile: 480,
            tablet: 768,
            desktop: 1024,
        }
    }
}

/// Tunables for the classifier.
///
/// `low_end_max_cores` is a heuristic: a reported logical core count at or
/// below it marks the device low-end. Nothing in the classification itself
/// depends on the exact value.
///
/// Keys are camelCase to match the browser side; the snake_case spellings
/// are accepted too. Unknown keys are an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassifierConfig {
    pub breakpoints: Breakpoints,
    #[serde(alias = "low_end_max_cores")]
    pub low_end_max_cores: u32,
    #[serde(alias = "resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

impl ClassifierConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.breakpoints.validate()?;
        if self.resize_debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        Ok(())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            low_end_max_cores: 4,
            resize_debounce_ms: 100,
        }
    }
}
