// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration.
//!
//! Every knob has a default that matches what the listing and compare views
//! expect, so an empty `{}` (or no file at all) is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Attribute matches shown per entity before collapsing into "... and N more".
pub const DEFAULT_MAX_ATTRIBUTE_MATCHES: usize = 10;
/// Fewest comparison groups a user can pick.
pub const DEFAULT_MIN_GROUPS: usize = 2;
/// Most comparison groups a user can pick.
pub const DEFAULT_MAX_GROUPS: usize = 5;
/// Brotli quality for state tokens (0..=11).
pub const DEFAULT_COMPRESSION_QUALITY: u32 = 9;
/// Brotli window size as log2 bytes (10..=24).
pub const DEFAULT_COMPRESSION_WINDOW: u32 = 22;
/// Practical URL length ceiling. Longer tokens are logged, not refused.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 2000;
/// Decompression cap for incoming tokens.
pub const DEFAULT_MAX_DECODED_BYTES: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub max_attribute_matches: usize,
    /// Spans shorter than this render unhighlighted.
    pub min_highlight_len: usize,
    pub min_groups: usize,
    pub max_groups: usize,
    pub compression_quality: u32,
    pub compression_window: u32,
    pub max_token_len: usize,
    pub max_decoded_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attribute_matches: DEFAULT_MAX_ATTRIBUTE_MATCHES,
            min_highlight_len: 1,
            min_groups: DEFAULT_MIN_GROUPS,
            max_groups: DEFAULT_MAX_GROUPS,
            compression_quality: DEFAULT_COMPRESSION_QUALITY,
            compression_window: DEFAULT_COMPRESSION_WINDOW,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_groups == 0 {
            return Err(ConfigError::Invalid("minGroups must be at least 1".into()));
        }
        if self.min_groups > self.max_groups {
            return Err(ConfigError::Invalid(format!(
                "minGroups {} exceeds maxGroups {}",
                self.min_groups, self.max_groups
            )));
        }
        if self.compression_quality > 11 {
            return Err(ConfigError::Invalid(format!(
                "compressionQuality {} is outside 0..=11",
                self.compression_quality
            )));
        }
        if !(10..=24).contains(&self.compression_window) {
            return Err(ConfigError::Invalid(format!(
                "compressionWindow {} is outside 10..=24",
                self.compression_window
            )));
        }
        if self.max_decoded_bytes == 0 {
            return Err(ConfigError::Invalid("maxDecodedBytes must be positive".into()));
        }
        Ok(())
    }

    /// Clamp a requested group count into the configured range.
    pub fn clamp_groups(&self, requested: usize) -> usize {
        requested.clamp(self.min_groups, self.max_groups)
    }
}
