// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Caller options and the settings resolved from them.
//!
//! Every option is optional. Defaults for `charLimit` and `cacheLimit` depend
//! on whether the resource is local or remote, so options are resolved against
//! a [`ResourceMode`] before use.

use std::time::Duration;

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::suggestion::ResourceMode;

pub const DEFAULT_DELAY_MS: u64 = 350;
pub const DEFAULT_MAX_HEIGHT: u32 = 330;
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 10_000;
pub const LOCAL_CHAR_LIMIT: usize = 1;
pub const REMOTE_CHAR_LIMIT: usize = 3;
pub const LOCAL_CACHE_LIMIT: usize = 0;
pub const REMOTE_CACHE_LIMIT: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AutocompleteOptions {
    /// Minimum query length, in characters, before a lookup runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_limit: Option<usize>,
    /// Debounce delay for remote lookups, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Maximum panel height handed to the surface when mounting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    /// Aggregate number of cached results, across queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_limit: Option<usize>,
    /// Remote lookup timeout, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_keys: Option<Vec<KeyCode>>,
}

impl AutocompleteOptions {
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Fill in defaults for `mode`.
    pub fn resolve(&self, mode: ResourceMode) -> Settings {
        let (char_limit, cache_limit) = match mode {
            ResourceMode::Local => (LOCAL_CHAR_LIMIT, LOCAL_CACHE_LIMIT),
            ResourceMode::Remote => (REMOTE_CHAR_LIMIT, REMOTE_CACHE_LIMIT),
        };
        Settings {
            mode,
            char_limit: self.char_limit.unwrap_or(char_limit),
            delay: Duration::from_millis(self.delay.unwrap_or(DEFAULT_DELAY_MS)),
            max_height: self.max_height.unwrap_or(DEFAULT_MAX_HEIGHT),
            case_sensitive: self.case_sensitive.unwrap_or(false),
            cache_limit: self.cache_limit.unwrap_or(cache_limit),
            remote_timeout: Duration::from_millis(
                self.remote_timeout.unwrap_or(DEFAULT_REMOTE_TIMEOUT_MS),
            ),
            select_keys: self
                .select_keys
                .clone()
                .unwrap_or_else(|| vec![KeyCode::Tab, KeyCode::Enter]),
        }
    }
}

/// Fully resolved options for one controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: ResourceMode,
    pub char_limit: usize,
    pub delay: Duration,
    pub max_height: u32,
    pub case_sensitive: bool,
    pub cache_limit: usize,
    pub remote_timeout: Duration,
    pub select_keys: Vec<KeyCode>,
}

impl Settings {
    pub fn is_select_key(&self, code: KeyCode) -> bool {
        self.select_keys.contains(&code)
    }
}
