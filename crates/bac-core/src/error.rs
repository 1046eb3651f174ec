// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutocompleteError>;

#[derive(Debug, Error)]
pub enum AutocompleteError {
    #[error("Method '{0}' does not exist")]
    UnknownMethod(String),

    #[error("'init' needs a resource and options, use AutocompleteRegistry::init")]
    InitNeedsArguments,

    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("Invalid options file: {0}")]
    OptionsToml(#[from] toml::de::Error),
}
