// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Canonical query keys.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized search key derived from the raw input text.
///
/// Two raw strings that normalize to the same value are the same query: they
/// share one cache entry and at most one in-flight lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Wrap text that is already canonical.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, which is what the `charLimit` option counts.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for Query {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim surrounding whitespace and lowercase unless `case_sensitive`.
pub fn normalize(raw: &str, case_sensitive: bool) -> Query {
    let trimmed = raw.trim();
    if case_sensitive {
        Query(trimmed.to_owned())
    } else {
        Query(trimmed.to_lowercase())
    }
}
