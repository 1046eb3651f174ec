// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Result records and lookup resources.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single lookup result.
///
/// Results are caller-defined JSON records. The core only looks at the optional
/// string fields `title`, `description`, `group` and `addClass`; everything else
/// is carried through untouched to the select callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Suggestion(Value);

impl Suggestion {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// A record with only `title` set, as produced for plain string matches.
    pub fn titled(title: impl Into<String>) -> Self {
        let mut record = Map::new();
        record.insert("title".to_owned(), Value::String(title.into()));
        Self(Value::Object(record))
    }

    /// Whether the result is a structured record (a JSON object).
    pub fn is_record(&self) -> bool {
        self.0.is_object()
    }

    /// String value of `name`, if the result is a record and the field is a string.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.field("description")
    }

    pub fn group(&self) -> Option<&str> {
        self.field("group")
    }

    /// Extra style classes requested for this row, separated by spaces.
    pub fn add_class(&self) -> Option<&str> {
        self.field("addClass")
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Suggestion {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Whether lookups are answered synchronously from memory or by a remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceMode {
    Local,
    Remote,
}

/// Where results come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// In-memory collection searched by the local matcher.
    Local(Value),
    /// Path of a remote endpoint; the query is appended by `build_url`.
    Remote(String),
}

impl Resource {
    /// Local collection built from any sequence of JSON-convertible items.
    pub fn local<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Local(Value::Array(items.into_iter().map(Into::into).collect()))
    }

    pub fn remote(path: impl Into<String>) -> Self {
        Self::Remote(path.into())
    }

    pub fn mode(&self) -> ResourceMode {
        match self {
            Resource::Local(_) => ResourceMode::Local,
            Resource::Remote(_) => ResourceMode::Remote,
        }
    }

    pub fn is_local(&self) -> bool {
        self.mode() == ResourceMode::Local
    }
}

/// A JSON string names a remote path; any other value is a local collection.
impl From<Value> for Resource {
    fn from(value: Value) -> Self {
        match value {
            Value::String(path) => Resource::Remote(path),
            other => Resource::Local(other),
        }
    }
}
