// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Synchronous substring search over an in-memory collection.

use serde_json::Value;

use crate::suggestion::Suggestion;

/// Record fields tested for containment, in order.
const MATCHED_FIELDS: [&str; 2] = ["title", "description"];

/// Filter `collection` down to the elements containing `query`.
///
/// Plain strings match on their own text and come back as `{title: ...}`
/// records. Records match on `title`, then `description`, and are returned
/// verbatim. Other element types are skipped. Output keeps the collection's
/// order; a collection that is not a JSON array yields no results.
pub fn match_local(query: &str, collection: &Value, case_sensitive: bool) -> Vec<Suggestion> {
    let Some(elements) = collection.as_array() else {
        return Vec::new();
    };

    let needle = if case_sensitive {
        query.to_owned()
    } else {
        query.to_lowercase()
    };

    elements
        .iter()
        .filter_map(|element| match element {
            Value::String(text) => {
                contains(text, &needle, case_sensitive).then(|| Suggestion::titled(text.clone()))
            }
            Value::Object(record) => {
                let matched = MATCHED_FIELDS.iter().any(|field| {
                    record
                        .get(*field)
                        .and_then(Value::as_str)
                        .is_some_and(|text| contains(text, &needle, case_sensitive))
                });
                matched.then(|| Suggestion::new(element.clone()))
            }
            _ => None,
        })
        .collect()
}

fn contains(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(needle)
    }
}
