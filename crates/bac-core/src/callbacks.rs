// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Caller hooks into the controller.
//!
//! Every hook has a default; implementors override only what they need.
//! Remote transport is not a hook here, it belongs to the host driving the
//! controller (see `bac-runtime`).

use serde_json::Value;
use tracing::debug;

use crate::input::TextInput;
use crate::local_matcher;
use crate::query::{normalize, Query};
use crate::suggestion::Suggestion;
use crate::surface::PresentationSurface;

pub trait AutocompleteCallbacks {
    /// A suggestion was chosen. The default blurs the input and copies the
    /// suggestion's title into it.
    fn select(&mut self, suggestion: &Suggestion, input: &mut TextInput) {
        input.blur();
        if let Some(title) = suggestion.title() {
            input.set_value(title);
        }
    }

    /// Render fragment for one result, or `None` to leave it out.
    ///
    /// The default emits `<h4>title</h4><p>description</p>` for whichever of
    /// the two fields are strings. Results that are not records are left out.
    /// Field text is not escaped.
    fn format_result(&self, suggestion: &Suggestion) -> Option<String> {
        if !suggestion.is_record() {
            return None;
        }
        let mut output = String::new();
        if let Some(title) = suggestion.title() {
            output.push_str(&format!("<h4>{title}</h4>"));
        }
        if let Some(description) = suggestion.description() {
            output.push_str(&format!("<p>{description}</p>"));
        }
        Some(output)
    }

    fn match_local(&self, query: &Query, collection: &Value, case_sensitive: bool) -> Vec<Suggestion> {
        local_matcher::match_local(query.as_str(), collection, case_sensitive)
    }

    /// Turn a remote payload into results. `None` means the lookup failed or
    /// timed out. The default accepts only a top-level array.
    fn extract_results(&self, payload: Option<Value>) -> Vec<Suggestion> {
        match payload {
            Some(Value::Array(items)) => items.into_iter().map(Suggestion::new).collect(),
            Some(_) => {
                debug!("remote payload is not a list, treating as no results");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn group_of(&self, suggestion: &Suggestion) -> Option<String> {
        suggestion.group().map(str::to_owned)
    }

    fn build_url(&self, resource: &str, query: &Query) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_str().as_bytes()).collect();
        format!("{resource}?q={encoded}")
    }

    /// The first remote lookup started while none were active.
    fn on_fetch_begin(&mut self, input: &mut TextInput) {
        input.set_fetching(true);
    }

    /// The last active remote lookup settled.
    fn on_fetch_end(&mut self, input: &mut TextInput) {
        input.set_fetching(false);
    }

    fn canonicalize(&self, raw: &str, case_sensitive: bool) -> Query {
        normalize(raw, case_sensitive)
    }

    /// Attach the panel to the input. Positioning and styling live here.
    fn mount_panel(&mut self, surface: &mut dyn PresentationSurface, _input: &TextInput, max_height: u32) {
        surface.mount(max_height);
    }
}

/// Callbacks with every default behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCallbacks;

impl AutocompleteCallbacks for DefaultCallbacks {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{HeadlessSurface, SurfaceCall};
    use serde_json::json;

    #[test]
    fn default_select_blurs_and_copies_title() {
        let mut input = TextInput::new("pi");
        input.focus();
        DefaultCallbacks.select(&Suggestion::titled("Pink"), &mut input);
        assert!(!input.is_focused());
        assert_eq!(input.value(), "Pink");

        input.focus();
        DefaultCallbacks.select(&Suggestion::new(json!({"id": 3})), &mut input);
        assert_eq!(input.value(), "Pink", "untitled selection keeps the text");
    }

    #[test]
    fn default_formatter_emits_markup_for_records_only() {
        let callbacks = DefaultCallbacks;
        assert_eq!(
            callbacks.format_result(&Suggestion::new(json!({"title": "Red", "description": "Warm"}))),
            Some("<h4>Red</h4><p>Warm</p>".to_owned())
        );
        assert_eq!(
            callbacks.format_result(&Suggestion::titled("Blue")),
            Some("<h4>Blue</h4>".to_owned())
        );
        assert_eq!(callbacks.format_result(&Suggestion::new(json!({}))), Some(String::new()));
        assert_eq!(callbacks.format_result(&Suggestion::new(json!("Blue"))), None);
    }

    #[test]
    fn default_extraction_accepts_only_lists() {
        let callbacks = DefaultCallbacks;
        assert_eq!(callbacks.extract_results(Some(json!([{"title": "Red"}]))).len(), 1);
        assert!(callbacks.extract_results(Some(json!({"results": []}))).is_empty());
        assert!(callbacks.extract_results(None).is_empty());
    }

    #[test]
    fn default_url_encodes_query() {
        let url = DefaultCallbacks.build_url("/colors", &Query::new("red & blue"));
        assert_eq!(url, "/colors?q=red+%26+blue");
    }

    #[test]
    fn default_fetch_hooks_toggle_indicator() {
        let mut callbacks = DefaultCallbacks;
        let mut input = TextInput::default();
        callbacks.on_fetch_begin(&mut input);
        assert!(input.is_fetching());
        callbacks.on_fetch_end(&mut input);
        assert!(!input.is_fetching());
    }

    #[test]
    fn default_mount_passes_max_height() {
        let mut surface = HeadlessSurface::new();
        DefaultCallbacks.mount_panel(&mut surface, &TextInput::default(), 120);
        assert_eq!(surface.calls(), &[SurfaceCall::Mount(120)]);
    }
}
