// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Demo data, callbacks and file loading.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use bac_core::{
    AutocompleteCallbacks, AutocompleteController, AutocompleteOptions, HeadlessSurface, Resource,
    Suggestion, TextInput,
};
use serde_json::{json, Value};

/// Built-in collection used when no other resource is given.
pub fn colors() -> Value {
    json!([
        {"title": "Red", "description": "The color of the heart.", "group": "Ground colors"},
        {"title": "Yellow"},
        {"title": "Green", "description": "If you look at your plants, they will likely be green.", "group": "Ground colors"},
        {"title": "Pink", "description": "For ponies, it is a very common hair color.", "addClass": "italic"},
        {"title": "Blue", "description": "Color of the sky and the ocean, what else can I say?", "group": "Ground colors"},
        {"title": "Beer", "description": "I know, it may not be a color, but who cares? This is a demonstration and it needs a long text that wraps.", "addClass": "dim"},
    ])
}

/// Plain-text rows and a record of the last selection.
#[derive(Debug, Clone, Default)]
pub struct DemoCallbacks {
    last_selected: Rc<RefCell<Option<String>>>,
}

impl DemoCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the title of the most recent selection.
    pub fn last_selected(&self) -> Rc<RefCell<Option<String>>> {
        Rc::clone(&self.last_selected)
    }
}

impl AutocompleteCallbacks for DemoCallbacks {
    fn select(&mut self, suggestion: &Suggestion, input: &mut TextInput) {
        input.blur();
        if let Some(title) = suggestion.title() {
            input.set_value(title);
        }
        *self.last_selected.borrow_mut() = suggestion.title().map(str::to_owned);
    }

    fn format_result(&self, suggestion: &Suggestion) -> Option<String> {
        if !suggestion.is_record() {
            return None;
        }
        Some(match (suggestion.title(), suggestion.description()) {
            (Some(title), Some(description)) => format!("{title}: {description}"),
            (Some(title), None) => title.to_owned(),
            (None, Some(description)) => description.to_owned(),
            (None, None) => String::new(),
        })
    }
}

/// An enabled controller over an empty input, drawn by the terminal view.
pub fn demo_controller(
    resource: Resource,
    options: &AutocompleteOptions,
    callbacks: DemoCallbacks,
) -> AutocompleteController<HeadlessSurface> {
    let mut controller = AutocompleteController::new(
        TextInput::new(""),
        resource,
        options,
        Box::new(callbacks),
        HeadlessSurface::new(),
    );
    controller.enable();
    controller
}

/// Options from a `.toml` file, or JSON for any other extension.
pub fn load_options(path: &Path) -> anyhow::Result<AutocompleteOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options from {}", path.display()))?;
    let options = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => AutocompleteOptions::from_toml_str(&text)?,
        _ => AutocompleteOptions::from_json_str(&text)?,
    };
    Ok(options)
}

/// A JSON collection for local lookups.
pub fn load_collection(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read collection from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn plain_text_rows() {
        let callbacks = DemoCallbacks::new();
        assert_eq!(
            callbacks.format_result(&Suggestion::new(json!({"title": "Red", "description": "Warm"}))),
            Some("Red: Warm".to_owned())
        );
        assert_eq!(callbacks.format_result(&Suggestion::new(json!(3))), None);
    }

    #[test]
    fn selection_is_recorded() {
        let mut callbacks = DemoCallbacks::new();
        let last = callbacks.last_selected();
        let mut input = TextInput::new("bl");
        callbacks.select(&Suggestion::titled("Blue"), &mut input);
        assert_eq!(input.value(), "Blue");
        assert_eq!(last.borrow().as_deref(), Some("Blue"));
    }

    #[test]
    fn options_load_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");

        let toml_path = dir.path().join("options.toml");
        std::fs::File::create(&toml_path)
            .and_then(|mut f| f.write_all(b"charLimit = 2\nselectKeys = [\"Enter\"]\n"))
            .expect("write toml");
        let options = load_options(&toml_path).expect("toml options");
        assert_eq!(options.char_limit, Some(2));

        let json_path = dir.path().join("options.json");
        std::fs::write(&json_path, r#"{"delay": 50}"#).expect("write json");
        assert_eq!(load_options(&json_path).expect("json options").delay, Some(50));

        std::fs::write(&json_path, r#"{"bogus": 1}"#).expect("write json");
        assert!(load_options(&json_path).is_err());
    }
}
