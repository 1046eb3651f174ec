// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Shared helpers for controller tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bac_core::{
    AutocompleteCallbacks, AutocompleteController, AutocompleteOptions, HeadlessSurface,
    InputEvent, KeyCode, KeyEvent, KeyModifiers, Resource, Suggestion, TextInput,
};
use serde_json::{json, Value};

/// The color list served by the demo endpoint.
pub fn colors() -> Value {
    json!([
        {"title": "Red", "description": "The color of the heart.", "group": "Ground colors"},
        {"title": "Yellow"},
        {"title": "Green", "description": "If you look at your plants, they will likely be green.", "group": "Ground colors"},
        {"title": "Pink", "description": "For ponies, it is a <em>very common</em> hair color."},
        {"title": "Blue", "description": "Color of the sky and the ocean, what else can I say?", "group": "Ground colors"},
        {"title": "Beer", "description": "I know, I know, it may not be a color, but who cares?"},
    ])
}

/// Callbacks that record every selection and otherwise keep the defaults.
#[derive(Clone, Default)]
pub struct RecordingCallbacks {
    pub selected: Rc<RefCell<Vec<Value>>>,
}

impl AutocompleteCallbacks for RecordingCallbacks {
    fn select(&mut self, suggestion: &Suggestion, input: &mut TextInput) {
        self.selected.borrow_mut().push(suggestion.value().clone());
        input.blur();
    }
}

pub fn controller(
    resource: Resource,
    options: AutocompleteOptions,
    callbacks: impl AutocompleteCallbacks + 'static,
) -> AutocompleteController<HeadlessSurface> {
    let mut controller = AutocompleteController::new(
        TextInput::default(),
        resource,
        &options,
        Box::new(callbacks),
        HeadlessSurface::with_rows(4),
    );
    controller.enable();
    controller.handle_event(InputEvent::Focus);
    controller
}

pub fn key(code: KeyCode) -> InputEvent {
    InputEvent::KeyDown(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn typed(text: &str) -> InputEvent {
    InputEvent::Input(text.to_owned())
}

pub fn titles(controller: &AutocompleteController<HeadlessSurface>) -> Vec<String> {
    (0..controller.list().len())
        .filter_map(|i| controller.list().row(i))
        .filter_map(|row| row.suggestion.title().map(str::to_owned))
        .collect()
}
