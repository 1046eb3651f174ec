// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The text input the controller is attached to, and the events it reacts to.

use crossterm::event::KeyEvent;

/// State of the attached input field as the controller sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    focused: bool,
    fetching: bool,
    autocomplete_attributes: bool,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether a remote lookup indicator is showing.
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn set_fetching(&mut self, fetching: bool) {
        self.fetching = fetching;
    }

    /// Whether the input is marked as driven by this controller, i.e. native
    /// completion off and list-style assistance announced.
    pub fn has_autocomplete_attributes(&self) -> bool {
        self.autocomplete_attributes
    }

    pub fn set_autocomplete_attributes(&mut self, on: bool) {
        self.autocomplete_attributes = on;
    }
}

/// Logical events routed to the controller.
///
/// Mouse events name result rows by ordinal; the host maps pointer
/// coordinates to rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Focus,
    Blur,
    /// The input's text changed to the given value.
    Input(String),
    KeyDown(KeyEvent),
    /// Click on the input itself.
    Click,
    MouseOver(usize),
    MouseMove,
    /// Button press on the panel: on a result row, or on its background.
    MouseDown(Option<usize>),
}

/// Whether the host should still apply its default handling to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Consumed,
    Propagate,
}

impl EventOutcome {
    pub fn is_consumed(self) -> bool {
        self == EventOutcome::Consumed
    }
}
