// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The per-input state machine.
//!
//! Every render reads the cache keyed by the live input value. That single
//! rule is what makes overlapping lookups safe: a response for a query the
//! user has already moved past is stored, and only shows up if the input
//! returns to that query.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::Value;
use tracing::{debug, trace};

use crate::cache::ResultCache;
use crate::callbacks::AutocompleteCallbacks;
use crate::fetch::{DebounceTimer, Dispatch, FetchCoordinator, FetchRequest, FetchTicket, Settlement, TimerId};
use crate::input::{EventOutcome, InputEvent, TextInput};
use crate::options::{AutocompleteOptions, Settings};
use crate::query::Query;
use crate::suggestion::{Resource, Suggestion};
use crate::suggestion_list::{Direction, SuggestionListModel};
use crate::surface::PresentationSurface;

/// Modifiers that turn a select key into an ordinary keystroke.
const SELECT_BLOCKING_MODIFIERS: KeyModifiers = KeyModifiers::SHIFT
    .union(KeyModifiers::CONTROL)
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::META)
    .union(KeyModifiers::SUPER)
    .union(KeyModifiers::HYPER);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Disabled,
    Unfocused,
    FocusedEmpty,
    Showing,
}

pub struct AutocompleteController<S: PresentationSurface> {
    input: TextInput,
    resource: Resource,
    settings: Settings,
    callbacks: Box<dyn AutocompleteCallbacks>,
    surface: S,
    cache: ResultCache,
    fetch: FetchCoordinator,
    list: SuggestionListModel,
    last_rendered: Option<Query>,
    enabled: bool,
    visible: bool,
    /// Set by keyboard navigation so the hover generated by the list
    /// scrolling under a still pointer does not steal the highlight.
    suppress_hover: bool,
}

impl<S: PresentationSurface> AutocompleteController<S> {
    /// Attach to `input` and mount the panel. The controller starts disabled;
    /// call [`enable`](Self::enable) to start reacting to events.
    pub fn new(
        input: TextInput,
        resource: Resource,
        options: &AutocompleteOptions,
        mut callbacks: Box<dyn AutocompleteCallbacks>,
        mut surface: S,
    ) -> Self {
        let settings = options.resolve(resource.mode());
        callbacks.mount_panel(&mut surface, &input, settings.max_height);
        debug!(mode = ?settings.mode, char_limit = settings.char_limit, cache_limit = settings.cache_limit, "autocomplete attached");

        Self {
            cache: ResultCache::new(settings.cache_limit),
            fetch: FetchCoordinator::new(settings.delay, settings.remote_timeout),
            input,
            resource,
            settings,
            callbacks,
            surface,
            list: SuggestionListModel::new(),
            last_rendered: None,
            enabled: false,
            visible: false,
            suppress_hover: false,
        }
    }

    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.input.set_autocomplete_attributes(true);
        debug!("autocomplete enabled");
        // A focused input with cached results shows them again.
        self.redraw(false);
    }

    /// Stop reacting to events and hide the panel. Cached results are kept.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.input.set_autocomplete_attributes(false);
        self.fetch.cancel_timer();
        self.set_visible(false);
        debug!("autocomplete disabled");
    }

    /// Detach from the input and remove the panel, handing both back.
    pub fn destroy(mut self) -> (TextInput, S) {
        self.fetch.cancel_timer();
        self.input.set_autocomplete_attributes(false);
        self.surface.remove();
        debug!(abandoned_lookups = self.fetch.active_count(), "autocomplete destroyed");
        (self.input, self.surface)
    }

    pub fn handle_event(&mut self, event: InputEvent) -> EventOutcome {
        trace!(?event, state = ?self.state(), "input event");
        if !self.enabled {
            self.track_input_state(event);
            return EventOutcome::Propagate;
        }

        match event {
            InputEvent::Focus => {
                self.input.focus();
                self.redraw(true);
            }
            InputEvent::Blur => {
                self.input.blur();
                self.redraw(false);
            }
            InputEvent::Input(text) => {
                self.input.set_value(text);
                self.on_input();
            }
            InputEvent::KeyDown(key) => return self.on_key_down(key),
            InputEvent::Click => self.redraw(false),
            InputEvent::MouseOver(index) => {
                if !self.suppress_hover && index < self.list.len() {
                    self.highlight_row(index, None);
                }
            }
            InputEvent::MouseMove => self.suppress_hover = false,
            InputEvent::MouseDown(Some(index)) => {
                if index < self.list.len() {
                    self.highlight_row(index, None);
                    self.select();
                }
                return EventOutcome::Consumed;
            }
            InputEvent::MouseDown(None) => return EventOutcome::Consumed,
        }
        EventOutcome::Propagate
    }

    /// Deliver a debounce expiry. Ids of timers that were since re-armed or
    /// cancelled are ignored.
    pub fn fire_timer(&mut self, id: TimerId) {
        if let Some(query) = self.fetch.fire(id) {
            self.fetch_results(query);
        }
    }

    /// Complete a remote lookup. `payload` is `None` when the lookup failed or
    /// timed out.
    pub fn settle(&mut self, ticket: FetchTicket, payload: Option<Value>) {
        let results = self.callbacks.extract_results(payload);
        match self.fetch.settle(ticket, results, &mut self.cache) {
            Settlement::Unknown => return,
            Settlement::Settled { now_idle, .. } => {
                if now_idle {
                    self.callbacks.on_fetch_end(&mut self.input);
                }
            }
        }
        self.redraw(false);
    }

    /// Remote lookups queued since the last call.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        self.fetch.take_requests()
    }

    pub fn armed_timer(&self) -> Option<&DebounceTimer> {
        self.fetch.armed_timer()
    }

    pub fn state(&self) -> ControllerState {
        if !self.enabled {
            ControllerState::Disabled
        } else if !self.input.is_focused() {
            ControllerState::Unfocused
        } else if self.visible {
            ControllerState::Showing
        } else {
            ControllerState::FocusedEmpty
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn list(&self) -> &SuggestionListModel {
        &self.list
    }

    pub fn highlighted(&self) -> Option<&Suggestion> {
        self.list.highlighted()
    }

    /// Remote lookups dispatched and not yet settled.
    pub fn active_fetches(&self) -> usize {
        self.fetch.active_count()
    }

    fn track_input_state(&mut self, event: InputEvent) {
        match event {
            InputEvent::Focus => self.input.focus(),
            InputEvent::Blur => self.input.blur(),
            InputEvent::Input(text) => self.input.set_value(text),
            _ => {}
        }
    }

    fn on_input(&mut self) {
        let query = self.current_query();
        if let Some(id) = self.fetch.cancel_timer() {
            trace!(?id, "debounce timer cleared by new input");
        }
        self.redraw(false);

        if query.char_len() < self.settings.char_limit
            || self.cache.contains(query.as_str())
            || self.fetch.is_pending(query.as_str())
        {
            return;
        }
        if self.resource.is_local() {
            self.fetch_results(query);
        } else {
            self.fetch.schedule(query);
        }
    }

    fn on_key_down(&mut self, key: KeyEvent) -> EventOutcome {
        if key.kind == KeyEventKind::Release {
            return EventOutcome::Propagate;
        }

        let direction = match key.code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            _ => None,
        };
        if let Some(direction) = direction {
            if let Some(current) = self.list.highlighted_index() {
                if let Some(next) = self.list.move_highlight(direction) {
                    self.suppress_hover = true;
                    self.highlight_row(next, Some(next == 0 || next < current));
                }
                return EventOutcome::Consumed;
            }
        }

        if self.settings.is_select_key(key.code) && !key.modifiers.intersects(SELECT_BLOCKING_MODIFIERS) {
            let selected = self.select();
            if selected && key.code != KeyCode::Tab {
                return EventOutcome::Consumed;
            }
        }
        EventOutcome::Propagate
    }

    /// Highlight a row, clamped into range. With `scroll`, bring it into view;
    /// the flag says whether the highlight moved upward.
    fn highlight_row(&mut self, index: usize, scroll: Option<bool>) {
        let Some(index) = self.list.set_highlight(index) else {
            return;
        };
        self.surface.highlight(Some(index));
        if let Some(upward) = scroll {
            if let Some(position) = self.list.scroll_target(index, upward) {
                self.surface.scroll_into_view(position);
            }
        }
    }

    fn select(&mut self) -> bool {
        let Some(suggestion) = self.list.highlighted().cloned() else {
            return false;
        };
        debug!(title = suggestion.title(), "suggestion selected");
        self.callbacks.select(&suggestion, &mut self.input);
        // The callback may have changed focus or text.
        self.redraw(false);
        true
    }

    fn fetch_results(&mut self, query: Query) {
        match &self.resource {
            Resource::Local(collection) => {
                let results = self
                    .callbacks
                    .match_local(&query, collection, self.settings.case_sensitive);
                debug!(%query, results = results.len(), "local lookup");
                self.cache.put(query, results);
            }
            Resource::Remote(path) => {
                let callbacks = &self.callbacks;
                let dispatch = self
                    .fetch
                    .dispatch(query, &self.cache, |query| callbacks.build_url(path, query));
                if dispatch == (Dispatch::Started { first_active: true }) {
                    self.callbacks.on_fetch_begin(&mut self.input);
                }
                return;
            }
        }
        self.redraw(false);
    }

    /// Bring the panel in line with the live query and focus.
    fn redraw(&mut self, force_focus: bool) {
        let query = self.current_query();

        if !self.cache.contains(query.as_str()) {
            self.last_rendered = None;
            if !self.list.items().is_empty() {
                self.list.clear();
                self.surface.clear();
            }
        } else if self.last_rendered.as_ref() != Some(&query) {
            if let Some(results) = self.cache.get(query.as_str()) {
                let callbacks = &self.callbacks;
                self.list.rebuild(
                    results,
                    |suggestion| callbacks.format_result(suggestion),
                    |suggestion| callbacks.group_of(suggestion),
                );
            }
            trace!(%query, rows = self.list.len(), "rendering results");
            self.surface.render(self.list.items());
            self.last_rendered = Some(query);
            self.highlight_row(0, None);
        }

        let show = self.enabled && (self.input.is_focused() || force_focus) && !self.list.is_empty();
        self.set_visible(show);
    }

    fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.surface.show();
        } else {
            self.surface.hide();
        }
    }

    fn current_query(&self) -> Query {
        self.callbacks
            .canonicalize(self.input.value(), self.settings.case_sensitive)
    }
}

impl<S: PresentationSurface + std::fmt::Debug> std::fmt::Debug for AutocompleteController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteController")
            .field("state", &self.state())
            .field("input", &self.input)
            .field("last_rendered", &self.last_rendered)
            .field("active_fetches", &self.fetch.active_count())
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
