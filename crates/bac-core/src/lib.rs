// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Core of the autocomplete controller.
//!
//! The crate turns the raw text of a single input field into a navigable,
//! grouped list of suggestions. It decides when a lookup is needed, reconciles
//! overlapping asynchronous lookups, keeps a bounded per-query cache and maps
//! keyboard, mouse and focus events onto one highlighted suggestion.
//!
//! Nothing in here performs IO. Remote lookups leave the controller as
//! [`FetchRequest`]s and come back through
//! [`AutocompleteController::settle`]; the debounce timer is exposed as an
//! armed [`DebounceTimer`] that the host fires with
//! [`AutocompleteController::fire_timer`]. Hosts such as `bac-runtime` wire
//! both to a real event loop.

pub mod cache;
pub mod callbacks;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod input;
pub mod local_matcher;
pub mod options;
pub mod query;
pub mod registry;
pub mod suggestion;
pub mod suggestion_list;
pub mod surface;

pub use cache::ResultCache;
pub use callbacks::{AutocompleteCallbacks, DefaultCallbacks};
pub use controller::{AutocompleteController, ControllerState};
pub use error::{AutocompleteError, Result};
pub use fetch::{DebounceTimer, FetchCoordinator, FetchRequest, FetchTicket, TimerId};
pub use input::{EventOutcome, InputEvent, TextInput};
pub use options::{AutocompleteOptions, Settings};
pub use query::{normalize, Query};
pub use registry::{AutocompleteRegistry, ElementId, Method};
pub use suggestion::{Resource, ResourceMode, Suggestion};
pub use suggestion_list::{Direction, RenderItem, ResultRow, SuggestionListModel};
pub use surface::{HeadlessSurface, PresentationSurface, SurfaceCall, Viewport};

// Key types are part of the event API.
pub use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
