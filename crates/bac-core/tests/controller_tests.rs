// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end controller behavior: lookups, races, grouping and selection.

mod common;

use bac_core::{
    AutocompleteOptions, ControllerState, DebounceTimer, DefaultCallbacks, EventOutcome,
    InputEvent, KeyCode, RenderItem, Resource, SurfaceCall,
};
use common::{colors, controller, key, titles, typed, RecordingCallbacks};
use serde_json::json;

fn remote_options() -> AutocompleteOptions {
    AutocompleteOptions {
        char_limit: Some(2),
        ..AutocompleteOptions::default()
    }
}

#[test]
fn local_colors_match_in_collection_order() {
    let mut c = controller(
        Resource::local(["Red", "Yellow", "Green"]),
        AutocompleteOptions::default(),
        DefaultCallbacks,
    );
    c.handle_event(typed("E"));

    assert_eq!(titles(&c), vec!["Red", "Yellow", "Green"]);
    assert_eq!(c.state(), ControllerState::Showing);
}

#[test]
fn grouped_results_render_under_one_heading() {
    let mut c = controller(
        Resource::Local(json!([
            {"title": "A", "description": "x", "group": "G1"},
            {"title": "B", "description": "x", "group": "G1"},
            {"title": "C", "description": "x"},
        ])),
        AutocompleteOptions::default(),
        DefaultCallbacks,
    );
    c.handle_event(typed("x"));

    let plan: Vec<String> = c
        .surface()
        .items()
        .iter()
        .map(|item| match item {
            RenderItem::Heading(name) => format!("heading {name}"),
            RenderItem::Result(row) => format!("item {}", row.suggestion.title().unwrap_or("")),
        })
        .collect();
    assert_eq!(plan, vec!["heading G1", "item A", "item B", "item C"]);
}

#[test]
fn enter_selects_highlighted_item_exactly_once() {
    let callbacks = RecordingCallbacks::default();
    let selected = callbacks.selected.clone();
    let mut c = controller(Resource::Local(colors()), AutocompleteOptions::default(), callbacks);
    c.handle_event(typed("e"));
    assert_eq!(titles(&c), vec!["Red", "Yellow", "Green", "Pink", "Blue", "Beer"]);

    c.handle_event(key(KeyCode::Down));
    assert_eq!(c.list().highlighted_index(), Some(1));
    assert_eq!(c.handle_event(key(KeyCode::Enter)), EventOutcome::Consumed);

    let selected = selected.borrow();
    assert_eq!(selected.len(), 1, "select must run exactly once");
    assert_eq!(selected[0], json!({"title": "Yellow"}));
}

#[test]
fn arrows_stop_at_both_ends() {
    let mut c = controller(Resource::local(["Red", "Green"]), AutocompleteOptions::default(), DefaultCallbacks);
    c.handle_event(typed("e"));

    c.handle_event(key(KeyCode::Up));
    assert_eq!(c.list().highlighted_index(), Some(0), "Up at the top stays put");
    c.handle_event(key(KeyCode::Down));
    c.handle_event(key(KeyCode::Down));
    assert_eq!(c.list().highlighted_index(), Some(1), "Down at the bottom stays put");
}

#[test]
fn repeated_scheduling_dispatches_once() {
    let mut c = controller(Resource::remote("/colors"), remote_options(), DefaultCallbacks);

    c.handle_event(typed("re"));
    let first = c.armed_timer().map(DebounceTimer::id).expect("armed");
    c.handle_event(typed("re "));
    let second = c.armed_timer().map(DebounceTimer::id).expect("re-armed");

    c.fire_timer(first);
    assert!(c.take_requests().is_empty(), "superseded timer must not dispatch");
    c.fire_timer(second);
    let requests = c.take_requests();
    assert_eq!(requests.len(), 1);

    // Same query while in flight: no new timer, no new request.
    c.handle_event(typed("RE"));
    assert!(c.armed_timer().is_none());
    assert_eq!(c.active_fetches(), 1);

    for request in requests {
        c.settle(request.ticket, Some(json!([])));
    }
}

#[test]
fn stale_response_is_cached_but_not_shown() {
    let mut c = controller(Resource::remote("/colors"), remote_options(), DefaultCallbacks);

    c.handle_event(typed("ab"));
    let timer = c.armed_timer().map(DebounceTimer::id).expect("armed");
    c.fire_timer(timer);
    let ab = c.take_requests().pop().expect("request for ab");

    c.handle_event(typed("abc"));
    c.settle(ab.ticket, Some(json!([{"title": "Abba"}])));

    assert!(c.cache().contains("ab"));
    assert!(c.list().is_empty(), "panel reflects abc, which has no results yet");
    assert_eq!(c.state(), ControllerState::FocusedEmpty);
    assert!(!c.input().is_fetching());

    c.handle_event(typed("ab"));
    assert_eq!(titles(&c), vec!["Abba"]);
    assert_eq!(c.state(), ControllerState::Showing);
}

#[test]
fn overlapping_lookups_keep_indicator_until_last_settles() {
    let mut c = controller(Resource::remote("/colors"), remote_options(), DefaultCallbacks);

    c.handle_event(typed("ab"));
    let timer = c.armed_timer().map(DebounceTimer::id).expect("armed");
    c.fire_timer(timer);
    c.handle_event(typed("abc"));
    let timer = c.armed_timer().map(DebounceTimer::id).expect("armed");
    c.fire_timer(timer);

    let mut requests = c.take_requests();
    assert_eq!(requests.len(), 2);
    assert!(c.input().is_fetching());

    let abc = requests.pop().expect("abc");
    let ab = requests.pop().expect("ab");
    c.settle(abc.ticket, Some(json!([{"title": "Abc"}])));
    assert!(c.input().is_fetching(), "ab is still in flight");
    assert_eq!(titles(&c), vec!["Abc"]);

    c.settle(ab.ticket, None);
    assert!(!c.input().is_fetching());
    assert_eq!(titles(&c), vec!["Abc"], "late ab response leaves abc on screen");
}

#[test]
fn failed_lookup_is_cached_as_empty() {
    let mut c = controller(Resource::remote("/colors"), remote_options(), DefaultCallbacks);

    c.handle_event(typed("zz"));
    let timer = c.armed_timer().map(DebounceTimer::id).expect("armed");
    c.fire_timer(timer);
    let request = c.take_requests().pop().expect("request");
    c.settle(request.ticket, Some(json!({"error": "not a list"})));

    assert_eq!(c.cache().get("zz").map(<[_]>::len), Some(0));
    c.handle_event(typed("z"));
    c.handle_event(typed("zz"));
    assert!(c.armed_timer().is_none(), "cached failure is not retried");
}

#[test]
fn zero_cache_limit_rematches_every_change() {
    let mut c = controller(Resource::local(["Red", "Green"]), AutocompleteOptions::default(), DefaultCallbacks);
    c.handle_event(typed("r"));
    c.handle_event(typed("re"));
    assert!(!c.cache().contains("r"));

    c.handle_event(typed("r"));
    assert_eq!(titles(&c), vec!["Red", "Green"]);
    assert!(!c.cache().contains("re"));
}

#[test]
fn scrolling_down_moves_viewport() {
    let items: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
    let mut c = controller(Resource::local(items), AutocompleteOptions::default(), DefaultCallbacks);
    c.handle_event(typed("item"));

    for _ in 0..6 {
        c.handle_event(key(KeyCode::Down));
    }
    assert_eq!(c.list().highlighted_index(), Some(6));
    assert_eq!(c.surface().viewport().offset, 3);
    assert!(c.surface().calls().contains(&SurfaceCall::ScrollIntoView(6)));

    c.handle_event(InputEvent::Blur);
    c.handle_event(InputEvent::Focus);
    assert_eq!(c.surface().viewport().offset, 3, "scroll position survives hide");
}
