// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal front end for the autocomplete controller.
//!
//! The controller draws into a [`bac_core::HeadlessSurface`]; this crate
//! paints that surface with Ratatui and turns crossterm key and mouse events
//! into controller input.

pub mod app;
pub mod demo;
pub mod terminal;
pub mod view;

pub use app::{App, AppFlow};
pub use demo::{DemoCallbacks, colors, demo_controller};
pub use hit_test::{HitTestRegistry, PanelHit};
pub use terminal::{TerminalConfig, cleanup_terminal, setup_terminal};
