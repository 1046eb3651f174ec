// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal event routing.
//!
//! Keys go to the controller first, exactly like a browser offers keydown to
//! page scripts before applying its default action. Whatever the controller
//! does not consume is then applied as text editing or focus movement.

use std::cell::RefCell;
use std::rc::Rc;

use bac_core::{AutocompleteController, EventOutcome, HeadlessSurface, InputEvent};
use bac_runtime::AutocompleteRuntime;
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::{debug, trace};

use crate::hit_test::{HitTestRegistry, PanelHit};
use crate::view::{self, ScreenLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Quit,
}

pub struct App {
    runtime: AutocompleteRuntime<HeadlessSurface>,
    hits: HitTestRegistry<PanelHit>,
    last_selected: Rc<RefCell<Option<String>>>,
    max_rows: usize,
    /// The field was focused when the terminal lost focus.
    refocus: bool,
}

impl App {
    /// `last_selected` feeds the status line.
    pub fn new(
        runtime: AutocompleteRuntime<HeadlessSurface>,
        last_selected: Rc<RefCell<Option<String>>>,
    ) -> Self {
        let max_rows = runtime.controller().settings().max_height as usize;
        Self {
            runtime,
            hits: HitTestRegistry::new(),
            last_selected,
            max_rows,
            refocus: false,
        }
    }

    pub fn controller(&self) -> &AutocompleteController<HeadlessSurface> {
        self.runtime.controller()
    }

    pub fn runtime_mut(&mut self) -> &mut AutocompleteRuntime<HeadlessSurface> {
        &mut self.runtime
    }

    pub fn hits(&self) -> &HitTestRegistry<PanelHit> {
        &self.hits
    }

    pub fn into_controller(self) -> AutocompleteController<HeadlessSurface> {
        self.runtime.into_controller()
    }

    /// Runs until the user quits and hands the controller back.
    pub async fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<AutocompleteController<HeadlessSurface>> {
        let mut events = EventStream::new();
        self.draw(terminal)?;

        loop {
            let idle = self.runtime.is_idle();
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        if self.handle_terminal_event(event) == AppFlow::Quit {
                            break;
                        }
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
                _ = self.runtime.tick(), if !idle => {}
            }
            self.draw(terminal)?;
        }
        Ok(self.into_controller())
    }

    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let size = terminal.size()?;
        let rows = ScreenLayout::new(Rect::new(0, 0, size.width, size.height)).panel_rows();
        self.runtime
            .controller_mut()
            .surface_mut()
            .set_rows(rows.min(self.max_rows));

        let status = self.status_line();
        let controller = self.runtime.controller();
        let hits = &mut self.hits;
        terminal.draw(|frame| view::render(frame, controller, &status, hits))?;
        Ok(())
    }

    pub fn handle_terminal_event(&mut self, event: Event) -> AppFlow {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Mouse(mouse) => {
                self.on_mouse(mouse);
                AppFlow::Continue
            }
            Event::FocusLost => {
                self.refocus = self.controller().input().is_focused();
                if self.refocus {
                    self.send(InputEvent::Blur);
                }
                AppFlow::Continue
            }
            Event::FocusGained => {
                if std::mem::take(&mut self.refocus) {
                    self.send(InputEvent::Focus);
                }
                AppFlow::Continue
            }
            _ => AppFlow::Continue,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> AppFlow {
        if key.kind == KeyEventKind::Release {
            return AppFlow::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return AppFlow::Quit;
        }

        if !self.controller().input().is_focused() {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return AppFlow::Quit,
                KeyCode::Char('i') | KeyCode::Enter | KeyCode::Tab => {
                    self.send(InputEvent::Focus);
                }
                _ => {}
            }
            return AppFlow::Continue;
        }

        if self.send(InputEvent::KeyDown(key)) == EventOutcome::Consumed {
            return AppFlow::Continue;
        }

        let mut text = self.controller().input().value().to_owned();
        match key.code {
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => {
                self.send(InputEvent::Blur);
            }
            KeyCode::Char('u') if ctrl => {
                text.clear();
                self.send(InputEvent::Input(text));
            }
            KeyCode::Char(c) if !ctrl => {
                text.push(c);
                self.send(InputEvent::Input(text));
            }
            KeyCode::Backspace => {
                if text.pop().is_some() {
                    self.send(InputEvent::Input(text));
                }
            }
            _ => {}
        }
        AppFlow::Continue
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let hit = self.hits.hit_test(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(PanelHit::Row(index)) = hit {
                    self.send(InputEvent::MouseOver(index));
                    self.send(InputEvent::MouseMove);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Some(PanelHit::Row(index)) => {
                    self.send(InputEvent::MouseDown(Some(index)));
                }
                Some(PanelHit::Panel) => {
                    self.send(InputEvent::MouseDown(None));
                }
                Some(PanelHit::Input) => {
                    if !self.controller().input().is_focused() {
                        self.send(InputEvent::Focus);
                    }
                    self.send(InputEvent::Click);
                }
                None => {
                    if self.controller().input().is_focused() {
                        self.send(InputEvent::Blur);
                    }
                }
            },
            _ => {}
        }
    }

    fn send(&mut self, event: InputEvent) -> EventOutcome {
        trace!(?event, "routing to controller");
        let outcome = self.runtime.handle_event(event);
        if outcome.is_consumed() {
            debug!("event consumed by autocomplete");
        }
        outcome
    }

    fn status_line(&self) -> String {
        let hint = if self.controller().input().is_focused() {
            "Up/Down move, Enter/Tab select, Esc leave field"
        } else {
            "i focus, q quit"
        };
        match self.last_selected.borrow().as_deref() {
            Some(title) => format!("Selected {title} | {hint}"),
            None => hint.to_owned(),
        }
    }
}
