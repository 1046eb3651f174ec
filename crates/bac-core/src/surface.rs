// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The panel the suggestions are drawn on.
//!
//! The controller decides what is shown and when; a [`PresentationSurface`]
//! decides how. Positions passed to the surface are render plan positions
//! (headings included), highlight indices are result row ordinals.

use crate::suggestion_list::RenderItem;

pub trait PresentationSurface {
    /// Called once when the controller attaches.
    fn mount(&mut self, _max_height: u32) {}

    /// Replace the panel contents with `plan`.
    fn render(&mut self, plan: &[RenderItem]);

    fn clear(&mut self);

    fn highlight(&mut self, index: Option<usize>);

    fn scroll_into_view(&mut self, position: usize);

    fn show(&mut self);

    /// Hide the panel, keeping its contents and scroll position.
    fn hide(&mut self);

    /// Called once when the controller is destroyed.
    fn remove(&mut self) {}
}

/// A window of `height` plan positions starting at `offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { offset: 0, height }
    }

    /// Shift the window the minimum amount needed to contain `position`.
    pub fn scroll_into_view(&mut self, position: usize) {
        if self.height == 0 {
            return;
        }
        if position < self.offset {
            self.offset = position;
        } else if position >= self.offset + self.height {
            self.offset = position + 1 - self.height;
        }
    }

    /// Visible positions of a plan with `total` items.
    pub fn visible_range(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(total);
        let end = (self.offset + self.height).min(total);
        start..end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Mount(u32),
    Render(usize),
    Clear,
    Highlight(Option<usize>),
    ScrollIntoView(usize),
    Show,
    Hide,
    Remove,
}

/// In-memory surface that tracks panel state and records every call.
///
/// Terminal front ends draw from its state; tests assert on it.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    items: Vec<RenderItem>,
    highlighted: Option<usize>,
    visible: bool,
    mounted: bool,
    removed: bool,
    viewport: Viewport,
    calls: Vec<SurfaceCall>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose viewport shows `rows` plan positions at a time.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            viewport: Viewport::new(rows),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change how many rows fit, e.g. after a terminal resize.
    pub fn set_rows(&mut self, rows: usize) {
        self.viewport.height = rows;
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }
}

impl PresentationSurface for HeadlessSurface {
    fn mount(&mut self, max_height: u32) {
        self.mounted = true;
        if self.viewport.height == 0 {
            self.viewport.height = max_height as usize;
        }
        self.calls.push(SurfaceCall::Mount(max_height));
    }

    fn render(&mut self, plan: &[RenderItem]) {
        self.items = plan.to_vec();
        self.highlighted = None;
        self.viewport.offset = 0;
        self.calls.push(SurfaceCall::Render(plan.len()));
    }

    fn clear(&mut self) {
        self.items.clear();
        self.highlighted = None;
        self.viewport.offset = 0;
        self.calls.push(SurfaceCall::Clear);
    }

    fn highlight(&mut self, index: Option<usize>) {
        self.highlighted = index;
        self.calls.push(SurfaceCall::Highlight(index));
    }

    fn scroll_into_view(&mut self, position: usize) {
        self.viewport.scroll_into_view(position);
        self.calls.push(SurfaceCall::ScrollIntoView(position));
    }

    fn show(&mut self) {
        self.visible = true;
        self.calls.push(SurfaceCall::Show);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.calls.push(SurfaceCall::Hide);
    }

    fn remove(&mut self) {
        self.visible = false;
        self.removed = true;
        self.items.clear();
        self.calls.push(SurfaceCall::Remove);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_scrolls_minimally() {
        let mut viewport = Viewport::new(3);
        viewport.scroll_into_view(1);
        assert_eq!(viewport.offset, 0);
        viewport.scroll_into_view(4);
        assert_eq!(viewport.offset, 2);
        viewport.scroll_into_view(3);
        assert_eq!(viewport.offset, 2);
        viewport.scroll_into_view(0);
        assert_eq!(viewport.offset, 0);
        assert_eq!(viewport.visible_range(2), 0..2);
    }

    #[test]
    fn hide_preserves_scroll_position() {
        let mut surface = HeadlessSurface::with_rows(2);
        surface.render(&[
            RenderItem::Heading("a".into()),
            RenderItem::Heading("b".into()),
            RenderItem::Heading("c".into()),
        ]);
        surface.scroll_into_view(2);
        surface.hide();
        surface.show();
        assert_eq!(surface.viewport().offset, 1);
        assert!(surface.is_visible());

        surface.clear();
        assert_eq!(surface.viewport().offset, 0);
    }

    #[test]
    fn mount_uses_max_height_when_rows_unset() {
        let mut surface = HeadlessSurface::new();
        surface.mount(330);
        assert_eq!(surface.viewport().height, 330);

        let mut sized = HeadlessSurface::with_rows(8);
        sized.mount(330);
        assert_eq!(sized.viewport().height, 8);
        assert_eq!(sized.take_calls(), vec![SurfaceCall::Mount(330)]);
        assert!(sized.calls().is_empty());
    }
}
