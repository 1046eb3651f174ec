// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Draws the input field and the suggestion panel.

use bac_core::{AutocompleteController, HeadlessSurface, RenderItem, ResultRow};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::hit_test::{HitTestRegistry, PanelHit};

const INPUT_HEIGHT: u16 = 3;
const PANEL_BORDER: u16 = 2;

/// Screen regions of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub input: Rect,
    pub body: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let [title, input, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        Self {
            title,
            input,
            body,
            status,
        }
    }

    /// Rows the panel can show inside its border.
    pub fn panel_rows(&self) -> usize {
        self.body.height.saturating_sub(PANEL_BORDER) as usize
    }
}

pub fn render(
    frame: &mut Frame<'_>,
    controller: &AutocompleteController<HeadlessSurface>,
    status: &str,
    hits: &mut HitTestRegistry<PanelHit>,
) {
    hits.clear();
    let layout = ScreenLayout::new(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "better-autocomplete",
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        layout.title,
    );

    render_input(frame, controller, layout.input, hits);
    render_panel(frame, controller.surface(), layout.input, layout.body, hits);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(status.to_owned(), Style::default().fg(Color::DarkGray)))),
        layout.status,
    );
}

fn render_input(
    frame: &mut Frame<'_>,
    controller: &AutocompleteController<HeadlessSurface>,
    area: Rect,
    hits: &mut HitTestRegistry<PanelHit>,
) {
    let input = controller.input();
    let mut title = String::from("Search");
    if input.is_fetching() {
        title.push_str(" (fetching)");
    }
    let border = if input.is_focused() { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);

    frame.render_widget(Paragraph::new(input.value().to_owned()).block(block), area);
    hits.register(area, PanelHit::Input);

    if input.is_focused() && inner.width > 0 {
        let width = u16::try_from(UnicodeWidthStr::width(input.value())).unwrap_or(u16::MAX);
        frame.set_cursor_position((inner.x + width.min(inner.width - 1), inner.y));
    }
}

fn render_panel(
    frame: &mut Frame<'_>,
    surface: &HeadlessSurface,
    input: Rect,
    body: Rect,
    hits: &mut HitTestRegistry<PanelHit>,
) {
    let items = surface.items();
    if !surface.is_visible() || items.is_empty() || body.height <= PANEL_BORDER {
        return;
    }

    let range = surface.viewport().visible_range(items.len());
    let visible = &items[range];
    let height = (visible.len() as u16 + PANEL_BORDER).min(body.height);
    let panel = Rect {
        x: input.x,
        y: body.y,
        width: input.width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(panel);

    frame.render_widget(Clear, panel);
    hits.register(panel, PanelHit::Panel);
    for (offset, item) in visible.iter().enumerate().take(inner.height as usize) {
        if let RenderItem::Result(row) = item {
            let rect = Rect {
                x: inner.x,
                y: inner.y + offset as u16,
                width: inner.width,
                height: 1,
            };
            hits.register(rect, PanelHit::Row(row.index));
        }
    }

    let highlighted = surface.highlighted();
    let list_items: Vec<ListItem> = visible
        .iter()
        .map(|item| match item {
            RenderItem::Heading(name) => ListItem::new(Line::from(Span::styled(
                name.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))),
            RenderItem::Result(row) => result_item(row, highlighted == Some(row.index)),
        })
        .collect();

    frame.render_widget(List::new(list_items).block(block), panel);
}

fn result_item(row: &ResultRow, highlighted: bool) -> ListItem<'static> {
    let mut style = class_style(row.add_class.as_deref());
    if highlighted {
        style = style.add_modifier(Modifier::REVERSED);
    }
    ListItem::new(Line::from(Span::styled(format!("  {}", row.fragment), style)))
}

/// Terminal styling for the result classes the demo knows about.
fn class_style(classes: Option<&str>) -> Style {
    classes
        .into_iter()
        .flat_map(str::split_whitespace)
        .fold(Style::default(), |style, class| match class {
            "bold" => style.add_modifier(Modifier::BOLD),
            "italic" => style.add_modifier(Modifier::ITALIC),
            "dim" => style.add_modifier(Modifier::DIM),
            _ => style,
        })
}
