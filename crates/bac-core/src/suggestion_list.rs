// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Render plan and highlight cursor for one query's results.

use crate::suggestion::Suggestion;

/// A result row in the render plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Ordinal among result rows; headings are not counted.
    pub index: usize,
    pub suggestion: Suggestion,
    /// Output of the result formatter.
    pub fragment: String,
    /// Extra style classes from the result's `addClass` field.
    pub add_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    Heading(String),
    Result(ResultRow),
}

impl RenderItem {
    pub fn is_heading(&self) -> bool {
        matches!(self, RenderItem::Heading(_))
    }

    pub fn as_result(&self) -> Option<&ResultRow> {
        match self {
            RenderItem::Result(row) => Some(row),
            RenderItem::Heading(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionListModel {
    items: Vec<RenderItem>,
    /// Plan position of each result row, by ordinal.
    rows: Vec<usize>,
    highlighted: Option<usize>,
}

impl SuggestionListModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the plan with one derived from `results`.
    ///
    /// A heading is emitted whenever a result's group differs from the group
    /// of the previously emitted result, so a run of same-group results shares
    /// one heading and group-less results follow the run before them.
    /// Interleaved groups get a heading per run. Results the formatter rejects
    /// are left out. Returns whether any result row was produced.
    pub fn rebuild<F, G>(&mut self, results: &[Suggestion], mut format: F, mut group_of: G) -> bool
    where
        F: FnMut(&Suggestion) -> Option<String>,
        G: FnMut(&Suggestion) -> Option<String>,
    {
        self.clear();
        let mut previous_group: Option<String> = None;

        for suggestion in results {
            let Some(fragment) = format(suggestion) else {
                continue;
            };
            let group = group_of(suggestion);
            if let Some(name) = &group {
                if previous_group.as_ref() != Some(name) {
                    self.items.push(RenderItem::Heading(name.clone()));
                }
            }
            previous_group = group;

            self.rows.push(self.items.len());
            self.items.push(RenderItem::Result(ResultRow {
                index: self.rows.len() - 1,
                suggestion: suggestion.clone(),
                fragment,
                add_class: suggestion.add_class().map(str::to_owned),
            }));
        }

        !self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.rows.clear();
        self.highlighted = None;
    }

    /// Whether the plan has no result rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of result rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn row(&self, index: usize) -> Option<&ResultRow> {
        self.rows
            .get(index)
            .and_then(|&position| self.items.get(position))
            .and_then(RenderItem::as_result)
    }

    /// Highlight the row at `index`, clamped into range. Returns the row
    /// actually highlighted, or `None` when there are no rows.
    pub fn set_highlight(&mut self, index: usize) -> Option<usize> {
        let last = self.rows.len().checked_sub(1)?;
        let index = index.min(last);
        self.highlighted = Some(index);
        Some(index)
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted(&self) -> Option<&Suggestion> {
        self.highlighted.and_then(|index| self.row(index)).map(|row| &row.suggestion)
    }

    /// Step the highlight without wrapping. Does nothing when nothing is
    /// highlighted.
    pub fn move_highlight(&mut self, direction: Direction) -> Option<usize> {
        let current = self.highlighted?;
        let next = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => current + 1,
        };
        self.set_highlight(next)
    }

    /// Plan position of the row at `index`.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.rows.get(index).copied()
    }

    /// Plan position to bring into view for the row at `index`. Moving upward
    /// onto a row directly under a heading targets the heading instead.
    pub fn scroll_target(&self, index: usize, upward: bool) -> Option<usize> {
        let position = self.position_of(index)?;
        let under_heading = position
            .checked_sub(1)
            .and_then(|above| self.items.get(above))
            .is_some_and(RenderItem::is_heading);
        if upward && under_heading {
            Some(position - 1)
        } else {
            Some(position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn title(s: &Suggestion) -> Option<String> {
        s.title().map(str::to_owned)
    }

    fn group(s: &Suggestion) -> Option<String> {
        s.group().map(str::to_owned)
    }

    fn shape(model: &SuggestionListModel) -> Vec<String> {
        model
            .items()
            .iter()
            .map(|item| match item {
                RenderItem::Heading(name) => format!("# {name}"),
                RenderItem::Result(row) => format!("{}:{}", row.index, row.fragment),
            })
            .collect()
    }

    fn results(values: serde_json::Value) -> Vec<Suggestion> {
        serde_json::from_value(values).expect("suggestions")
    }

    #[test]
    fn group_run_is_followed_by_groupless_result() {
        let mut model = SuggestionListModel::new();
        let input = results(json!([
            {"title": "A", "group": "G1"},
            {"title": "B", "group": "G1"},
            {"title": "C"},
        ]));

        assert!(model.rebuild(&input, title, group));
        assert_eq!(shape(&model), vec!["# G1", "0:A", "1:B", "2:C"]);
    }

    #[test]
    fn interleaved_groups_repeat_headings() {
        let mut model = SuggestionListModel::new();
        let input = results(json!([
            {"title": "A", "group": "G1"},
            {"title": "B", "group": "G2"},
            {"title": "C", "group": "G1"},
        ]));

        model.rebuild(&input, title, group);
        assert_eq!(shape(&model), vec!["# G1", "0:A", "# G2", "1:B", "# G1", "2:C"]);
    }

    #[test]
    fn rejected_results_are_skipped_and_not_indexed() {
        let mut model = SuggestionListModel::new();
        let input = results(json!([{"title": "A"}, "bare", {"description": "untitled"}, {"title": "B", "addClass": "hot"}]));

        assert!(model.rebuild(&input, title, group));
        assert_eq!(shape(&model), vec!["0:A", "1:B"]);
        assert_eq!(model.row(1).and_then(|r| r.add_class.as_deref()), Some("hot"));

        assert!(!model.rebuild(&results(json!(["bare"])), title, group));
        assert!(model.is_empty());
    }

    #[test]
    fn highlight_is_clamped_and_never_wraps() {
        let mut model = SuggestionListModel::new();
        model.rebuild(&results(json!([{"title": "A"}, {"title": "B"}, {"title": "C"}])), title, group);

        assert_eq!(model.move_highlight(Direction::Down), None, "nothing highlighted yet");
        assert_eq!(model.set_highlight(10), Some(2));
        assert_eq!(model.move_highlight(Direction::Down), Some(2));
        assert_eq!(model.set_highlight(0), Some(0));
        assert_eq!(model.move_highlight(Direction::Up), Some(0));
        assert_eq!(model.move_highlight(Direction::Down), Some(1));
        assert_eq!(model.highlighted().and_then(Suggestion::title), Some("B"));
    }

    #[test]
    fn empty_list_cannot_be_highlighted() {
        let mut model = SuggestionListModel::new();
        assert_eq!(model.set_highlight(0), None);
        assert_eq!(model.highlighted(), None);
    }

    #[test]
    fn moving_up_onto_first_group_member_reveals_heading() {
        let mut model = SuggestionListModel::new();
        model.rebuild(
            &results(json!([
                {"title": "A"},
                {"title": "B", "group": "G1"},
                {"title": "C", "group": "G1"},
            ])),
            title,
            group,
        );

        // Plan: A, # G1, B, C
        assert_eq!(model.scroll_target(1, true), Some(1));
        assert_eq!(model.scroll_target(1, false), Some(2));
        assert_eq!(model.scroll_target(2, true), Some(3));
        assert_eq!(model.scroll_target(0, true), Some(0));
        assert_eq!(model.scroll_target(7, true), None);
    }
}
