//! Single- and multi-choice list prompt.
//!
//! Key handling is split the same way as everywhere else: `map_key` turns
//! a key into a semantic [`Action`], `SelectionModel::apply` decides what
//! the action means. The visible window is derived while rendering; only
//! the cursor is stored.

use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span, Text};

use crate::error::Result;
use crate::tui::{Cmd, Model, ProgramOptions, TerminalEvent, theme, view};
use crate::types::{Outcome, Status};

use super::host::Host;

/// Rows shown at once unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// KEY MAPPING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    ToggleSelection,
    SelectAll,
    SelectNone,
    Submit,
    Cancel,
}

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always cancels
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Cancel);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(' ') => Some(Action::ToggleSelection),
        KeyCode::Char('a') => Some(Action::SelectAll),
        KeyCode::Char('n') => Some(Action::SelectNone),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Cancel),
        _ => None,
    }
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug)]
pub enum SelectionMsg {
    Terminal(TerminalEvent),
}

impl From<TerminalEvent> for SelectionMsg {
    fn from(event: TerminalEvent) -> Self {
        SelectionMsg::Terminal(event)
    }
}

#[derive(Debug, Clone)]
pub struct SelectionModel {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Allow more than one choice.
    pub multi: bool,
    pub page_size: usize,
    cursor: usize,
    selected: BTreeSet<usize>,
    status: Status,
    cancelled: bool,
}

impl SelectionModel {
    pub fn new(choices: Vec<String>) -> Self {
        SelectionModel {
            prompt: "Select:".to_string(),
            choices,
            multi: false,
            page_size: DEFAULT_PAGE_SIZE,
            cursor: 0,
            selected: BTreeSet::new(),
            status: Status::Normal,
            cancelled: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Selected indices in ascending order, or cancellation.
    pub fn outcome(&self) -> Outcome<Vec<usize>> {
        if self.cancelled {
            Outcome::Cancelled
        } else {
            Outcome::Submitted {
                value: self.selected.iter().copied().collect(),
            }
        }
    }

    /// Cursor movement, selection, submit and cancel.
    pub fn apply(&mut self, action: Action) -> Cmd<SelectionMsg> {
        if self.status.is_quit() {
            return Cmd::none();
        }
        let len = self.choices.len();

        match action {
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::MoveDown => {
                self.cursor = if len == 0 {
                    0
                } else {
                    (self.cursor + 1).min(len - 1)
                };
            }
            Action::ToggleSelection if self.multi && self.cursor < len => {
                if !self.selected.remove(&self.cursor) {
                    self.selected.insert(self.cursor);
                }
            }
            Action::SelectAll if self.multi => {
                self.selected = (0..len).collect();
            }
            Action::SelectNone if self.multi => {
                self.selected.clear();
            }
            Action::Submit => {
                if !self.multi {
                    self.selected.clear();
                    if self.cursor < len {
                        self.selected.insert(self.cursor);
                    }
                }
                self.status = Status::Quit;
                return Cmd::quit();
            }
            Action::Cancel => {
                self.cancelled = true;
                self.status = Status::Quit;
                return Cmd::quit();
            }
            // Selection actions in single mode
            _ => {}
        }
        Cmd::none()
    }

    /// First visible row: the window scrolls just enough to keep the
    /// cursor on screen.
    fn offset(&self) -> usize {
        let page = self.page_size.max(1);
        if self.cursor >= page {
            self.cursor + 1 - page
        } else {
            0
        }
    }

    fn row(&self, index: usize) -> Line<'static> {
        let on_cursor = index == self.cursor;
        let pointer = if on_cursor { "❯ " } else { "  " };
        let label_style = if on_cursor {
            theme::STYLE_CURSOR_ROW
        } else {
            Default::default()
        };

        let mut spans = vec![Span::styled(pointer, theme::STYLE_CURSOR_ROW)];
        if self.multi {
            if self.selected.contains(&index) {
                spans.push(Span::styled("[x] ", theme::STYLE_CHECKED));
            } else {
                spans.push(Span::styled("[ ] ", theme::STYLE_UNCHECKED));
            }
        }
        spans.push(Span::styled(self.choices[index].clone(), label_style));
        Line::from(spans)
    }

    fn summary(&self) -> String {
        self.selected
            .iter()
            .filter_map(|&i| self.choices.get(i))
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Model for SelectionModel {
    type Message = SelectionMsg;

    fn update(&mut self, msg: SelectionMsg) -> Cmd<SelectionMsg> {
        match msg {
            SelectionMsg::Terminal(TerminalEvent::Key(key)) => match map_key(key) {
                Some(action) => self.apply(action),
                None => Cmd::none(),
            },
            SelectionMsg::Terminal(TerminalEvent::Resize { .. }) => Cmd::none(),
        }
    }

    fn view(&self) -> Text<'static> {
        let prompt = Span::styled(self.prompt.clone(), theme::STYLE_PROMPT);

        if self.status.is_quit() {
            let mut spans = vec![prompt];
            if !self.cancelled {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(self.summary(), theme::STYLE_ANSWER));
            }
            return Text::from(Line::from(spans));
        }

        let mut lines = vec![Line::from(prompt)];
        let offset = self.offset();
        let end = (offset + self.page_size.max(1)).min(self.choices.len());
        lines.extend((offset..end).map(|i| self.row(i)));

        let hints: &[(&str, &str)] = if self.multi {
            &[("↑/↓", "move"), ("space", "toggle"), ("a/n", "all/none"), ("enter", "submit")]
        } else {
            &[("↑/↓", "move"), ("enter", "choose"), ("esc", "cancel")]
        };
        lines.push(view::help_line(hints));
        Text::from(lines)
    }
}

// ============================================================================
// COMPONENT
// ============================================================================

/// Blocking list prompt.
#[derive(Debug, Clone)]
pub struct Selection {
    model: SelectionModel,
    options: ProgramOptions,
}

impl Selection {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection {
            model: SelectionModel::new(choices.into_iter().map(Into::into).collect()),
            options: ProgramOptions::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.model.prompt = prompt.into();
        self
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.model.multi = multi;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.model.page_size = page_size.max(1);
        self
    }

    pub fn with_options(mut self, options: ProgramOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the list and block until the user submits or cancels.
    pub fn show(self) -> Result<Outcome<Vec<usize>>> {
        let fallback = self.model.clone();
        let host = Host::new(self.model);
        host.start(self.options)?;
        Ok(host.into_model().unwrap_or(fallback).outcome())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::view::plain;

    fn model(n: usize, multi: bool) -> SelectionModel {
        let mut model = SelectionModel::new((0..n).map(|i| format!("item {i}")).collect());
        model.multi = multi;
        model
    }

    #[test]
    fn ctrl_c_maps_to_cancel() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Cancel));
    }

    #[test]
    fn vim_keys_map_to_movement() {
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        let k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(map_key(j), Some(Action::MoveDown));
        assert_eq!(map_key(k), Some(Action::MoveUp));
    }

    #[test]
    fn space_toggles_selection() {
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(map_key(space), Some(Action::ToggleSelection));
    }

    #[test]
    fn cursor_is_clamped_to_list() {
        let mut m = model(3, false);
        m.apply(Action::MoveUp);
        assert_eq!(m.cursor(), 0);
        for _ in 0..5 {
            m.apply(Action::MoveDown);
        }
        assert_eq!(m.cursor(), 2);
    }

    #[test]
    fn single_mode_submits_cursor_row() {
        let mut m = model(3, false);
        m.apply(Action::MoveDown);
        m.apply(Action::ToggleSelection);
        assert!(m.selected().is_empty());
        assert!(m.apply(Action::Submit).is_quit());
        assert_eq!(m.outcome(), Outcome::Submitted { value: vec![1] });
    }

    #[test]
    fn multi_mode_toggles_and_submits_sorted() {
        let mut m = model(4, true);
        m.apply(Action::MoveDown);
        m.apply(Action::MoveDown);
        m.apply(Action::ToggleSelection);
        m.apply(Action::MoveUp);
        m.apply(Action::MoveUp);
        m.apply(Action::ToggleSelection);
        m.apply(Action::Submit);
        assert_eq!(m.outcome(), Outcome::Submitted { value: vec![0, 2] });
    }

    #[test]
    fn toggle_twice_deselects() {
        let mut m = model(2, true);
        m.apply(Action::ToggleSelection);
        m.apply(Action::ToggleSelection);
        assert!(m.selected().is_empty());
    }

    #[test]
    fn select_all_and_none() {
        let mut m = model(3, true);
        m.apply(Action::SelectAll);
        assert_eq!(m.selected().len(), 3);
        m.apply(Action::SelectNone);
        assert!(m.selected().is_empty());
    }

    #[test]
    fn cancel_discards_selection() {
        let mut m = model(3, true);
        m.apply(Action::SelectAll);
        m.apply(Action::Cancel);
        assert_eq!(m.outcome(), Outcome::Cancelled);
        assert_eq!(m.status(), Status::Quit);
    }

    #[test]
    fn actions_after_quit_are_ignored() {
        let mut m = model(3, false);
        m.apply(Action::Submit);
        assert!(m.apply(Action::MoveDown).is_none());
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn empty_list_submits_nothing() {
        let mut m = model(0, false);
        m.apply(Action::MoveDown);
        m.apply(Action::Submit);
        assert_eq!(m.outcome(), Outcome::Submitted { value: vec![] });
    }

    #[test]
    fn window_scrolls_with_cursor() {
        let mut m = model(10, false);
        m.page_size = 3;
        for _ in 0..4 {
            m.apply(Action::MoveDown);
        }
        let rendered = plain(&m.view());
        assert!(rendered.contains("❯ item 4"));
        assert!(rendered.contains("item 2"));
        assert!(!rendered.contains("item 1"));
        assert!(!rendered.contains("item 5"));
    }

    #[test]
    fn final_frame_lists_chosen_items() {
        let mut m = model(3, true);
        m.prompt = "Pick:".to_string();
        m.apply(Action::SelectAll);
        m.apply(Action::Submit);
        assert_eq!(plain(&m.view()), "Pick: item 0, item 1, item 2");
    }

    #[test]
    fn multi_rows_show_checkboxes() {
        let mut m = model(2, true);
        m.apply(Action::ToggleSelection);
        let rendered = plain(&m.view());
        assert!(rendered.contains("❯ [x] item 0"));
        assert!(rendered.contains("  [ ] item 1"));
    }
}
