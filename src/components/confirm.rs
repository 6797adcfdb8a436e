//! Yes/no prompt with a default answer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span, Text};

use crate::error::Result;
use crate::tui::{Cmd, Model, ProgramOptions, TerminalEvent, theme};
use crate::types::{Outcome, Status};

use super::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Yes,
    No,
    Default,
    Cancel,
}

pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Cancel);
    }

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Yes),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::No),
        KeyCode::Enter => Some(Action::Default),
        KeyCode::Esc => Some(Action::Cancel),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfirmMsg {
    Terminal(TerminalEvent),
}

impl From<TerminalEvent> for ConfirmMsg {
    fn from(event: TerminalEvent) -> Self {
        ConfirmMsg::Terminal(event)
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmModel {
    pub prompt: String,
    pub default: bool,
    answer: Option<bool>,
    status: Status,
}

impl ConfirmModel {
    pub fn new(prompt: impl Into<String>) -> Self {
        ConfirmModel {
            prompt: prompt.into(),
            default: false,
            answer: None,
            status: Status::Normal,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn outcome(&self) -> Outcome<bool> {
        match self.answer {
            Some(value) => Outcome::Submitted { value },
            None => Outcome::Cancelled,
        }
    }

    pub fn apply(&mut self, action: Action) -> Cmd<ConfirmMsg> {
        if self.status.is_quit() {
            return Cmd::none();
        }
        self.answer = match action {
            Action::Yes => Some(true),
            Action::No => Some(false),
            Action::Default => Some(self.default),
            Action::Cancel => None,
        };
        self.status = Status::Quit;
        Cmd::quit()
    }
}

impl Model for ConfirmModel {
    type Message = ConfirmMsg;

    fn update(&mut self, msg: ConfirmMsg) -> Cmd<ConfirmMsg> {
        match msg {
            ConfirmMsg::Terminal(TerminalEvent::Key(key)) => match map_key(key) {
                Some(action) => self.apply(action),
                None => Cmd::none(),
            },
            ConfirmMsg::Terminal(TerminalEvent::Resize { .. }) => Cmd::none(),
        }
    }

    fn view(&self) -> Text<'static> {
        let mut spans = vec![
            Span::styled(self.prompt.clone(), theme::STYLE_PROMPT),
            Span::raw(" "),
        ];
        match (self.status.is_quit(), self.answer) {
            (true, Some(true)) => spans.push(Span::styled("yes", theme::STYLE_ANSWER)),
            (true, Some(false)) => spans.push(Span::styled("no", theme::STYLE_ANSWER)),
            (true, None) => {}
            (false, _) => {
                let hint = if self.default { "(Y/n)" } else { "(y/N)" };
                spans.push(Span::styled(hint, theme::STYLE_HELP));
            }
        }
        Text::from(Line::from(spans))
    }
}

/// Blocking yes/no prompt.
#[derive(Debug, Clone)]
pub struct Confirm {
    model: ConfirmModel,
    options: ProgramOptions,
}

impl Confirm {
    pub fn new(prompt: impl Into<String>) -> Self {
        Confirm {
            model: ConfirmModel::new(prompt),
            options: ProgramOptions::default(),
        }
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.model.default = default;
        self
    }

    pub fn with_options(mut self, options: ProgramOptions) -> Self {
        self.options = options;
        self
    }

    pub fn show(self) -> Result<Outcome<bool>> {
        let fallback = self.model.clone();
        let host = Host::new(self.model);
        host.start(self.options)?;
        Ok(host.into_model().unwrap_or(fallback).outcome())
    }
}
