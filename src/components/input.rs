//! Single-line text prompt.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span, Text};

use crate::error::Result;
use crate::tui::field::TextField;
use crate::tui::{Cmd, Model, ProgramOptions, TerminalEvent, theme};
use crate::types::{CursorMode, DEFAULT_BLINK_SPEED, EchoMode, Outcome, Status};

use super::host::Host;

// ============================================================================
// KEY MAPPING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Submit,
    Cancel,
}

/// Map a key press to an editing action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Cancel),
            KeyCode::Char('a') => Some(Action::Home),
            KeyCode::Char('e') => Some(Action::End),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(Action::Insert(c)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete => Some(Action::Delete),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Home => Some(Action::Home),
        KeyCode::End => Some(Action::End),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        _ => None,
    }
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug)]
pub enum InputMsg {
    Blink,
    Terminal(TerminalEvent),
}

impl From<TerminalEvent> for InputMsg {
    fn from(event: TerminalEvent) -> Self {
        InputMsg::Terminal(event)
    }
}

#[derive(Debug, Clone)]
pub struct InputModel {
    pub prompt: String,
    pub field: TextField,
    status: Status,
    cancelled: bool,
}

impl Default for InputModel {
    fn default() -> Self {
        InputModel {
            prompt: "> ".to_string(),
            field: TextField::new(),
            status: Status::Focus,
            cancelled: false,
        }
    }
}

impl InputModel {
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn value(&self) -> String {
        self.field.value()
    }

    pub fn focus(&mut self) -> Cmd<InputMsg> {
        self.status = Status::Focus;
        self.field.focus();
        self.blink_cmd()
    }

    pub fn blur(&mut self) {
        self.status = Status::Blur;
        self.field.blur();
    }

    pub fn outcome(&self) -> Outcome<String> {
        if self.cancelled {
            Outcome::Cancelled
        } else {
            Outcome::Submitted {
                value: self.value(),
            }
        }
    }

    fn blink_cmd(&self) -> Cmd<InputMsg> {
        if self.status == Status::Focus
            && CursorMode::from(self.field.cursor_mode) == CursorMode::Blink
        {
            Cmd::tick(DEFAULT_BLINK_SPEED, InputMsg::Blink)
        } else {
            Cmd::none()
        }
    }

    /// Apply one action. Editing only happens while focused.
    pub fn apply(&mut self, action: Action) -> Cmd<InputMsg> {
        if self.status != Status::Focus {
            return Cmd::none();
        }
        match action {
            Action::Insert(c) => self.field.insert(c),
            Action::Backspace => self.field.backspace(),
            Action::Delete => self.field.delete(),
            Action::Left => self.field.move_left(),
            Action::Right => self.field.move_right(),
            Action::Home => self.field.move_home(),
            Action::End => self.field.move_end(),
            Action::Submit => {
                self.status = Status::Quit;
                return Cmd::quit();
            }
            Action::Cancel => {
                self.cancelled = true;
                self.status = Status::Quit;
                return Cmd::quit();
            }
        }
        Cmd::none()
    }
}

impl Model for InputModel {
    type Message = InputMsg;

    fn init(&mut self) -> Cmd<InputMsg> {
        self.blink_cmd()
    }

    fn update(&mut self, msg: InputMsg) -> Cmd<InputMsg> {
        match msg {
            InputMsg::Blink => {
                if self.status != Status::Focus {
                    return Cmd::none();
                }
                self.field.blink();
                self.blink_cmd()
            }
            InputMsg::Terminal(TerminalEvent::Key(key)) => match map_key(key) {
                Some(action) => self.apply(action),
                None => Cmd::none(),
            },
            InputMsg::Terminal(TerminalEvent::Resize { .. }) => Cmd::none(),
        }
    }

    fn view(&self) -> Text<'static> {
        let mut spans = vec![Span::styled(self.prompt.clone(), theme::STYLE_PROMPT)];
        if self.status.is_quit() {
            if !self.cancelled {
                spans.push(Span::styled(self.field.display(), theme::STYLE_ANSWER));
            }
        } else {
            spans.extend(self.field.spans());
        }
        Text::from(Line::from(spans))
    }
}

// ============================================================================
// COMPONENT
// ============================================================================

/// Blocking text prompt.
#[derive(Debug, Clone, Default)]
pub struct Input {
    model: InputModel,
    options: ProgramOptions,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.model.prompt = prompt.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.model.field.placeholder = placeholder.into();
        self
    }

    pub fn with_default_value(mut self, value: &str) -> Self {
        self.model.field.set_value(value);
        self
    }

    pub fn with_echo_mode(mut self, mode: EchoMode) -> Self {
        self.model.field.echo_mode = mode.into();
        self
    }

    pub fn with_echo_char(mut self, c: char) -> Self {
        self.model.field.echo_char = c;
        self
    }

    pub fn with_cursor_mode(mut self, mode: CursorMode) -> Self {
        self.model.field.cursor_mode = mode.into();
        self
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.model.field.char_limit = limit;
        self
    }

    pub fn with_options(mut self, options: ProgramOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the prompt and block until the user submits or cancels.
    pub fn show(self) -> Result<Outcome<String>> {
        let host = Host::new(self.model);
        host.start(self.options)?;
        let model = host.into_model().unwrap_or_default();
        Ok(model.outcome())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::view::plain;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(model: &mut InputModel, code: KeyCode) -> Cmd<InputMsg> {
        model.update(InputMsg::Terminal(TerminalEvent::Key(key(code))))
    }

    fn type_str(model: &mut InputModel, s: &str) {
        for c in s.chars() {
            press(model, KeyCode::Char(c));
        }
    }

    #[test]
    fn printable_keys_insert() {
        assert_eq!(map_key(key(KeyCode::Char('x'))), Some(Action::Insert('x')));
    }

    #[test]
    fn ctrl_c_cancels() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Action::Cancel));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Cancel));
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(key(KeyCode::F(2))), None);
    }

    #[test]
    fn typing_then_enter_submits_value() {
        let mut model = InputModel::default();
        type_str(&mut model, "hello");
        let cmd = press(&mut model, KeyCode::Enter);
        assert!(cmd.is_quit());
        assert_eq!(model.status(), Status::Quit);
        assert_eq!(
            model.outcome(),
            Outcome::Submitted {
                value: "hello".to_string()
            }
        );
    }

    #[test]
    fn esc_cancels() {
        let mut model = InputModel::default();
        type_str(&mut model, "abc");
        press(&mut model, KeyCode::Esc);
        assert_eq!(model.outcome(), Outcome::Cancelled);
    }

    #[test]
    fn blurred_input_ignores_keys() {
        let mut model = InputModel::default();
        model.blur();
        type_str(&mut model, "abc");
        assert_eq!(model.value(), "");
        assert!(model.update(InputMsg::Blink).is_none());

        assert!(matches!(model.focus(), Cmd::Tick(..)));
        type_str(&mut model, "ok");
        assert_eq!(model.value(), "ok");
    }

    #[test]
    fn static_cursor_never_schedules_blink() {
        let mut model = InputModel::default();
        model.field.cursor_mode = CursorMode::Static.into();
        assert!(model.init().is_none());
    }

    #[test]
    fn final_frame_masks_password() {
        let mut model = InputModel {
            prompt: "pw: ".to_string(),
            ..Default::default()
        };
        model.field.echo_mode = EchoMode::Password.into();
        type_str(&mut model, "abc");
        press(&mut model, KeyCode::Enter);
        assert_eq!(plain(&model.view()), "pw: ***");
        assert_eq!(model.value(), "abc");
    }

    #[test]
    fn headless_show_without_input_submits_default() {
        // No key reader: the only way out is a message, so start the host
        // directly and submit from outside.
        let mut model = InputModel::default();
        model.field.set_value("preset");
        let host = std::sync::Arc::new(Host::new(model));
        let run = host.start_background(ProgramOptions::headless(20, 1)).unwrap();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        host.send(InputMsg::Terminal(TerminalEvent::Key(enter)));
        run.wait().unwrap();

        let outcome = host.with_model(InputModel::outcome).unwrap();
        assert_eq!(
            outcome,
            Outcome::Submitted {
                value: "preset".to_string()
            }
        );
    }
}
