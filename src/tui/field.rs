//! Single-line editable text field.
//!
//! Owns the buffer, cursor position, echo masking and cursor blink phase.
//! Components wrap it with a prompt and key handling.

use ratatui::text::{Line, Span};

use super::theme;

/// Cursor drawing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Blink,
    Static,
    Hide,
}

/// How typed characters are echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    #[default]
    Normal,
    Password,
    None,
}

#[derive(Debug, Clone)]
pub struct TextField {
    value: Vec<char>,
    /// Insertion point, `0..=value.len()`.
    pos: usize,
    pub echo_mode: EchoMode,
    pub echo_char: char,
    pub cursor_mode: CursorMode,
    /// Maximum number of characters; 0 means unlimited.
    pub char_limit: usize,
    pub placeholder: String,
    focused: bool,
    /// Blink phase: whether the cursor cell is currently drawn.
    cursor_on: bool,
}

impl Default for TextField {
    fn default() -> Self {
        TextField {
            value: Vec::new(),
            pos: 0,
            echo_mode: EchoMode::Normal,
            echo_char: '*',
            cursor_mode: CursorMode::Blink,
            char_limit: 0,
            placeholder: String::new(),
            focused: true,
            cursor_on: true,
        }
    }
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replace the content and move the cursor to the end.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().collect();
        if self.char_limit > 0 {
            self.value.truncate(self.char_limit);
        }
        self.pos = self.value.len();
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    /// Insert at the cursor. Ignored once the limit is reached.
    pub fn insert(&mut self, c: char) {
        if self.char_limit > 0 && self.value.len() >= self.char_limit {
            return;
        }
        self.value.insert(self.pos, c);
        self.pos += 1;
        self.reset_blink();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
            self.value.remove(self.pos);
        }
        self.reset_blink();
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.pos < self.value.len() {
            self.value.remove(self.pos);
        }
        self.reset_blink();
    }

    pub fn move_left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
        self.reset_blink();
    }

    pub fn move_right(&mut self) {
        self.pos = (self.pos + 1).min(self.value.len());
        self.reset_blink();
    }

    pub fn move_home(&mut self) {
        self.pos = 0;
        self.reset_blink();
    }

    pub fn move_end(&mut self) {
        self.pos = self.value.len();
        self.reset_blink();
    }

    // ------------------------------------------------------------------------
    // Focus and blink
    // ------------------------------------------------------------------------

    pub fn focus(&mut self) {
        self.focused = true;
        self.reset_blink();
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Advance the blink phase. Only blinking cursors change.
    pub fn blink(&mut self) {
        if self.cursor_mode == CursorMode::Blink {
            self.cursor_on = !self.cursor_on;
        }
    }

    fn reset_blink(&mut self) {
        self.cursor_on = true;
    }

    /// Whether the cursor cell is drawn right now.
    pub fn cursor_visible(&self) -> bool {
        self.focused
            && match self.cursor_mode {
                CursorMode::Blink => self.cursor_on,
                CursorMode::Static => true,
                CursorMode::Hide => false,
            }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// The buffer as it should appear on screen.
    pub fn display(&self) -> String {
        match self.echo_mode {
            EchoMode::Normal => self.value(),
            EchoMode::Password => self.value.iter().map(|_| self.echo_char).collect(),
            EchoMode::None => String::new(),
        }
    }

    /// Styled spans for the field, cursor cell included.
    pub fn spans(&self) -> Vec<Span<'static>> {
        if self.value.is_empty() && !self.placeholder.is_empty() {
            return self.placeholder_spans();
        }

        let shown: Vec<char> = self.display().chars().collect();
        // With EchoMode::None nothing is shown, so the cursor stays at 0.
        let pos = self.pos.min(shown.len());
        let before: String = shown[..pos].iter().collect();

        let mut spans = vec![Span::raw(before)];
        if self.cursor_visible() {
            let under = shown.get(pos).map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
            spans.push(Span::styled(under, theme::STYLE_CURSOR));
            let after: String = shown.iter().skip(pos + 1).collect();
            spans.push(Span::raw(after));
        } else {
            let after: String = shown[pos..].iter().collect();
            spans.push(Span::raw(after));
        }
        spans
    }

    fn placeholder_spans(&self) -> Vec<Span<'static>> {
        let mut chars = self.placeholder.chars();
        if self.cursor_visible() {
            let first = chars.next().map(String::from).unwrap_or_default();
            vec![
                Span::styled(first, theme::STYLE_CURSOR),
                Span::styled(chars.collect::<String>(), theme::STYLE_PLACEHOLDER),
            ]
        } else {
            vec![Span::styled(self.placeholder.clone(), theme::STYLE_PLACEHOLDER)]
        }
    }

    pub fn line(&self) -> Line<'static> {
        Line::from(self.spans())
    }
}

// ============================================================================
// TESTS
// ============================================================================
