//! Component color semantics and style constants.
//!
//! Color semantics:
//! - Cyan: the prompt and the spinner glyph
//! - Green: confirmed answers, checked choices
//! - Dark gray: placeholders, hints, unchecked choices
//! - Reversed: the text cursor

use ratatui::style::{Color, Modifier, Style};

/// Prompt text in front of every component.
pub const STYLE_PROMPT: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Spinner animation frame.
pub const STYLE_SPINNER: Style = Style::new().fg(Color::Cyan);

/// Text cursor cell.
pub const STYLE_CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Placeholder shown by an empty text field.
pub const STYLE_PLACEHOLDER: Style = Style::new().fg(Color::DarkGray);

/// Submitted answer in the final frame.
pub const STYLE_ANSWER: Style = Style::new().fg(Color::Green);

/// Row under the selection cursor.
pub const STYLE_CURSOR_ROW: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Checkbox: checked.
pub const STYLE_CHECKED: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Checkbox: unchecked.
pub const STYLE_UNCHECKED: Style = Style::new().fg(Color::DarkGray);

/// Footer / key hints.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);
