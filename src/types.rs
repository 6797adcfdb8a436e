//! Domain types shared by every component.
//!
//! `CursorMode` and `EchoMode` mirror the text field's own enums in
//! [`crate::tui::field`]. The conversions between the two are total; a raw
//! discriminant outside the three known variants is a contract violation
//! between this crate and its runtime, so it panics instead of returning an
//! error.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::tui::field;

/// Default interval between cursor blink phases.
pub const DEFAULT_BLINK_SPEED: Duration = Duration::from_millis(530);

// ============================================================================
// STATUS
// ============================================================================

/// Externally observable state of an interactive component.
///
/// Embedding components read this to decide what to render and whether
/// the loop should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Accepting input (text input only).
    Focus,
    /// Visible but not accepting input (text input only).
    Blur,
    /// Finished; the final frame is being rendered.
    Quit,
    #[default]
    Normal,
}

impl Status {
    pub fn is_quit(self) -> bool {
        self == Status::Quit
    }
}

// ============================================================================
// CURSOR MODE
// ============================================================================

/// How the text input cursor is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Blink,
    Static,
    Hide,
}

impl CursorMode {
    /// Decode a raw discriminant.
    ///
    /// # Panics
    ///
    /// Panics for any value other than 0, 1 or 2.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => CursorMode::Blink,
            1 => CursorMode::Static,
            2 => CursorMode::Hide,
            other => panic!("unknown cursor mode: {other}"),
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            CursorMode::Blink => 0,
            CursorMode::Static => 1,
            CursorMode::Hide => 2,
        }
    }
}

impl fmt::Display for CursorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CursorMode::Blink => "blink",
            CursorMode::Static => "static",
            CursorMode::Hide => "hidden",
        };
        f.write_str(name)
    }
}

impl From<CursorMode> for field::CursorMode {
    fn from(mode: CursorMode) -> Self {
        match mode {
            CursorMode::Blink => field::CursorMode::Blink,
            CursorMode::Static => field::CursorMode::Static,
            CursorMode::Hide => field::CursorMode::Hide,
        }
    }
}

impl From<field::CursorMode> for CursorMode {
    fn from(mode: field::CursorMode) -> Self {
        match mode {
            field::CursorMode::Blink => CursorMode::Blink,
            field::CursorMode::Static => CursorMode::Static,
            field::CursorMode::Hide => CursorMode::Hide,
        }
    }
}

// ============================================================================
// ECHO MODE
// ============================================================================

/// How typed characters are displayed by the text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Text is shown as typed.
    #[default]
    Normal,
    /// Every character is replaced by the mask character.
    Password,
    /// Nothing is shown while typing.
    None,
}

impl EchoMode {
    /// Decode a raw discriminant.
    ///
    /// # Panics
    ///
    /// Panics for any value other than 0, 1 or 2.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => EchoMode::Normal,
            1 => EchoMode::Password,
            2 => EchoMode::None,
            other => panic!("unknown echo mode: {other}"),
        }
    }
}

impl fmt::Display for EchoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EchoMode::Normal => "normal",
            EchoMode::Password => "password",
            EchoMode::None => "none",
        };
        f.write_str(name)
    }
}

impl From<EchoMode> for field::EchoMode {
    fn from(mode: EchoMode) -> Self {
        match mode {
            EchoMode::Normal => field::EchoMode::Normal,
            EchoMode::Password => field::EchoMode::Password,
            EchoMode::None => field::EchoMode::None,
        }
    }
}

impl From<field::EchoMode> for EchoMode {
    fn from(mode: field::EchoMode) -> Self {
        match mode {
            field::EchoMode::Normal => EchoMode::Normal,
            field::EchoMode::Password => EchoMode::Password,
            field::EchoMode::None => EchoMode::None,
        }
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// What a blocking prompt produced once its loop ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The user confirmed a value.
    Submitted { value: T },
    /// The user aborted with Esc or Ctrl+C.
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Submitted { value } => Some(value),
            Outcome::Cancelled => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Submitted { value } => Outcome::Submitted { value: f(value) },
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}

/// Output format for the demo CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CURSOR_MODES: [CursorMode; 3] = [CursorMode::Blink, CursorMode::Static, CursorMode::Hide];
    const ECHO_MODES: [EchoMode; 3] = [EchoMode::Normal, EchoMode::Password, EchoMode::None];

    #[test]
    fn cursor_mode_survives_field_round_trip() {
        for mode in CURSOR_MODES {
            let external: field::CursorMode = mode.into();
            assert_eq!(CursorMode::from(external), mode);
        }
    }

    #[test]
    fn echo_mode_survives_field_round_trip() {
        for mode in ECHO_MODES {
            let external: field::EchoMode = mode.into();
            assert_eq!(EchoMode::from(external), mode);
        }
    }

    #[test]
    fn cursor_mode_raw_values_decode() {
        for mode in CURSOR_MODES {
            assert_eq!(CursorMode::from_raw(mode.as_raw()), mode);
        }
    }

    #[test]
    #[should_panic(expected = "unknown cursor mode: 3")]
    fn unknown_cursor_mode_is_fatal() {
        CursorMode::from_raw(3);
    }

    #[test]
    #[should_panic(expected = "unknown echo mode: 9")]
    fn unknown_echo_mode_is_fatal() {
        EchoMode::from_raw(9);
    }

    #[test]
    fn cursor_mode_display_names() {
        assert_eq!(CursorMode::Blink.to_string(), "blink");
        assert_eq!(CursorMode::Static.to_string(), "static");
        assert_eq!(CursorMode::Hide.to_string(), "hidden");
    }

    #[test]
    fn status_defaults_to_normal() {
        assert_eq!(Status::default(), Status::Normal);
        assert!(Status::Quit.is_quit());
        assert!(!Status::Focus.is_quit());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let submitted = Outcome::Submitted {
            value: "hi".to_string(),
        };
        let json = serde_json::to_string(&submitted).unwrap();
        assert_eq!(json, r#"{"status":"submitted","value":"hi"}"#);

        let cancelled: Outcome<String> = Outcome::Cancelled;
        assert_eq!(serde_json::to_string(&cancelled).unwrap(), r#"{"status":"cancelled"}"#);
    }

    #[test]
    fn outcome_map_keeps_cancellation() {
        let cancelled: Outcome<u8> = Outcome::Cancelled;
        assert_eq!(cancelled.map(|v| v + 1), Outcome::Cancelled);
        let submitted = Outcome::Submitted { value: 1u8 };
        assert_eq!(submitted.map(|v| v + 1).value(), Some(2));
    }
}
