//! infinite: interactive terminal components.
//!
//! A spinner, a text input, single/multi selection and a confirm prompt,
//! each driven by a small Elm-style runtime over ratatui and crossterm.

pub mod components;
pub mod error;
pub mod report;
pub mod shape;
pub mod tui;
pub mod types;

pub use components::{Confirm, Host, Input, Selection, Spinner};
pub use error::{Error, Result};
pub use shape::Shape;
pub use types::{CursorMode, EchoMode, Outcome, Status};
