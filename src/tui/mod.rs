//! Terminal program runtime.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: the model contract and command algebra (pure)
//! - `field`: editable text field (pure)
//! - `view`, `theme`: rendering helpers and styles (pure)
//! - `options`: runtime configuration
//! - `run`: effects (terminal lifecycle, event loop, threads)

pub mod field;
pub mod options;
pub mod run;
pub mod state;
pub mod theme;
pub mod view;

pub use options::{InputSource, ProgramOptions};
pub use run::{Program, ProgramHandle};
pub use state::{Cmd, Model, TerminalEvent};
