//! Interactive components built on the runtime.
//!
//! Use them directly (`Spinner`, `Input`, `Selection`, `Confirm`) or embed
//! their models in a custom model and drive it with a [`Host`].

pub mod confirm;
pub mod host;
pub mod input;
pub mod selection;
pub mod spinner;

pub use confirm::Confirm;
pub use host::{Host, RunHandle};
pub use input::Input;
pub use selection::Selection;
pub use spinner::{Spinner, SpinnerOption};
