//! Outcome formatting for the CLI.
//!
//! Pure functions from (Outcome, OutputFormat) to String.
//! No I/O, no side effects.

use serde::Serialize;

use crate::error::Result;
use crate::types::{Outcome, OutputFormat};

/// Values that have a one-line human rendering.
pub trait HumanReadable {
    fn human(&self) -> String;
}

impl HumanReadable for String {
    fn human(&self) -> String {
        self.clone()
    }
}

impl HumanReadable for bool {
    fn human(&self) -> String {
        if *self {
            "yes".to_string()
        } else {
            "no".to_string()
        }
    }
}

impl HumanReadable for Vec<String> {
    fn human(&self) -> String {
        self.join("\n")
    }
}

/// Format an outcome for output.
pub fn format_outcome<T>(outcome: &Outcome<T>, format: OutputFormat) -> Result<String>
where
    T: Serialize + HumanReadable,
{
    match format {
        OutputFormat::Human => Ok(format_human(outcome)),
        OutputFormat::Json => format_json(outcome),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human<T: HumanReadable>(outcome: &Outcome<T>) -> String {
    match outcome {
        Outcome::Submitted { value } => value.human(),
        Outcome::Cancelled => "(cancelled)".to_string(),
    }
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn format_json<T: Serialize>(outcome: &Outcome<T>) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

// ============================================================================
// TESTS
// ============================================================================
