//! CLI output formatting module
//!
//! Every command produces a serializable value that renders either as
//! human-readable text or as JSON (`--json`).

pub mod progress;
pub mod table;

use serde::Serialize;

pub use progress::{MultiProgressManager, TrialProgressBars};
pub use table::TableFormatter;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}
