//! Output formatting for CLI.

mod json;
mod text;

pub use json::{CheckOutput, JsonFormatter};
pub use text::TextFormatter;
