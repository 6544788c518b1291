//! Outline rendering.

mod json;
mod text;

pub use json::{to_json, to_json_writer, JsonFormat};
pub use text::to_text;
