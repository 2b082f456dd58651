//! Rendering module for converting the model to other output formats.

mod json;

pub use json::{to_json, JsonFormat};
