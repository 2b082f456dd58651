//! Document model types for WordprocessingML content.
//!
//! The model covers what field inlining needs: paragraphs made of plain
//! runs, simple fields and the containers that may hold them, and the
//! visual run properties that must survive when a field is replaced by its
//! displayed text. Everything else is carried along as raw markup.

mod document;
mod field;
mod paragraph;

pub use document::Document;
pub use field::FieldInstruction;
pub use paragraph::{
    Container, ContentItem, FieldWrapper, Paragraph, RawMarkup, Run, RunProperties,
    UnderlineStyle, VerticalAlign,
};
