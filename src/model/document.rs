//! Document-level types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// A sequence of paragraphs taken from a WordprocessingML part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from paragraphs.
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Add a paragraph to the document.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Get the number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Total number of field wrappers across all paragraphs.
    pub fn field_count(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::field_count).sum()
    }

    /// Check if the document has any paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Concatenated text of all paragraphs, without separators.
    pub fn plain_text(&self) -> String {
        self.paragraphs.iter().map(Paragraph::plain_text).collect()
    }
}
