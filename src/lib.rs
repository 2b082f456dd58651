//! # unfield
//!
//! Inline WordprocessingML simple fields into plain text runs.
//!
//! A simple field (`w:fldSimple`) shows a value computed from document
//! metadata, such as a custom document property. Inlining replaces each
//! field with an ordinary run holding the text the field currently shows,
//! formatted the same way, so the document looks identical to a reader but
//! no longer carries field codes.
//!
//! ## Quick Start
//!
//! ```
//! use unfield::{inline_paragraph, FieldWrapper, Paragraph, Run};
//!
//! fn main() -> unfield::Result<()> {
//!     let mut paragraph = Paragraph::with_text("Project: ");
//!     paragraph.add_field(FieldWrapper::new(
//!         r" DOCPROPERTY project \* MERGEFORMAT ",
//!         Run::new("<<project>>"),
//!     ));
//!
//!     inline_paragraph(&mut paragraph)?;
//!     assert_eq!(paragraph.field_count(), 0);
//!     assert_eq!(paragraph.plain_text(), "Project: <<project>>");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Text preserving**: the rendered text of a paragraph never changes
//! - **Formatting preserving**: bold, italic, underline, color, font and
//!   vertical alignment are carried over to the replacement run
//! - **All-or-nothing**: a malformed paragraph is left exactly as it was
//! - **Parallel processing**: uses Rayon for multi-paragraph documents
//! - **Lossless markup**: everything but the inlined fields is written back
//!   as it was read

pub mod error;
pub mod inline;
pub mod markup;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use inline::{
    inline_document, inline_paragraph, inline_paragraph_with_options, DocumentReport, ErrorMode,
    InlineOptions, InlineReport, InlinedField,
};
pub use markup::{
    inline_xml, parse_document, parse_paragraph, write_document, write_paragraph, Part,
};
pub use model::{
    Container, ContentItem, Document, FieldInstruction, FieldWrapper, Paragraph, RawMarkup, Run,
    RunProperties, UnderlineStyle, VerticalAlign,
};
pub use render::{to_json, JsonFormat};

use std::path::Path;

/// Inline every field of a WordprocessingML part stored in a file.
///
/// # Example
///
/// ```no_run
/// use unfield::{inline_file, InlineOptions};
///
/// let (xml, report) = inline_file("word/document.xml", &InlineOptions::default()).unwrap();
/// println!("Inlined {} fields", report.fields_inlined());
/// std::fs::write("word/document.xml", xml).unwrap();
/// ```
pub fn inline_file<P: AsRef<Path>>(
    path: P,
    options: &InlineOptions,
) -> Result<(String, DocumentReport)> {
    let xml = std::fs::read_to_string(path)?;
    inline_xml(&xml, options)
}

/// Builder for inlining fields in WordprocessingML parts.
///
/// # Example
///
/// ```no_run
/// use unfield::Unfield;
///
/// let xml = Unfield::new()
///     .lenient()
///     .with_extended_formatting()
///     .open("word/document.xml")?
///     .to_xml()?;
/// # Ok::<(), unfield::Error>(())
/// ```
pub struct Unfield {
    options: InlineOptions,
}

impl Unfield {
    /// Create a new Unfield builder.
    pub fn new() -> Self {
        Self {
            options: InlineOptions::default(),
        }
    }

    /// Leave failing paragraphs untouched instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Also copy strike, caps, kerning and the other extended run properties.
    pub fn with_extended_formatting(mut self) -> Self {
        self.options = self.options.with_extended_formatting(true);
        self
    }

    /// Read a part from a file and inline its fields.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<UnfieldResult> {
        let xml = std::fs::read_to_string(path)?;
        self.inline_str(&xml)
    }

    /// Inline the fields of a part held in memory.
    pub fn inline_str(self, xml: &str) -> Result<UnfieldResult> {
        self.inline_part(Part::parse(xml)?)
    }

    /// Inline the fields of a document built in memory.
    pub fn inline_document(self, document: Document) -> Result<UnfieldResult> {
        self.inline_part(Part::from_document(document))
    }

    fn inline_part(self, mut part: Part) -> Result<UnfieldResult> {
        let report = part.inline(&self.options)?;
        Ok(UnfieldResult { part, report })
    }
}

impl Default for Unfield {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of inlining a document.
pub struct UnfieldResult {
    /// The part with its fields inlined
    pub part: Part,
    /// What was inlined and what failed
    pub report: DocumentReport,
}

impl UnfieldResult {
    /// The inlined paragraphs.
    pub fn document(&self) -> &Document {
        self.part.document()
    }

    /// Write the part back out as WordprocessingML.
    pub fn to_xml(&self) -> Result<String> {
        self.part.to_xml()
    }

    /// Convert the document to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(self.document(), format)
    }

    /// Get the document's plain text.
    pub fn plain_text(&self) -> String {
        self.document().plain_text()
    }
}
