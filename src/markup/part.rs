//! A WordprocessingML part kept alongside its parsed paragraphs.

use crate::error::Result;
use crate::inline::{inline_document, DocumentReport, InlineOptions};
use crate::model::Document;

use super::reader::read_part;
use super::writer::{write_content, write_document, write_paragraph};

/// A piece of the original part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Segment {
    /// Markup between paragraphs, copied as is
    Verbatim(String),

    /// A paragraph of the document model
    Paragraph {
        /// Index into the document's paragraphs
        index: usize,
        /// The paragraph as read
        xml: String,
        /// Start tag as read; `None` for an empty `<w:p/>`
        start_tag: Option<String>,
        /// Qualified element name
        name: String,
    },
}

/// A parsed part that can be written back without losing the markup the
/// model does not cover.
///
/// Tables, section properties and everything else outside the paragraphs
/// are copied verbatim. Paragraphs the inliner did not change are written
/// back exactly as they were read.
#[derive(Debug, Clone)]
pub struct Part {
    document: Document,
    layout: Option<Vec<Segment>>,
    rewritten: Vec<bool>,
}

impl Part {
    /// Parse a WordprocessingML part or fragment.
    pub fn parse(xml: &str) -> Result<Self> {
        let (document, layout) = read_part(xml)?;
        Ok(Self {
            rewritten: vec![false; document.paragraph_count()],
            document,
            layout: Some(layout),
        })
    }

    /// Wrap a document built in memory. It is written as a complete
    /// `word/document.xml` part.
    pub fn from_document(document: Document) -> Self {
        Self {
            rewritten: vec![true; document.paragraph_count()],
            document,
            layout: None,
        }
    }

    /// The parsed paragraphs.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consume the part, keeping only the parsed paragraphs.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Inline the fields of every paragraph.
    pub fn inline(&mut self, options: &InlineOptions) -> Result<DocumentReport> {
        let report = inline_document(&mut self.document, options)?;
        for (index, _) in &report.fields {
            self.rewritten[*index] = true;
        }
        Ok(report)
    }

    /// Write the part back out.
    pub fn to_xml(&self) -> Result<String> {
        let Some(layout) = &self.layout else {
            return write_document(&self.document);
        };

        let mut out = String::new();
        for segment in layout {
            match segment {
                Segment::Verbatim(xml) => out.push_str(xml),
                Segment::Paragraph {
                    index,
                    xml,
                    start_tag,
                    name,
                } => {
                    let paragraph = &self.document.paragraphs[*index];
                    match start_tag {
                        _ if !self.rewritten[*index] => out.push_str(xml),
                        Some(start_tag) => {
                            out.push_str(start_tag);
                            out.push_str(&write_content(paragraph)?);
                            out.push_str(&format!("</{}>", name));
                        }
                        None => out.push_str(&write_paragraph(paragraph)?),
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::ErrorMode;
    use crate::model::Paragraph;

    const PART: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p w:rsidR="00AB"><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">Name: </w:t></w:r><w:fldSimple w:instr=" DOCPROPERTY name "><w:r><w:t>Ada</w:t></w:r></w:fldSimple></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:rPr><w:lang w:val="sv-SE"/></w:rPr><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#;

    #[test]
    fn test_untouched_part_is_written_back_exactly() {
        let part = Part::parse(PART).unwrap();
        assert_eq!(part.document().paragraph_count(), 2);
        assert_eq!(part.to_xml().unwrap(), PART);
    }

    #[test]
    fn test_inline_rewrites_only_changed_paragraphs() {
        let mut part = Part::parse(PART).unwrap();
        let report = part.inline(&InlineOptions::default()).unwrap();
        assert_eq!(report.fields_inlined(), 1);

        let xml = part.to_xml().unwrap();
        assert!(!xml.contains("fldSimple"));
        assert!(xml.contains(r#"<w:p w:rsidR="00AB"><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">Name: </w:t></w:r><w:r><w:t>Ada</w:t></w:r></w:p>"#));
        assert!(xml.contains(r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:rPr><w:lang w:val="sv-SE"/></w:rPr><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#));
        assert!(xml.ends_with(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#));

        let reread = Part::parse(&xml).unwrap();
        assert_eq!(reread.document().plain_text(), part.document().plain_text());
    }

    #[test]
    fn test_lenient_failure_is_written_back_exactly() {
        let broken = r#"<w:p><w:fldSimple w:instr="PAGE"/></w:p>"#;
        let xml = format!("<w:body>{}{}</w:body>", broken, r#"<w:p><w:fldSimple w:instr="X"><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p>"#);

        let mut part = Part::parse(&xml).unwrap();
        let options = InlineOptions::new().with_error_mode(ErrorMode::Lenient);
        let report = part.inline(&options).unwrap();
        assert_eq!(report.failures.len(), 1);

        let out = part.to_xml().unwrap();
        assert_eq!(out, format!("<w:body>{}<w:p><w:r><w:t>1</w:t></w:r></w:p></w:body>", broken));
    }

    #[test]
    fn test_from_document_writes_full_part() {
        let part = Part::from_document(Document::from_paragraphs(vec![Paragraph::with_text("x")]));
        let xml = part.to_xml().unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<w:body><w:p><w:r><w:t>x</w:t></w:r></w:p></w:body>"));
    }
}
