//! Reading and writing WordprocessingML.
//!
//! Elements are matched by local name, so any namespace prefix works on
//! input. Markup the model has no place for (paragraph properties,
//! bookmarks, drawings, ...) is kept verbatim, and containers such as
//! hyperlinks are read into the model only when they hold a field. Runs the
//! model writes with the conventional `w:` prefix.

mod part;
mod reader;
mod writer;

pub use part::Part;
pub use reader::{parse_document, parse_paragraph};
pub use writer::{write_document, write_paragraph};

use crate::error::Result;
use crate::inline::{DocumentReport, InlineOptions};

/// Namespace URI of the WordprocessingML main part.
pub const WORDPROCESSINGML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Parse `xml`, inline every field and write the part back.
///
/// Everything except the inlined paragraphs is written back unchanged.
pub fn inline_xml(xml: &str, options: &InlineOptions) -> Result<(String, DocumentReport)> {
    let mut part = Part::parse(xml)?;
    let report = part.inline(options)?;
    Ok((part.to_xml()?, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_xml() {
        let xml = r#"<w:p><w:r><w:t xml:space="preserve">Testprop1: </w:t></w:r><w:fldSimple w:instr=" DOCPROPERTY testprop1 \* MERGEFORMAT "><w:r><w:rPr><w:i/></w:rPr><w:t>&lt;&lt;testprop1&gt;&gt;</w:t></w:r></w:fldSimple></w:p>"#;

        let (out, report) = inline_xml(xml, &InlineOptions::default()).unwrap();
        assert_eq!(report.fields_inlined(), 1);
        assert!(!out.contains("fldSimple"));
        assert!(out.contains("<w:r><w:rPr><w:i/></w:rPr><w:t>&lt;&lt;testprop1&gt;&gt;</w:t></w:r>"));

        let doc = parse_document(&out).unwrap();
        assert_eq!(doc.plain_text(), "Testprop1: <<testprop1>>");
    }

    #[test]
    fn test_inline_xml_keeps_visible_text() {
        let xml = r#"<w:p><w:r><w:t xml:space="preserve">See </w:t></w:r><w:hyperlink r:id="rId1"><w:r><w:t>the site</w:t></w:r></w:hyperlink><w:r><w:t xml:space="preserve"> for </w:t></w:r><w:fldSimple w:instr="DOCPROPERTY v"><w:r><w:t>VAL</w:t></w:r></w:fldSimple><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t></w:r></w:p>"#;
        let before = parse_document(xml).unwrap().plain_text();
        assert_eq!(before, "See the site for VALA\tB");

        let (out, _) = inline_xml(xml, &InlineOptions::default()).unwrap();
        assert!(out.contains(r#"<w:hyperlink r:id="rId1"><w:r><w:t>the site</w:t></w:r></w:hyperlink>"#));
        assert_eq!(parse_document(&out).unwrap().plain_text(), before);
    }

    #[test]
    fn test_inline_xml_field_in_hyperlink() {
        let xml = r#"<w:p><w:hyperlink r:id="rId1"><w:fldSimple w:instr="DOCPROPERTY v"><w:r><w:rPr><w:u w:val="single"/></w:rPr><w:t>VAL</w:t></w:r></w:fldSimple></w:hyperlink></w:p>"#;

        let (out, report) = inline_xml(xml, &InlineOptions::default()).unwrap();
        assert_eq!(report.fields_inlined(), 1);
        assert_eq!(
            out,
            r#"<w:p><w:hyperlink r:id="rId1"><w:r><w:rPr><w:u w:val="single"/></w:rPr><w:t>VAL</w:t></w:r></w:hyperlink></w:p>"#
        );
    }
}
