//! WordprocessingML writer.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::model::{
    Container, ContentItem, Document, FieldWrapper, Paragraph, Run, RunProperties,
    UnderlineStyle, VerticalAlign,
};

use super::WORDPROCESSINGML_NS;

/// Write a complete `word/document.xml` part.
pub fn write_document(doc: &Document) -> Result<String> {
    let mut w = MarkupWriter::new();
    w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    w.start(BytesStart::new("w:document").with_attributes([("xmlns:w", WORDPROCESSINGML_NS)]))?;
    w.start(BytesStart::new("w:body"))?;
    for paragraph in &doc.paragraphs {
        w.paragraph(paragraph)?;
    }
    w.end("w:body")?;
    w.end("w:document")?;
    w.finish()
}

/// Write a single `w:p` element.
pub fn write_paragraph(paragraph: &Paragraph) -> Result<String> {
    let mut w = MarkupWriter::new();
    w.paragraph(paragraph)?;
    w.finish()
}

/// Write a paragraph's content without the enclosing `w:p`.
pub(crate) fn write_content(paragraph: &Paragraph) -> Result<String> {
    let mut w = MarkupWriter::new();
    w.content(paragraph)?;
    w.finish()
}

struct MarkupWriter {
    writer: Writer<Vec<u8>>,
}

impl MarkupWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::Markup(format!("invalid UTF-8 in output: {}", e)))
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event)?;
        Ok(())
    }

    fn start(&mut self, start: BytesStart<'_>) -> Result<()> {
        self.event(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Write markup that is already serialized.
    fn raw(&mut self, xml: &str) -> Result<()> {
        self.event(Event::Text(BytesText::from_escaped(xml)))
    }

    fn empty(&mut self, name: &str, val: Option<&str>) -> Result<()> {
        let mut element = BytesStart::new(name);
        if let Some(val) = val {
            element.push_attribute(("w:val", val));
        }
        self.event(Event::Empty(element))
    }

    fn paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        if paragraph.is_empty() {
            return self.event(Event::Empty(BytesStart::new("w:p")));
        }

        self.start(BytesStart::new("w:p"))?;
        self.content(paragraph)?;
        self.end("w:p")
    }

    fn content(&mut self, paragraph: &Paragraph) -> Result<()> {
        for item in &paragraph.content {
            match item {
                ContentItem::Run(run) => self.run(run)?,
                ContentItem::Field(field) => self.field(field)?,
                ContentItem::Container(container) => self.container(container)?,
                ContentItem::Markup(markup) => self.raw(&markup.xml)?,
            }
        }
        Ok(())
    }

    fn container(&mut self, container: &Container) -> Result<()> {
        self.raw(&container.start_tag)?;
        self.content(&container.content)?;
        self.end(&container.name)
    }

    fn field(&mut self, field: &FieldWrapper) -> Result<()> {
        let start = BytesStart::new("w:fldSimple")
            .with_attributes([("w:instr", field.instruction.as_str())]);
        self.start(start)?;
        for run in &field.runs {
            self.run(run)?;
        }
        self.end("w:fldSimple")
    }

    fn run(&mut self, run: &Run) -> Result<()> {
        self.start(BytesStart::new("w:r"))?;

        if run.properties.has_formatting() {
            self.run_properties(&run.properties)?;
        }

        let mut rest = run.text.as_str();
        while !rest.is_empty() {
            match rest.find(|c: char| c == '\t' || c == '\n') {
                Some(0) => {
                    self.empty(if rest.starts_with('\t') { "w:tab" } else { "w:br" }, None)?;
                    rest = &rest[1..];
                }
                Some(at) => {
                    self.text(&rest[..at])?;
                    rest = &rest[at..];
                }
                None => {
                    self.text(rest)?;
                    rest = "";
                }
            }
        }

        self.end("w:r")
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let mut t = BytesStart::new("w:t");
        if text.trim() != text {
            t.push_attribute(("xml:space", "preserve"));
        }
        self.start(t)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end("w:t")
    }

    /// Children are written in `CT_RPr` sequence order.
    fn run_properties(&mut self, props: &RunProperties) -> Result<()> {
        self.start(BytesStart::new("w:rPr"))?;

        if let Some(ref font) = props.font_family {
            let fonts = BytesStart::new("w:rFonts")
                .with_attributes([("w:ascii", font.as_str()), ("w:hAnsi", font.as_str())]);
            self.event(Event::Empty(fonts))?;
        }

        let toggles = [
            ("w:b", props.bold),
            ("w:i", props.italic),
            ("w:caps", props.caps),
            ("w:smallCaps", props.small_caps),
            ("w:strike", props.strike),
            ("w:dstrike", props.double_strike),
            ("w:emboss", props.emboss),
            ("w:imprint", props.imprint),
            ("w:shadow", props.shadow),
        ];
        for (name, on) in toggles {
            if on {
                self.empty(name, None)?;
            }
        }

        if let Some(ref color) = props.color {
            self.empty("w:color", Some(color.as_str()))?;
        }
        if let Some(spacing) = props.character_spacing {
            self.empty("w:spacing", Some(spacing.to_string().as_str()))?;
        }
        if let Some(kern) = props.kerning {
            self.empty("w:kern", Some(kern.to_string().as_str()))?;
        }
        if let Some(size) = props.font_size() {
            self.empty("w:sz", Some(size.to_string().as_str()))?;
        }
        if props.underline != UnderlineStyle::None {
            self.empty("w:u", Some(props.underline.as_val()))?;
        }
        if props.vertical_align != VerticalAlign::Baseline {
            self.empty("w:vertAlign", Some(props.vertical_align.as_val()))?;
        }

        self.end("w:rPr")
    }
}
