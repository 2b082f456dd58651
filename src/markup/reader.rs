//! WordprocessingML reader.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{
    Container, ContentItem, Document, FieldWrapper, Paragraph, RawMarkup, Run, RunProperties,
    UnderlineStyle, VerticalAlign,
};

use super::part::{Part, Segment};

/// Inline elements whose children are paragraph content.
const CONTAINERS: &[&[u8]] = &[
    b"hyperlink",
    b"smartTag",
    b"sdt",
    b"sdtContent",
    b"customXml",
    b"ins",
    b"moveTo",
    b"dir",
    b"bdo",
];

/// Elements whose descendants never show text.
const HIDDEN: &[&[u8]] = &[
    b"pPr",
    b"rPr",
    b"sdtPr",
    b"del",
    b"moveFrom",
    b"instrText",
    b"drawing",
    b"pict",
    b"object",
];

/// Parse every `w:p` in a WordprocessingML part or fragment, in order.
///
/// Paragraphs nested in tables or other containers are collected in
/// document order as well.
pub fn parse_document(xml: &str) -> Result<Document> {
    Ok(Part::parse(xml)?.into_document())
}

/// Parse a single `w:p` element.
pub fn parse_paragraph(xml: &str) -> Result<Paragraph> {
    let mut doc = parse_document(xml)?;
    match doc.paragraphs.len() {
        1 => Ok(doc.paragraphs.remove(0)),
        n => Err(Error::Markup(format!("expected one paragraph, found {}", n))),
    }
}

/// Split `xml` into paragraphs and the verbatim markup around them.
pub(super) fn read_part(xml: &str) -> Result<(Document, Vec<Segment>)> {
    let mut reader = MarkupReader::new(xml);
    let mut doc = Document::new();
    let mut layout = Vec::new();
    let mut copied = 0;

    loop {
        let event = reader.next()?;
        let start = reader.event_start;
        let (paragraph, start_tag, name) = match event {
            Event::Start(e) if e.local_name().as_ref() == b"p" => {
                let start_tag = reader.slice(start)?.to_string();
                let paragraph = reader.read_content("p")?;
                (paragraph, Some(start_tag), qualified_name(&e))
            }
            Event::Empty(e) if e.local_name().as_ref() == b"p" => {
                (Paragraph::new(), None, qualified_name(&e))
            }
            Event::Eof => break,
            _ => continue,
        };

        if start > copied {
            layout.push(Segment::Verbatim(reader.range(copied, start)?.to_string()));
        }
        copied = reader.position()?;
        layout.push(Segment::Paragraph {
            index: doc.paragraph_count(),
            xml: reader.range(start, copied)?.to_string(),
            start_tag,
            name,
        });
        doc.add_paragraph(paragraph);
    }

    if copied < xml.len() {
        layout.push(Segment::Verbatim(reader.range(copied, xml.len())?.to_string()));
    }
    Ok((doc, layout))
}

struct MarkupReader<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    /// Byte offset where the last event read begins
    event_start: usize,
}

impl<'a> MarkupReader<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            source: xml,
            reader: Reader::from_str(xml),
            event_start: 0,
        }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        self.event_start = self.position()?;
        Ok(self.reader.read_event()?)
    }

    /// Byte offset just past the last event read.
    fn position(&self) -> Result<usize> {
        usize::try_from(self.reader.buffer_position())
            .map_err(|_| Error::Markup("input too large".to_string()))
    }

    fn range(&self, from: usize, to: usize) -> Result<&'a str> {
        self.source
            .get(from..to)
            .ok_or_else(|| Error::Markup(format!("invalid offsets {}..{}", from, to)))
    }

    /// Source text from `from` up to the end of the last event read.
    fn slice(&self, from: usize) -> Result<&'a str> {
        self.range(from, self.position()?)
    }

    /// Skip the rest of an element whose start tag was just read.
    fn skip(&mut self, start: &BytesStart<'a>) -> Result<()> {
        self.reader.read_to_end(start.name())?;
        Ok(())
    }

    fn unexpected_eof(element: &str) -> Error {
        Error::Markup(format!("unexpected end of input inside <w:{}>", element))
    }

    /// Read paragraph content up to the end tag of `parent`.
    fn read_content(&mut self, parent: &str) -> Result<Paragraph> {
        let mut paragraph = Paragraph::new();

        loop {
            let event = self.next()?;
            let start = self.event_start;
            match event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"r" => paragraph.content.push(self.read_plain_run(start)?),
                    b"fldSimple" => {
                        let instruction = attribute(&e, b"instr")?.unwrap_or_default();
                        paragraph.add_field(self.read_field(instruction)?);
                    }
                    name if CONTAINERS.contains(&name) => {
                        paragraph.content.push(self.read_container(&e, start)?);
                    }
                    _ => paragraph.add_markup(self.read_markup(&e, start)?),
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"r" => paragraph.add_run(Run::default()),
                    b"fldSimple" => {
                        let instruction = attribute(&e, b"instr")?.unwrap_or_default();
                        paragraph.add_field(FieldWrapper::with_runs(instruction, Vec::new()));
                    }
                    _ => paragraph.add_markup(RawMarkup::new(self.slice(start)?, "")),
                },
                Event::End(_) => return Ok(paragraph),
                Event::Eof => return Err(Self::unexpected_eof(parent)),
                _ => {}
            }
        }
    }

    /// Read a container, keeping it verbatim unless it holds a field.
    fn read_container(&mut self, e: &BytesStart<'a>, start: usize) -> Result<ContentItem> {
        let start_tag = self.slice(start)?.to_string();
        let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let content = self.read_content(&local)?;

        if !content.has_fields() {
            return Ok(ContentItem::Markup(RawMarkup::new(
                self.slice(start)?,
                content.plain_text(),
            )));
        }
        Ok(ContentItem::Container(Container {
            name: qualified_name(e),
            start_tag,
            content,
        }))
    }

    /// Read an element the model does not represent, with the text it shows.
    fn read_markup(&mut self, e: &BytesStart<'a>, start: usize) -> Result<RawMarkup> {
        log::debug!(
            "Keeping unsupported element <{}> as markup",
            String::from_utf8_lossy(e.name().as_ref())
        );

        let mut open = vec![e.local_name().as_ref().to_vec()];
        let mut text = String::new();

        while !open.is_empty() {
            match self.next()? {
                Event::Start(e) => open.push(e.local_name().as_ref().to_vec()),
                Event::End(_) => {
                    open.pop();
                }
                Event::Empty(e) if shows_text(&open, b"r") => {
                    if let Some(c) = break_char(&e)? {
                        text.push(c);
                    }
                }
                Event::Text(t) if shows_text(&open, b"t") => text.push_str(&t.unescape()?),
                Event::CData(c) if shows_text(&open, b"t") => {
                    text.push_str(&String::from_utf8_lossy(&c))
                }
                Event::Eof => return Err(Self::unexpected_eof("p")),
                _ => {}
            }
        }

        Ok(RawMarkup::new(self.slice(start)?, text))
    }

    /// Read a run outside any field. Runs the model cannot write back
    /// exactly are kept as markup.
    fn read_plain_run(&mut self, start: usize) -> Result<ContentItem> {
        let (run, exact) = self.read_run()?;
        if exact {
            Ok(ContentItem::Run(run))
        } else {
            Ok(ContentItem::Markup(RawMarkup::new(self.slice(start)?, run.text)))
        }
    }

    fn read_field(&mut self, instruction: String) -> Result<FieldWrapper> {
        let mut runs = Vec::new();

        loop {
            match self.next()? {
                Event::Start(e) if e.local_name().as_ref() == b"r" => {
                    let (run, exact) = self.read_run()?;
                    if !exact {
                        log::debug!("Field '{}' shows a run with unsupported markup", instruction.trim());
                    }
                    runs.push(run);
                }
                Event::Start(e) => {
                    log::debug!(
                        "Skipping unsupported element <{}> in field",
                        String::from_utf8_lossy(e.name().as_ref())
                    );
                    self.skip(&e)?;
                }
                Event::Empty(e) if e.local_name().as_ref() == b"r" => runs.push(Run::default()),
                Event::End(e) if e.local_name().as_ref() == b"fldSimple" => {
                    return Ok(FieldWrapper::with_runs(instruction, runs));
                }
                Event::Eof => return Err(Self::unexpected_eof("fldSimple")),
                _ => {}
            }
        }
    }

    /// Read a run, reporting whether the model captured all of it.
    fn read_run(&mut self) -> Result<(Run, bool)> {
        let mut run = Run::default();
        let mut exact = true;

        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"rPr" => {
                        let (properties, known) = self.read_run_properties()?;
                        run.properties = properties;
                        exact &= known;
                    }
                    b"t" => run.text.push_str(&self.read_text()?),
                    _ => {
                        exact = false;
                        self.skip(&e)?;
                    }
                },
                Event::Empty(e) => match (e.local_name().as_ref(), break_char(&e)?) {
                    (_, Some(c)) => run.text.push(c),
                    (b"t" | b"rPr", None) => {}
                    _ => exact = false,
                },
                Event::End(e) if e.local_name().as_ref() == b"r" => return Ok((run, exact)),
                Event::Eof => return Err(Self::unexpected_eof("r")),
                _ => {}
            }
        }
    }

    fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();

        loop {
            match self.next()? {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(Self::unexpected_eof("t")),
                _ => {}
            }
        }
    }

    fn read_run_properties(&mut self) -> Result<(RunProperties, bool)> {
        let mut props = RunProperties::default();
        let mut known = true;

        loop {
            match self.next()? {
                Event::Empty(e) => known &= apply_property(&mut props, &e)?,
                Event::Start(e) => {
                    apply_property(&mut props, &e)?;
                    known = false;
                    self.reader.read_to_end(e.name())?;
                }
                Event::End(e) if e.local_name().as_ref() == b"rPr" => return Ok((props, known)),
                Event::Eof => return Err(Self::unexpected_eof("rPr")),
                _ => {}
            }
        }
    }
}

/// Apply a `w:rPr` child to `props`. Returns false when the element carries
/// something the model cannot write back.
fn apply_property(props: &mut RunProperties, e: &BytesStart) -> Result<bool> {
    let name = e.local_name();
    let toggle_target = match name.as_ref() {
        b"b" => Some(&mut props.bold),
        b"i" => Some(&mut props.italic),
        b"strike" => Some(&mut props.strike),
        b"dstrike" => Some(&mut props.double_strike),
        b"caps" => Some(&mut props.caps),
        b"smallCaps" => Some(&mut props.small_caps),
        b"emboss" => Some(&mut props.emboss),
        b"imprint" => Some(&mut props.imprint),
        b"shadow" => Some(&mut props.shadow),
        _ => None,
    };
    if let Some(target) = toggle_target {
        *target = toggle(e)?;
        // An explicit "off" overrides the style and cannot be written back.
        return Ok(*target && only_attributes(e, &[b"val"])?);
    }

    let known = match name.as_ref() {
        b"u" => {
            let val = attribute(e, b"val")?;
            let (style, known) = match val.as_deref() {
                None => (UnderlineStyle::Single, true),
                Some(v) => match UnderlineStyle::from_val(v) {
                    Some(style) => (style, style != UnderlineStyle::None),
                    None => {
                        log::warn!("Unknown underline style '{}', using single", v);
                        (UnderlineStyle::Single, false)
                    }
                },
            };
            props.underline = style;
            known
        }
        b"color" => {
            props.color = attribute(e, b"val")?;
            props.color.is_some()
        }
        b"rFonts" => {
            let ascii = attribute(e, b"ascii")?;
            let h_ansi = attribute(e, b"hAnsi")?;
            let known = ascii.is_some() && ascii == h_ansi;
            props.font_family = ascii.or(h_ansi);
            return Ok(known && only_attributes(e, &[b"ascii", b"hAnsi"])?);
        }
        b"sz" => match number(e)? {
            Some(size) => {
                props.font_size = size;
                size > 0
            }
            None => false,
        },
        b"vertAlign" => match attribute(e, b"val")?.as_deref().and_then(VerticalAlign::from_val) {
            Some(align) => {
                props.vertical_align = align;
                align != VerticalAlign::Baseline
            }
            None => false,
        },
        b"kern" => {
            props.kerning = number(e)?;
            props.kerning.is_some()
        }
        b"spacing" => {
            props.character_spacing = number(e)?;
            props.character_spacing.is_some()
        }
        _ => false,
    };
    Ok(known && only_attributes(e, &[b"val"])?)
}

/// Value of the attribute with the given local name, ignoring its prefix.
fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Check that `e` has no attributes besides `allowed`.
fn only_attributes(e: &BytesStart, allowed: &[&[u8]]) -> Result<bool> {
    for attr in e.attributes() {
        if !allowed.contains(&attr?.key.local_name().as_ref()) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// An `ST_OnOff` toggle: present without a value means on.
fn toggle(e: &BytesStart) -> Result<bool> {
    Ok(!matches!(
        attribute(e, b"val")?.as_deref(),
        Some("false" | "0" | "off")
    ))
}

fn number(e: &BytesStart) -> Result<Option<i32>> {
    Ok(attribute(e, b"val")?.and_then(|v| v.trim().parse().ok()))
}

/// Character shown by an empty run child: tabs and text-wrapping breaks.
fn break_char(e: &BytesStart) -> Result<Option<char>> {
    Ok(match e.local_name().as_ref() {
        b"tab" => Some('\t'),
        b"cr" => Some('\n'),
        b"br" => {
            let wrapping = matches!(attribute(e, b"type")?.as_deref(), None | Some("textWrapping"));
            (wrapping && only_attributes(e, &[b"type"])?).then_some('\n')
        }
        _ => None,
    })
}

/// Whether the innermost open element is `parent` and no open element hides
/// its text.
fn shows_text(open: &[Vec<u8>], parent: &[u8]) -> bool {
    open.last().map(Vec::as_slice) == Some(parent)
        && !open.iter().any(|name| HIDDEN.contains(&name.as_slice()))
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}
