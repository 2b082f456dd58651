//! Paragraph and run-level types.

use serde::{Deserialize, Serialize};

/// A paragraph of content: runs and simple fields in rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Content items in rendering order
    pub content: Vec<ContentItem>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(ContentItem::Run(Run::new(text)));
    }

    /// Add a styled run.
    pub fn add_run(&mut self, run: Run) {
        self.content.push(ContentItem::Run(run));
    }

    /// Add a simple field.
    pub fn add_field(&mut self, field: FieldWrapper) {
        self.content.push(ContentItem::Field(field));
    }

    /// Get plain text content of the paragraph, including text shown by fields.
    pub fn plain_text(&self) -> String {
        self.content.iter().map(ContentItem::text).collect()
    }

    /// Add a container such as a hyperlink.
    pub fn add_container(&mut self, container: Container) {
        self.content.push(ContentItem::Container(container));
    }

    /// Add markup that is kept verbatim.
    pub fn add_markup(&mut self, markup: RawMarkup) {
        self.content.push(ContentItem::Markup(markup));
    }

    /// Number of field wrappers in the paragraph, including nested ones.
    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Check if the paragraph contains any field wrapper, including nested ones.
    pub fn has_fields(&self) -> bool {
        self.fields().next().is_some()
    }

    /// Iterate over the field wrappers in document order, descending into
    /// containers.
    pub fn fields(&self) -> impl Iterator<Item = &FieldWrapper> {
        self.content.iter().flat_map(ContentItem::fields)
    }

    /// Iterate over every run in document order, descending into fields and
    /// containers. Runs kept as verbatim markup are not included.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().flat_map(ContentItem::runs)
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// A plain run
    Run(Run),

    /// A simple field wrapping the run that shows its value
    Field(FieldWrapper),

    /// An inline container, such as a hyperlink, holding fields
    Container(Container),

    /// Markup the model does not represent, kept verbatim
    Markup(RawMarkup),
}

impl ContentItem {
    /// Rendered text of this item.
    pub fn text(&self) -> String {
        match self {
            ContentItem::Run(run) => run.text.clone(),
            ContentItem::Field(field) => field.text(),
            ContentItem::Container(container) => container.content.plain_text(),
            ContentItem::Markup(markup) => markup.text.clone(),
        }
    }

    /// Field wrappers in this item, descending into containers.
    pub fn fields(&self) -> Box<dyn Iterator<Item = &FieldWrapper> + '_> {
        match self {
            ContentItem::Field(field) => Box::new(std::iter::once(field)),
            ContentItem::Container(container) => Box::new(container.content.fields()),
            ContentItem::Run(_) | ContentItem::Markup(_) => Box::new(std::iter::empty()),
        }
    }

    /// Runs in this item, descending into fields and containers.
    pub fn runs(&self) -> Box<dyn Iterator<Item = &Run> + '_> {
        match self {
            ContentItem::Run(run) => Box::new(std::iter::once(run)),
            ContentItem::Field(field) => Box::new(field.runs.iter()),
            ContentItem::Container(container) => Box::new(container.content.runs()),
            ContentItem::Markup(_) => Box::new(std::iter::empty()),
        }
    }

    /// Check if this item is a field wrapper.
    pub fn is_field(&self) -> bool {
        matches!(self, ContentItem::Field(_))
    }
}

/// A simple field (`w:fldSimple`).
///
/// Well-formed fields hold exactly one run. The runs are kept as a vector
/// so that malformed input can be represented and rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWrapper {
    /// Field instruction, e.g. ` DOCPROPERTY testprop1 \* MERGEFORMAT `
    pub instruction: String,

    /// Runs holding the currently displayed value
    pub runs: Vec<Run>,
}

impl FieldWrapper {
    /// Create a field showing a single run.
    pub fn new(instruction: impl Into<String>, run: Run) -> Self {
        Self {
            instruction: instruction.into(),
            runs: vec![run],
        }
    }

    /// Create a field with an arbitrary number of runs.
    pub fn with_runs(instruction: impl Into<String>, runs: Vec<Run>) -> Self {
        Self {
            instruction: instruction.into(),
            runs,
        }
    }

    /// Text currently displayed by the field.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// An inline element whose children are paragraph content, such as
/// `w:hyperlink`, `w:smartTag` or `w:sdtContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Qualified element name, e.g. `w:hyperlink`
    pub name: String,

    /// The element's start tag exactly as read, attributes included
    pub start_tag: String,

    /// Child content
    pub content: Paragraph,
}

impl Container {
    /// Create a container with an attribute-free start tag.
    pub fn new(name: impl Into<String>, content: Paragraph) -> Self {
        let name = name.into();
        Self {
            start_tag: format!("<{}>", name),
            name,
            content,
        }
    }
}

/// A fragment of markup passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMarkup {
    /// The fragment's XML, exactly as read
    pub xml: String,

    /// Text the fragment shows to a reader
    pub text: String,
}

impl RawMarkup {
    /// Create a fragment from its XML and visible text.
    pub fn new(xml: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            xml: xml.into(),
            text: text.into(),
        }
    }
}

/// A run of text with consistent formatting.
///
/// Tabs and line breaks are held in `text` as `\t` and `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Run formatting
    pub properties: RunProperties,
}

impl Run {
    /// Create a new run with default formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: RunProperties::default(),
        }
    }

    /// Create a run with the given formatting.
    pub fn styled(text: impl Into<String>, properties: RunProperties) -> Self {
        Self {
            text: text.into(),
            properties,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Visual run properties (`w:rPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProperties {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underline style
    pub underline: UnderlineStyle,

    /// Text color (hex without `#`, or `auto`)
    pub color: Option<String>,

    /// Font family
    pub font_family: Option<String>,

    /// Font size in half-points; zero or negative means unset
    pub font_size: i32,

    /// Subscript/superscript state
    pub vertical_align: VerticalAlign,

    /// Strikethrough
    pub strike: bool,

    /// Double strikethrough
    pub double_strike: bool,

    /// All capitals
    pub caps: bool,

    /// Small capitals
    pub small_caps: bool,

    /// Embossed
    pub emboss: bool,

    /// Imprinted (engraved)
    pub imprint: bool,

    /// Shadowed
    pub shadow: bool,

    /// Minimum font size for kerning, in half-points
    pub kerning: Option<i32>,

    /// Character spacing adjustment, in twentieths of a point
    pub character_spacing: Option<i32>,
}

impl RunProperties {
    /// Font size if it is set to a usable (positive) value.
    pub fn font_size(&self) -> Option<i32> {
        (self.font_size > 0).then_some(self.font_size)
    }

    /// Check if any formatting is applied.
    pub fn has_formatting(&self) -> bool {
        *self != Self::default()
    }
}

/// Underline style, mirroring `ST_Underline`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderlineStyle {
    /// No underline
    #[default]
    None,
    /// Single line
    Single,
    /// Underline words only
    Words,
    /// Double line
    Double,
    /// Thick line
    Thick,
    /// Dotted line
    Dotted,
    /// Heavy dotted line
    DottedHeavy,
    /// Dashed line
    Dash,
    /// Heavy dashed line
    DashedHeavy,
    /// Long dashes
    DashLong,
    /// Heavy long dashes
    DashLongHeavy,
    /// Dot-dash
    DotDash,
    /// Heavy dot-dash
    DashDotHeavy,
    /// Dot-dot-dash
    DotDotDash,
    /// Heavy dot-dot-dash
    DashDotDotHeavy,
    /// Wavy line
    Wave,
    /// Heavy wavy line
    WavyHeavy,
    /// Double wavy line
    WavyDouble,
}

const UNDERLINE_VALUES: &[(UnderlineStyle, &str)] = &[
    (UnderlineStyle::None, "none"),
    (UnderlineStyle::Single, "single"),
    (UnderlineStyle::Words, "words"),
    (UnderlineStyle::Double, "double"),
    (UnderlineStyle::Thick, "thick"),
    (UnderlineStyle::Dotted, "dotted"),
    (UnderlineStyle::DottedHeavy, "dottedHeavy"),
    (UnderlineStyle::Dash, "dash"),
    (UnderlineStyle::DashedHeavy, "dashedHeavy"),
    (UnderlineStyle::DashLong, "dashLong"),
    (UnderlineStyle::DashLongHeavy, "dashLongHeavy"),
    (UnderlineStyle::DotDash, "dotDash"),
    (UnderlineStyle::DashDotHeavy, "dashDotHeavy"),
    (UnderlineStyle::DotDotDash, "dotDotDash"),
    (UnderlineStyle::DashDotDotHeavy, "dashDotDotHeavy"),
    (UnderlineStyle::Wave, "wave"),
    (UnderlineStyle::WavyHeavy, "wavyHeavy"),
    (UnderlineStyle::WavyDouble, "wavyDouble"),
];

impl UnderlineStyle {
    /// Parse a `w:u/@w:val` value.
    pub fn from_val(val: &str) -> Option<Self> {
        UNDERLINE_VALUES
            .iter()
            .find(|(_, name)| *name == val)
            .map(|(style, _)| *style)
    }

    /// The `w:u/@w:val` value for this style.
    pub fn as_val(self) -> &'static str {
        UNDERLINE_VALUES
            .iter()
            .find(|(style, _)| *style == self)
            .map(|(_, name)| *name)
            .unwrap_or("none")
    }
}

/// Vertical alignment of a run (`w:vertAlign`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Regular baseline text
    #[default]
    Baseline,
    /// Subscript
    Subscript,
    /// Superscript
    Superscript,
}

impl VerticalAlign {
    /// Parse a `w:vertAlign/@w:val` value.
    pub fn from_val(val: &str) -> Option<Self> {
        match val {
            "baseline" => Some(Self::Baseline),
            "subscript" => Some(Self::Subscript),
            "superscript" => Some(Self::Superscript),
            _ => None,
        }
    }

    /// The `w:vertAlign/@w:val` value.
    pub fn as_val(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Subscript => "subscript",
            Self::Superscript => "superscript",
        }
    }
}
