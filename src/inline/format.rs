//! Copying visual formatting from a field's run to its replacement.

use crate::model::{Run, RunProperties};

/// Which run properties to carry over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Also copy strike, double strike, caps, small caps, emboss, imprint,
    /// shadow, kerning and character spacing
    pub extended: bool,
}

/// Create a plain run equivalent to `source`.
pub fn clone_run(source: &Run, options: FormatOptions) -> Run {
    let mut run = Run::new(source.text.clone());
    copy_formatting(&source.properties, &mut run.properties, options);
    run
}

/// Copy visual properties from `source` onto `target`.
///
/// A font size of zero or below is an unset marker and is never copied;
/// writing it out would render the text at zero size.
pub fn copy_formatting(source: &RunProperties, target: &mut RunProperties, options: FormatOptions) {
    if let Some(size) = source.font_size() {
        target.font_size = size;
    }

    target.bold = source.bold;
    target.italic = source.italic;
    target.underline = source.underline;
    target.color = source.color.clone();
    target.font_family = source.font_family.clone();
    target.vertical_align = source.vertical_align;

    if options.extended {
        target.strike = source.strike;
        target.double_strike = source.double_strike;
        target.caps = source.caps;
        target.small_caps = source.small_caps;
        target.emboss = source.emboss;
        target.imprint = source.imprint;
        target.shadow = source.shadow;
        target.kerning = source.kerning;
        target.character_spacing = source.character_spacing;
    }
}
