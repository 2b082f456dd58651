//! Field inlining.
//!
//! Replaces each simple field in a paragraph with a plain run that shows the
//! same text with the same formatting, then removes the field wrappers.
//!
//! A paragraph goes through three passes, each finished before the next
//! begins:
//!
//! 1. **Locate**: find every wrapper and its single run, validating all of
//!    them before anything is touched.
//! 2. **Replace**: insert a formatted copy of each run directly before its
//!    wrapper, using the [`PositionModel`] for every index.
//! 3. **Clean**: remove the wrappers, first remaining one at a time.
//!
//! The transform is all-or-nothing: on error the paragraph is left exactly
//! as it was passed in.
//!
//! # Example
//!
//! ```
//! use unfield::inline::inline_paragraph;
//! use unfield::model::{FieldWrapper, Paragraph, Run};
//!
//! let mut paragraph = Paragraph::with_text("Here ");
//! paragraph.add_field(FieldWrapper::new(
//!     r" DOCPROPERTY testprop1 \* MERGEFORMAT ",
//!     Run::new("<<testprop1>>"),
//! ));
//! paragraph.add_text(" is a field.");
//!
//! let report = inline_paragraph(&mut paragraph)?;
//! assert_eq!(report.count(), 1);
//! assert_eq!(paragraph.field_count(), 0);
//! assert_eq!(paragraph.plain_text(), "Here <<testprop1>> is a field.");
//! # Ok::<(), unfield::Error>(())
//! ```

mod document;
mod format;
mod locator;
mod options;
mod position;
mod remover;

pub use document::{inline_document, DocumentReport, ParagraphFailure};
pub use format::{clone_run, copy_formatting, FormatOptions};
pub use locator::{locate, FieldRunMap, ItemId, LocatedField, RunHandle};
pub use options::{ErrorMode, InlineOptions};
pub use position::{resolve_run, PositionModel};
pub use remover::remove_fields;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ContentItem, Paragraph};

/// A field that was replaced by a plain run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlinedField {
    /// The field's instruction, trimmed
    pub instruction: String,

    /// The text now held by the plain run
    pub text: String,
}

/// Outcome of inlining one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineReport {
    /// Inlined fields in document order
    pub fields: Vec<InlinedField>,
}

impl InlineReport {
    /// Number of fields inlined.
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    /// Check if nothing was inlined.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Inline every simple field in `paragraph` with default options.
pub fn inline_paragraph(paragraph: &mut Paragraph) -> Result<InlineReport> {
    inline_paragraph_with_options(paragraph, &InlineOptions::default())
}

/// Inline every simple field in `paragraph`.
///
/// Fields nested in containers such as hyperlinks are inlined as well. The
/// report lists the paragraph's own fields first, then those of each
/// container in order.
///
/// Fails with [`Error::FieldCardinality`] if a wrapper does not hold exactly
/// one run and with [`Error::RunNotFound`] if the position bookkeeping
/// loses track of a run. In both cases the paragraph is unchanged.
pub fn inline_paragraph_with_options(
    paragraph: &mut Paragraph,
    options: &InlineOptions,
) -> Result<InlineReport> {
    validate(paragraph).map_err(|e| {
        log_failure(&e);
        e
    })?;
    if !paragraph.has_fields() {
        return Ok(InlineReport::default());
    }

    let format = FormatOptions {
        extended: options.extended_formatting,
    };
    let report = atomically(paragraph, |paragraph| {
        let mut report = InlineReport::default();
        inline_content(paragraph, format, &mut report)?;
        Ok(report)
    })?;

    log::debug!("Inlined {} fields", report.count());
    Ok(report)
}

/// Locate the wrappers of every nesting level before anything is mutated.
pub(crate) fn validate(paragraph: &Paragraph) -> Result<()> {
    locate(paragraph)?;
    for item in &paragraph.content {
        if let ContentItem::Container(container) = item {
            validate(&container.content)?;
        }
    }
    Ok(())
}

/// Run `transform`, putting `paragraph` back as it was if it fails.
fn atomically<F>(paragraph: &mut Paragraph, transform: F) -> Result<InlineReport>
where
    F: FnOnce(&mut Paragraph) -> Result<InlineReport>,
{
    let original = paragraph.clone();
    match transform(paragraph) {
        Ok(report) => Ok(report),
        Err(e) => {
            *paragraph = original;
            log_failure(&e);
            Err(e)
        }
    }
}

/// Inline one level of content, then the content of its containers.
fn inline_content(
    paragraph: &mut Paragraph,
    format: FormatOptions,
    report: &mut InlineReport,
) -> Result<()> {
    let located = locate(paragraph)?;
    if !located.is_empty() {
        let original = paragraph.clone();
        let mut model = PositionModel::new(paragraph);

        replace_fields(paragraph, &original, &mut model, &located, format, report)?;

        let removed = remove_fields(paragraph, &mut model);
        debug_assert_eq!(removed, located.len());
    }

    for item in &mut paragraph.content {
        if let ContentItem::Container(container) = item {
            inline_content(&mut container.content, format, report)?;
        }
    }
    Ok(())
}

/// Insert a plain copy of each located run before its wrapper.
fn replace_fields(
    paragraph: &mut Paragraph,
    original: &Paragraph,
    model: &mut PositionModel,
    located: &[LocatedField],
    format: FormatOptions,
    report: &mut InlineReport,
) -> Result<()> {
    for field in located {
        let missing = || run_text_missing(original, field);

        let at = model.resolve(field.wrapper).ok_or_else(missing)?;
        let source = resolve_run(paragraph, model, field.run).ok_or_else(missing)?;
        let run = clone_run(source, format);

        let instruction = match &paragraph.content[at] {
            ContentItem::Field(wrapper) => wrapper.instruction.trim().to_string(),
            _ => return Err(missing()),
        };
        report.fields.push(InlinedField {
            instruction,
            text: run.text.clone(),
        });

        paragraph.content.insert(at, ContentItem::Run(run));
        model.record_insertion(at, field.wrapper);
    }

    Ok(())
}

fn run_text_missing(original: &Paragraph, field: &LocatedField) -> Error {
    let text = original
        .content
        .get(field.wrapper.snapshot_index())
        .map(ContentItem::text)
        .unwrap_or_default();
    position::run_not_found(original, &text)
}

fn log_failure(err: &Error) {
    log::error!("Failed to inline fields: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, FieldWrapper, RawMarkup, Run, RunProperties};

    fn field(name: &str) -> FieldWrapper {
        FieldWrapper::new(
            format!(r" DOCPROPERTY {} \* MERGEFORMAT ", name),
            Run::new(format!("<<{}>>", name)),
        )
    }

    #[test]
    fn test_inline_two_fields_in_one_paragraph() {
        let mut p = Paragraph::with_text("Here ");
        p.add_field(field("testprop1"));
        p.add_text(" is one instance of a smart field and here ");
        p.add_field(field("testprop2"));
        p.add_text(" is another.");
        let expected = p.plain_text();

        let report = inline_paragraph(&mut p).unwrap();

        assert_eq!(report.count(), 2);
        assert_eq!(report.fields[0].text, "<<testprop1>>");
        assert_eq!(report.fields[1].instruction, r"DOCPROPERTY testprop2 \* MERGEFORMAT");
        assert_eq!(p.field_count(), 0);
        assert_eq!(p.content.len(), 5);
        assert_eq!(p.plain_text(), expected);
        assert_eq!(
            "Here <<testprop1>> is one instance of a smart field and here <<testprop2>> is another.",
            expected
        );
    }

    #[test]
    fn test_inline_adjacent_fields() {
        let mut p = Paragraph::new();
        p.add_field(field("a"));
        p.add_field(field("b"));
        p.add_field(field("c"));

        inline_paragraph(&mut p).unwrap();

        let texts: Vec<_> = p.content.iter().map(ContentItem::text).collect();
        assert_eq!(texts, vec!["<<a>>", "<<b>>", "<<c>>"]);
        assert!(p.content.iter().all(|item| !item.is_field()));
    }

    #[test]
    fn test_inline_without_fields_is_noop() {
        let mut p = Paragraph::with_text("Nothing to see");
        p.add_run(Run::styled(
            " here",
            RunProperties {
                bold: true,
                ..Default::default()
            },
        ));
        let before = p.clone();

        let report = inline_paragraph(&mut p).unwrap();
        assert!(report.is_empty());
        assert_eq!(p, before);
    }

    #[test]
    fn test_inline_keeps_formatting() {
        let props = RunProperties {
            italic: true,
            font_size: 24,
            color: Some("1F497D".to_string()),
            ..Default::default()
        };
        let mut p = Paragraph::new();
        p.add_field(FieldWrapper::new(
            "DOCPROPERTY x",
            Run::styled("<<x>>", props.clone()),
        ));

        inline_paragraph(&mut p).unwrap();

        match &p.content[..] {
            [ContentItem::Run(run)] => assert_eq!(run.properties, props),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_inline_fields_in_containers() {
        let mut link = Paragraph::with_text("see ");
        link.add_field(field("url"));

        let mut p = Paragraph::with_text("Name: ");
        p.add_field(field("name"));
        p.add_text(", ");
        p.add_container(Container::new("w:hyperlink", link));
        p.add_markup(RawMarkup::new("<w:r><w:tab/></w:r>", "\t"));
        let expected = p.plain_text();

        let report = inline_paragraph(&mut p).unwrap();

        assert_eq!(report.count(), 2);
        assert_eq!(report.fields[1].text, "<<url>>");
        assert_eq!(p.field_count(), 0);
        assert_eq!(p.plain_text(), expected);
        match &p.content[3] {
            ContentItem::Container(c) => assert_eq!(c.content.content.len(), 2),
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[test]
    fn test_nested_cardinality_error_leaves_paragraph_untouched() {
        let mut link = Paragraph::new();
        link.add_field(FieldWrapper::with_runs("DOCPROPERTY x", Vec::new()));

        let mut p = Paragraph::new();
        p.add_field(field("ok"));
        p.add_container(Container::new("w:hyperlink", link));
        let before = p.clone();

        let err = inline_paragraph(&mut p).unwrap_err();
        assert!(matches!(err, Error::FieldCardinality { runs: 0, .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn test_replace_untracked_run_is_run_not_found() {
        let mut p = Paragraph::with_text("Here ");
        p.add_field(field("a"));
        let original = p.clone();
        let mut model = PositionModel::new(&p);
        let untracked = LocatedField {
            wrapper: ItemId(7),
            run: RunHandle {
                wrapper: ItemId(7),
                child: 0,
            },
        };

        let err = replace_fields(
            &mut p,
            &original,
            &mut model,
            &[untracked],
            FormatOptions::default(),
            &mut InlineReport::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::RunNotFound { ref paragraph, .. } if paragraph == "Here <<a>>"));
        assert_eq!(model.insertions(), 0);
    }

    #[test]
    fn test_run_not_found_mid_transform_restores_paragraph() {
        let mut p = Paragraph::with_text("Here ");
        p.add_field(field("a"));
        p.add_text(" and ");
        p.add_field(field("b"));
        let before = p.clone();

        let mut located = locate(&p).unwrap();
        located[1].wrapper = ItemId(9);

        let err = atomically(&mut p, |paragraph| {
            let original = paragraph.clone();
            let mut model = PositionModel::new(paragraph);
            let mut report = InlineReport::default();
            replace_fields(
                paragraph,
                &original,
                &mut model,
                &located,
                FormatOptions::default(),
                &mut report,
            )?;
            Ok(report)
        })
        .unwrap_err();

        assert!(matches!(err, Error::RunNotFound { .. }));
        assert_eq!(p, before);
    }

    #[test]
    fn test_cardinality_error_leaves_paragraph_untouched() {
        let mut p = Paragraph::with_text("Start ");
        p.add_field(field("ok"));
        p.add_field(FieldWrapper::with_runs(
            "DOCPROPERTY broken",
            vec![Run::new("<<bro"), Run::new("ken>>")],
        ));
        let before = p.clone();

        let err = inline_paragraph(&mut p).unwrap_err();
        assert!(matches!(err, Error::FieldCardinality { runs: 2, .. }));
        assert_eq!(p, before);
    }
}
