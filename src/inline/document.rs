//! Inlining every paragraph of a document.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Document;

use super::options::{ErrorMode, InlineOptions};
use super::{inline_paragraph_with_options, validate, InlineReport, InlinedField};

/// A paragraph that could not be inlined in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphFailure {
    /// Paragraph index (0-based)
    pub index: usize,

    /// Error message
    pub message: String,
}

/// Outcome of inlining a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Number of paragraphs processed
    pub paragraphs: usize,

    /// Inlined fields with the index of their paragraph
    pub fields: Vec<(usize, InlinedField)>,

    /// Paragraphs left untouched because of an error
    pub failures: Vec<ParagraphFailure>,
}

impl DocumentReport {
    /// Number of fields inlined.
    pub fn fields_inlined(&self) -> usize {
        self.fields.len()
    }

    /// Check if every paragraph was processed without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Inline the fields of every paragraph in `doc`.
///
/// Paragraphs are independent, so with `options.parallel` they are processed
/// on the rayon thread pool. In strict mode every paragraph is validated
/// first, so a [`Error::FieldCardinality`](crate::Error::FieldCardinality)
/// leaves the whole document untouched. Any other error only leaves its own
/// paragraph as it was; paragraphs processed before it stay inlined. In
/// lenient mode a failing paragraph is logged, left as it was and reported.
pub fn inline_document(doc: &mut Document, options: &InlineOptions) -> Result<DocumentReport> {
    if options.error_mode == ErrorMode::Strict {
        for paragraph in &doc.paragraphs {
            validate(paragraph)?;
        }
    }

    let results: Vec<Result<InlineReport>> = if options.parallel {
        doc.paragraphs
            .par_iter_mut()
            .map(|paragraph| inline_paragraph_with_options(paragraph, options))
            .collect()
    } else {
        doc.paragraphs
            .iter_mut()
            .map(|paragraph| inline_paragraph_with_options(paragraph, options))
            .collect()
    };

    let mut report = DocumentReport {
        paragraphs: doc.paragraphs.len(),
        ..Default::default()
    };

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(inlined) => {
                report
                    .fields
                    .extend(inlined.fields.into_iter().map(|field| (index, field)));
            }
            Err(e) => {
                if options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to inline fields in paragraph {}: {}", index, e);
                report.failures.push(ParagraphFailure {
                    index,
                    message: e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Inlined {} fields across {} paragraphs",
        report.fields_inlined(),
        report.paragraphs
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Container, FieldWrapper, Paragraph, Run};

    fn document() -> Document {
        let mut with_field = Paragraph::with_text("Testprop1: ");
        with_field.add_field(FieldWrapper::new("DOCPROPERTY testprop1", Run::new("<<testprop1>>")));

        let mut broken = Paragraph::with_text("Broken: ");
        broken.add_field(FieldWrapper::with_runs("DOCPROPERTY x", Vec::new()));

        Document::from_paragraphs(vec![Paragraph::with_text("Intro"), with_field, broken])
    }

    #[test]
    fn test_strict_mode_leaves_document_untouched() {
        let mut doc = document();
        let before = doc.clone();

        let err = inline_document(&mut doc, &InlineOptions::new()).unwrap_err();
        assert!(matches!(err, Error::FieldCardinality { runs: 0, .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_strict_mode_validates_nested_fields() {
        let mut link = Paragraph::new();
        link.add_field(FieldWrapper::with_runs(
            "DOCPROPERTY x",
            vec![Run::new("a"), Run::new("b")],
        ));
        let mut nested = Paragraph::new();
        nested.add_container(Container::new("w:hyperlink", link));

        let mut doc = document();
        doc.paragraphs.truncate(2);
        doc.add_paragraph(nested);
        let before = doc.clone();

        let err = inline_document(&mut doc, &InlineOptions::new()).unwrap_err();
        assert!(matches!(err, Error::FieldCardinality { runs: 2, .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_lenient_mode_skips_failing_paragraph() {
        let mut doc = document();
        let options = InlineOptions::new().lenient().sequential();

        let report = inline_document(&mut doc, &options).unwrap();
        assert_eq!(report.paragraphs, 3);
        assert_eq!(report.fields_inlined(), 1);
        assert_eq!(report.fields[0].0, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 2);
        assert!(!report.is_clean());

        assert_eq!(doc.paragraphs[1].field_count(), 0);
        assert_eq!(doc.paragraphs[2].field_count(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut paragraphs = Vec::new();
        for i in 0..64 {
            let mut p = Paragraph::with_text(format!("P{} ", i));
            p.add_field(FieldWrapper::new("DOCPROPERTY p", Run::new(format!("<<{}>>", i))));
            paragraphs.push(p);
        }
        let mut parallel = Document::from_paragraphs(paragraphs);
        let mut sequential = parallel.clone();

        let a = inline_document(&mut parallel, &InlineOptions::new()).unwrap();
        let b = inline_document(&mut sequential, &InlineOptions::new().sequential()).unwrap();

        assert_eq!(a, b);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.field_count(), 0);
        assert!(a.is_clean());
    }
}
