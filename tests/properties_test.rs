//! Property tests for paragraph inlining.

use proptest::prelude::*;
use unfield::inline::inline_paragraph;
use unfield::model::{
    ContentItem, FieldWrapper, Paragraph, Run, RunProperties, UnderlineStyle, VerticalAlign,
};
use unfield::Error;

// -- Strategy helpers --

fn arb_underline() -> impl Strategy<Value = UnderlineStyle> {
    prop_oneof![
        Just(UnderlineStyle::None),
        Just(UnderlineStyle::Single),
        Just(UnderlineStyle::Double),
        Just(UnderlineStyle::Wave),
        Just(UnderlineStyle::DotDash),
    ]
}

fn arb_vertical_align() -> impl Strategy<Value = VerticalAlign> {
    prop_oneof![
        Just(VerticalAlign::Baseline),
        Just(VerticalAlign::Subscript),
        Just(VerticalAlign::Superscript),
    ]
}

fn arb_properties() -> impl Strategy<Value = RunProperties> {
    (
        any::<bool>(),
        any::<bool>(),
        arb_underline(),
        proptest::option::of("[0-9A-F]{6}"),
        proptest::option::of("(Arial|Calibri|Times New Roman)"),
        -4i32..96,
        arb_vertical_align(),
    )
        .prop_map(
            |(bold, italic, underline, color, font_family, font_size, vertical_align)| {
                RunProperties {
                    bold,
                    italic,
                    underline,
                    color,
                    font_family,
                    font_size,
                    vertical_align,
                    ..Default::default()
                }
            },
        )
}

fn arb_run() -> impl Strategy<Value = Run> {
    ("[a-zA-Z åäö<>]{0,12}", arb_properties()).prop_map(|(text, props)| Run::styled(text, props))
}

fn arb_item() -> impl Strategy<Value = ContentItem> {
    prop_oneof![
        arb_run().prop_map(ContentItem::Run),
        ("[a-z]{1,8}", arb_run()).prop_map(|(name, run)| {
            ContentItem::Field(FieldWrapper::new(format!(" DOCPROPERTY {} ", name), run))
        }),
    ]
}

fn arb_paragraph() -> impl Strategy<Value = Paragraph> {
    proptest::collection::vec(arb_item(), 0..12).prop_map(|content| Paragraph { content })
}

fn field_runs(paragraph: &Paragraph) -> Vec<Run> {
    paragraph.fields().flat_map(|f| f.runs.clone()).collect()
}

proptest! {
    #[test]
    fn text_is_preserved(mut paragraph in arb_paragraph()) {
        let before = paragraph.plain_text();
        inline_paragraph(&mut paragraph).unwrap();
        prop_assert_eq!(paragraph.plain_text(), before);
    }

    #[test]
    fn no_fields_remain(mut paragraph in arb_paragraph()) {
        let runs_before = paragraph.runs().count();
        let fields_before = paragraph.field_count();

        let report = inline_paragraph(&mut paragraph).unwrap();

        prop_assert_eq!(report.count(), fields_before);
        prop_assert_eq!(paragraph.field_count(), 0);
        prop_assert_eq!(paragraph.content.len(), runs_before);
    }

    #[test]
    fn paragraphs_without_fields_are_untouched(runs in proptest::collection::vec(arb_run(), 0..8)) {
        let mut paragraph = Paragraph {
            content: runs.into_iter().map(ContentItem::Run).collect(),
        };
        let before = paragraph.clone();

        inline_paragraph(&mut paragraph).unwrap();
        prop_assert_eq!(paragraph, before);
    }

    /// Every item keeps its place: plain runs stay as they were and each
    /// field becomes its run, formatted the same way.
    #[test]
    fn order_and_formatting_are_preserved(mut paragraph in arb_paragraph()) {
        let before = paragraph.clone();
        let originals = field_runs(&before);

        inline_paragraph(&mut paragraph).unwrap();

        let mut replaced = 0;
        for (old, new) in before.content.iter().zip(&paragraph.content) {
            let ContentItem::Run(new) = new else {
                return Err(TestCaseError::fail("field left after inlining"));
            };
            match old {
                ContentItem::Run(old) => prop_assert_eq!(old, new),
                ContentItem::Field(_) => {
                    let source = &originals[replaced];
                    replaced += 1;

                    prop_assert_eq!(&new.text, &source.text);
                    prop_assert_eq!(new.properties.bold, source.properties.bold);
                    prop_assert_eq!(new.properties.italic, source.properties.italic);
                    prop_assert_eq!(new.properties.underline, source.properties.underline);
                    prop_assert_eq!(&new.properties.color, &source.properties.color);
                    prop_assert_eq!(&new.properties.font_family, &source.properties.font_family);
                    prop_assert_eq!(new.properties.vertical_align, source.properties.vertical_align);
                    prop_assert_eq!(new.properties.font_size(), source.properties.font_size());
                }
                other => return Err(TestCaseError::fail(format!("unexpected item {:?}", other))),
            }
        }
        prop_assert_eq!(replaced, originals.len());
    }

    #[test]
    fn multi_run_fields_are_rejected(
        mut paragraph in arb_paragraph(),
        extra in proptest::collection::vec(arb_run(), 2..4),
        at in any::<prop::sample::Index>(),
    ) {
        let at = at.index(paragraph.content.len() + 1);
        paragraph
            .content
            .insert(at, ContentItem::Field(FieldWrapper::with_runs("DOCPROPERTY split", extra)));
        let before = paragraph.clone();

        let err = inline_paragraph(&mut paragraph).unwrap_err();
        let is_cardinality = matches!(err, Error::FieldCardinality { .. });
        prop_assert!(is_cardinality);
        prop_assert_eq!(paragraph, before);
    }
}
