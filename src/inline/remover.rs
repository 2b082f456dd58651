//! Removing field wrappers once their replacements are in place.

use crate::model::{ContentItem, Paragraph};

use super::position::PositionModel;

/// Delete every field wrapper from `paragraph`, returning how many were removed.
///
/// Always removes the first remaining wrapper, so earlier removals can
/// never invalidate the position of a later one. The model is updated in
/// lockstep with the content.
pub fn remove_fields(paragraph: &mut Paragraph, model: &mut PositionModel) -> usize {
    let mut removed = 0;

    while let Some(at) = paragraph.content.iter().position(ContentItem::is_field) {
        paragraph.content.remove(at);
        if model.record_removal(at).is_none() {
            log::warn!("Removed field at {} that the position model did not track", at);
        }
        removed += 1;
    }

    removed
}
