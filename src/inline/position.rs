//! Shadow position model for one paragraph transform.
//!
//! Positions are never re-derived from the live content while it is being
//! mutated. The model is built from the untouched paragraph, counts its own
//! insertions and removals, and mirrors every change made to the content.

use crate::error::Error;
use crate::model::{ContentItem, Paragraph, Run};

use super::locator::{ItemId, RunHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// An item present before the transform started
    Original(ItemId),
    /// A replacement run inserted for the given wrapper
    Inserted(ItemId),
}

/// Authoritative order of a paragraph's content during one transform.
#[derive(Debug, Clone)]
pub struct PositionModel {
    slots: Vec<Slot>,
    insertions: usize,
}

impl PositionModel {
    /// Build the model from the paragraph before any mutation.
    pub fn new(paragraph: &Paragraph) -> Self {
        Self {
            slots: (0..paragraph.content.len())
                .map(|index| Slot::Original(ItemId(index)))
                .collect(),
            insertions: 0,
        }
    }

    /// Number of replacement runs inserted so far.
    pub fn insertions(&self) -> usize {
        self.insertions
    }

    /// Number of content items the model currently tracks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the model tracks no items.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insertion point for the replacement of `wrapper`.
    ///
    /// Wrappers are replaced in document order, so every insertion made so
    /// far sits before `wrapper` and shifts it by exactly one slot. The
    /// result is checked against the model and `None` is returned when the
    /// slot does not hold the wrapper.
    pub fn resolve(&self, wrapper: ItemId) -> Option<usize> {
        let at = wrapper.snapshot_index() + self.insertions;
        match self.slots.get(at) {
            Some(Slot::Original(id)) if *id == wrapper => Some(at),
            _ => None,
        }
    }

    /// Current position of an original item.
    pub fn position_of(&self, item: ItemId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| *slot == Slot::Original(item))
    }

    /// Record a replacement run inserted at `at` for `wrapper`.
    pub fn record_insertion(&mut self, at: usize, wrapper: ItemId) {
        self.slots.insert(at, Slot::Inserted(wrapper));
        self.insertions += 1;
    }

    /// Record the removal of the item at `at`, returning the removed item.
    ///
    /// Only original items can be removed; replacement runs are permanent.
    pub fn record_removal(&mut self, at: usize) -> Option<ItemId> {
        match self.slots.get(at) {
            Some(Slot::Original(id)) => {
                let id = *id;
                self.slots.remove(at);
                Some(id)
            }
            _ => None,
        }
    }

    /// Wrappers that have a replacement run, in current order.
    pub fn replaced(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Inserted(id) => Some(*id),
            Slot::Original(_) => None,
        })
    }
}

/// Look up a field's run through the model.
pub fn resolve_run<'p>(
    paragraph: &'p Paragraph,
    model: &PositionModel,
    run: RunHandle,
) -> Option<&'p Run> {
    let at = model.position_of(run.wrapper)?;
    match paragraph.content.get(at)? {
        ContentItem::Field(field) => field.runs.get(run.child),
        _ => None,
    }
}

pub(crate) fn run_not_found(paragraph: &Paragraph, run_text: &str) -> Error {
    Error::RunNotFound {
        run: run_text.to_string(),
        paragraph: paragraph.plain_text(),
    }
}
