//! Locating field wrappers and the run each one shows.

use std::collections::btree_map::{BTreeMap, Entry};

use crate::error::{Error, Result};
use crate::model::{ContentItem, Paragraph};

/// Locally scoped handle of a content item.
///
/// Handles are assigned at locate time from the item's position in the
/// untouched paragraph and stay valid for the rest of one transform, no
/// matter how the live content shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    /// Position of the item before any mutation.
    pub fn snapshot_index(self) -> usize {
        self.0
    }
}

/// Handle of a run nested in a field wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunHandle {
    /// The wrapper holding the run
    pub wrapper: ItemId,
    /// Index of the run among the wrapper's children
    pub child: usize,
}

/// A field wrapper paired with its single inner run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedField {
    /// The field wrapper
    pub wrapper: ItemId,
    /// The run that displays the field's value
    pub run: RunHandle,
}

/// One-to-one association between wrappers and their runs.
///
/// A second run for the same wrapper is rejected instead of overwriting
/// the first.
#[derive(Debug, Default)]
pub struct FieldRunMap {
    entries: BTreeMap<ItemId, RunHandle>,
}

impl FieldRunMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `run` with its wrapper.
    pub fn insert(&mut self, run: RunHandle) -> std::result::Result<(), RunHandle> {
        match self.entries.entry(run.wrapper) {
            Entry::Vacant(slot) => {
                slot.insert(run);
                Ok(())
            }
            Entry::Occupied(existing) => Err(*existing.get()),
        }
    }

    /// Number of wrappers in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in document order.
    pub fn into_located(self) -> Vec<LocatedField> {
        self.entries
            .into_iter()
            .map(|(wrapper, run)| LocatedField { wrapper, run })
            .collect()
    }
}

/// Find every field wrapper in `paragraph`, in document order, with its run.
///
/// Every wrapper is validated before anything is returned, so a caller that
/// mutates only after a successful locate never sees a half-valid paragraph.
pub fn locate(paragraph: &Paragraph) -> Result<Vec<LocatedField>> {
    let mut map = FieldRunMap::new();

    for (index, item) in paragraph.content.iter().enumerate() {
        let ContentItem::Field(field) = item else {
            continue;
        };
        let wrapper = ItemId(index);

        if field.runs.is_empty() {
            return Err(cardinality_error(paragraph, &field.instruction, 0));
        }

        for child in 0..field.runs.len() {
            if map.insert(RunHandle { wrapper, child }).is_err() {
                return Err(cardinality_error(
                    paragraph,
                    &field.instruction,
                    field.runs.len(),
                ));
            }
        }
    }

    log::debug!("Located {} fields in paragraph", map.len());
    Ok(map.into_located())
}

fn cardinality_error(paragraph: &Paragraph, instruction: &str, runs: usize) -> Error {
    Error::FieldCardinality {
        field: instruction.trim().to_string(),
        runs,
        paragraph: paragraph.plain_text(),
    }
}
