use slotmap::SecondaryMap;

use super::CellId;

/// Side table that attaches caller-defined payload to cells by id.
///
/// The grid itself never sees the payload type, so gameplay layers can store
/// biome, ownership or resource data without the core depending on them.
#[derive(Debug, Clone)]
pub struct CellAttachments<T> {
    slots: SecondaryMap<CellId, T>,
}

impl<T> Default for CellAttachments<T> {
    fn default() -> Self {
        Self {
            slots: SecondaryMap::new(),
        }
    }
}

impl<T> CellAttachments<T> {
    /// Creates an empty attachment table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `value` to `cell`, returning the previous payload if any.
    pub fn insert(&mut self, cell: CellId, value: T) -> Option<T> {
        self.slots.insert(cell, value)
    }

    #[must_use]
    pub fn get(&self, cell: CellId) -> Option<&T> {
        self.slots.get(cell)
    }

    pub fn get_mut(&mut self, cell: CellId) -> Option<&mut T> {
        self.slots.get_mut(cell)
    }

    pub fn remove(&mut self, cell: CellId) -> Option<T> {
        self.slots.remove(cell)
    }

    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        self.slots.contains_key(cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over all attached payloads.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &T)> {
        self.slots.iter()
    }
}
