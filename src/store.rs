//! Ordered palette of identified colour entries.
//!
//! Every operation leaves `self` untouched and returns the resulting palette.
//! Operations addressing an id that is not present are no-ops.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Value given to entries added without an explicit colour.
pub const DEFAULT_COLOUR: &str = "#123456";

/// Stable handle for a palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A colour as entered by the user, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourEntry {
    pub id: EntryId,
    pub value: String,
}

impl ColourEntry {
    /// Create an entry with a freshly generated id.
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_id(EntryId::new(), value)
    }

    pub fn with_id(id: EntryId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<ColourEntry>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The anchor entry.
    pub fn first(&self) -> Option<&ColourEntry> {
        self.entries.first()
    }

    pub fn get(&self, id: EntryId) -> Option<&ColourEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColourEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ColourEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn values(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.value.as_str()).collect()
    }

    /// Append a new entry with a fresh id.
    pub fn add(&self, value: impl Into<String>) -> Palette {
        let mut entries = self.entries.clone();
        entries.push(ColourEntry::new(value));
        Palette { entries }
    }

    pub fn add_default(&self) -> Palette {
        self.add(DEFAULT_COLOUR)
    }

    pub fn remove(&self, id: EntryId) -> Palette {
        if self.position(id).is_none() {
            debug!(%id, "remove: no such entry");
        }
        Palette {
            entries: self.entries.iter().filter(|e| e.id != id).cloned().collect(),
        }
    }

    /// Replace the value of the entry with `id`, keeping its id.
    pub fn update(&self, id: EntryId, value: impl Into<String>) -> Palette {
        let value = value.into();
        let entries = self
            .entries
            .iter()
            .map(|e| {
                if e.id == id {
                    ColourEntry::with_id(id, value.clone())
                } else {
                    e.clone()
                }
            })
            .collect();
        Palette { entries }
    }

    /// Rearrange entries into the order given by `order`.
    ///
    /// `order` must name every current id exactly once.
    pub fn reorder(&self, order: &[EntryId]) -> Result<Palette> {
        if order.len() != self.entries.len() {
            warn!(
                expected = self.entries.len(),
                got = order.len(),
                "rejecting reorder"
            );
            return Err(Error::InvalidReorder(format!(
                "expected {} ids, got {}",
                self.entries.len(),
                order.len()
            )));
        }

        let mut seen = HashSet::with_capacity(order.len());
        let mut entries = Vec::with_capacity(order.len());
        for &id in order {
            if !seen.insert(id) {
                warn!(%id, "rejecting reorder with repeated id");
                return Err(Error::InvalidReorder(format!("id {id} appears twice")));
            }
            let entry = self.get(id).ok_or_else(|| {
                warn!(%id, "rejecting reorder with unknown id");
                Error::InvalidReorder(format!("id {id} is not in the palette"))
            })?;
            entries.push(entry.clone());
        }
        Ok(Palette { entries })
    }

    pub fn clear(&self) -> Palette {
        Palette::new()
    }

    /// Adopt `entries` wholesale, ids included.
    pub fn replace_all(&self, entries: impl IntoIterator<Item = ColourEntry>) -> Palette {
        entries.into_iter().collect()
    }

    /// Concatenate `other` after this palette.
    pub fn append(&self, other: &Palette) -> Palette {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// The same values in the same order under fresh ids.
    pub fn reissued(&self) -> Palette {
        self.iter().map(|e| ColourEntry::new(e.value.clone())).collect()
    }
}

impl FromIterator<ColourEntry> for Palette {
    fn from_iter<I: IntoIterator<Item = ColourEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a ColourEntry;
    type IntoIter = std::slice::Iter<'a, ColourEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_of(values: &[&str]) -> Palette {
        values.iter().map(|v| ColourEntry::new(*v)).collect()
    }

    #[test]
    fn add_appends_with_fresh_id() {
        let palette = palette_of(&["#111111"]);
        let grown = palette.add("#222222");

        assert_eq!(palette.len(), 1, "original palette must be untouched");
        assert_eq!(grown.values(), ["#111111", "#222222"]);
        assert_ne!(grown.entries()[0].id, grown.entries()[1].id);
    }

    #[test]
    fn add_default_uses_default_colour() {
        let palette = Palette::new().add_default();
        assert_eq!(palette.values(), [DEFAULT_COLOUR]);
    }

    #[test]
    fn add_then_remove_restores_palette() {
        let palette = palette_of(&["#111111", "#222222"]);
        let grown = palette.add("#333333");
        let added = grown.entries().last().unwrap().id;

        assert_eq!(grown.remove(added), palette);
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let palette = palette_of(&["#111111"]);
        assert_eq!(palette.remove(EntryId::new()), palette);
    }

    #[test]
    fn update_keeps_id_and_position() {
        let palette = palette_of(&["#111111", "#222222", "#333333"]);
        let target = palette.entries()[1].id;

        let updated = palette.update(target, "#abcdef");

        assert_eq!(updated.values(), ["#111111", "#abcdef", "#333333"]);
        assert_eq!(updated.ids(), palette.ids());
    }

    #[test]
    fn update_absent_id_is_noop() {
        let palette = palette_of(&["#111111"]);
        assert_eq!(palette.update(EntryId::new(), "#000000"), palette);
    }

    #[test]
    fn reorder_permutation() {
        let palette = palette_of(&["#111111", "#222222", "#333333"]);
        let mut order = palette.ids();
        order.reverse();

        let reordered = palette.reorder(&order).unwrap();

        assert_eq!(reordered.values(), ["#333333", "#222222", "#111111"]);
        assert_eq!(reordered.ids(), order);
    }

    #[test]
    fn reorder_rejects_wrong_length() {
        let palette = palette_of(&["#111111", "#222222"]);
        let order = vec![palette.entries()[0].id];
        assert!(matches!(
            palette.reorder(&order),
            Err(Error::InvalidReorder(_))
        ));
    }

    #[test]
    fn reorder_rejects_duplicates() {
        let palette = palette_of(&["#111111", "#222222"]);
        let first = palette.entries()[0].id;
        assert!(matches!(
            palette.reorder(&[first, first]),
            Err(Error::InvalidReorder(_))
        ));
    }

    #[test]
    fn reorder_rejects_unknown_ids() {
        let palette = palette_of(&["#111111", "#222222"]);
        let order = [palette.entries()[0].id, EntryId::new()];
        assert!(matches!(
            palette.reorder(&order),
            Err(Error::InvalidReorder(_))
        ));
    }

    #[test]
    fn clear_empties() {
        assert!(palette_of(&["#111111", "#222222"]).clear().is_empty());
    }

    #[test]
    fn replace_all_keeps_given_ids() {
        let palette = palette_of(&["#111111"]);
        let replacement = palette_of(&["#aaaaaa", "#bbbbbb"]);

        let replaced = palette.replace_all(replacement.entries().to_vec());

        assert_eq!(replaced, replacement);
    }

    #[test]
    fn append_concatenates_in_order() {
        let a = palette_of(&["#111111"]);
        let b = palette_of(&["#222222", "#333333"]);
        assert_eq!(a.append(&b).values(), ["#111111", "#222222", "#333333"]);
    }

    #[test]
    fn reissued_keeps_values_with_new_ids() {
        let palette = palette_of(&["#111111", "#111111"]);
        let reissued = palette.reissued();

        assert_eq!(reissued.values(), palette.values());
        for (old, new) in palette.iter().zip(reissued.iter()) {
            assert_ne!(old.id, new.id);
        }
    }
}
