//! Notes: the atomic colored inputs that compose melodies.

use strum::IntoEnumIterator;

use crate::config::GameConfig;

/// Color of a note. The color is the note's identity for matching.
///
/// Each color doubles as a melee input (green poke, blue sweep, red smash,
/// yellow guard) and selects a delivery form or effect when it sits at the
/// head of a melody.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NoteColor {
    Green,
    Blue,
    Red,
    Yellow,
}

impl NoteColor {
    /// Default complexity cost used when no catalog overrides it.
    pub const fn default_cost(self) -> u8 {
        match self {
            Self::Green => 1,
            Self::Blue => 2,
            Self::Red => 3,
            Self::Yellow => 4,
        }
    }

    /// Default key index (0..=3) bound to this color.
    pub const fn key_index(self) -> usize {
        match self {
            Self::Green => 0,
            Self::Blue => 1,
            Self::Red => 2,
            Self::Yellow => 3,
        }
    }

    /// Single-letter tag used in logs and queue dumps.
    pub const fn initial(self) -> char {
        match self {
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Red => 'R',
            Self::Yellow => 'Y',
        }
    }
}

/// A note definition: color plus the cost used by loot generation.
///
/// Two notes are equal when their colors are equal; the cost never takes
/// part in matching.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pub color: NoteColor,
    /// Weight of this note in tier cost sums (1..=5).
    pub complexity_cost: u8,
}

impl Note {
    pub const fn new(color: NoteColor, complexity_cost: u8) -> Self {
        Self {
            color,
            complexity_cost,
        }
    }

    /// Note with the color's default cost.
    pub const fn of(color: NoteColor) -> Self {
        Self::new(color, color.default_cost())
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
    }
}

impl Eq for Note {}

impl core::hash::Hash for Note {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.color.hash(state);
    }
}

impl From<NoteColor> for Note {
    fn from(color: NoteColor) -> Self {
        Self::of(color)
    }
}

/// The set of notes the generator draws from, plus the key map that turns
/// input indices into notes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteCatalog {
    notes: Vec<Note>,
    key_map: [Option<NoteColor>; GameConfig::NOTE_KEYS],
}

impl NoteCatalog {
    /// Builds a catalog; the key map binds index `i` to the note whose
    /// color's default key index is `i`.
    pub fn new(notes: Vec<Note>) -> Self {
        let mut key_map = [None; GameConfig::NOTE_KEYS];
        for note in &notes {
            key_map[note.color.key_index()] = Some(note.color);
        }
        Self { notes, key_map }
    }

    /// Overrides which color a key index plays.
    pub fn with_key(mut self, index: usize, color: Option<NoteColor>) -> Self {
        if let Some(slot) = self.key_map.get_mut(index) {
            *slot = color;
        }
        self
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Looks up the catalog entry for a color.
    pub fn note(&self, color: NoteColor) -> Option<Note> {
        self.notes.iter().copied().find(|note| note.color == color)
    }

    /// Resolves an input key index to a note.
    ///
    /// Returns `None` for indices outside the key map, unbound keys, and keys
    /// whose color is missing from the catalog.
    pub fn note_for_key(&self, index: usize) -> Option<Note> {
        let color = (*self.key_map.get(index)?)?;
        self.note(color)
    }
}

impl Default for NoteCatalog {
    fn default() -> Self {
        Self::new(NoteColor::iter().map(Note::of).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_compare_by_color_only() {
        assert_eq!(
            Note::new(NoteColor::Red, 1),
            Note::new(NoteColor::Red, 5)
        );
        assert_ne!(Note::of(NoteColor::Red), Note::of(NoteColor::Blue));
    }

    #[test]
    fn default_catalog_maps_keys_in_color_order() {
        let catalog = NoteCatalog::default();
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.note_for_key(0).map(|n| n.color),
            Some(NoteColor::Green)
        );
        assert_eq!(
            catalog.note_for_key(3).map(|n| n.color),
            Some(NoteColor::Yellow)
        );
        assert_eq!(catalog.note_for_key(4), None);
    }

    #[test]
    fn unbound_key_plays_nothing() {
        let catalog = NoteCatalog::default().with_key(2, None);
        assert_eq!(catalog.note_for_key(2), None);
    }

    #[test]
    fn color_parses_case_insensitively() {
        assert_eq!("YELLOW".parse::<NoteColor>().ok(), Some(NoteColor::Yellow));
        assert_eq!(NoteColor::Blue.to_string(), "blue");
    }
}
