//! Melodies: learned note sequences with a tier and a level.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::note::{Note, NoteColor};

/// Fixed-capacity note sequence of a melody.
pub type NoteSequence = ArrayVec<Note, { GameConfig::MAX_MELODY_NOTES }>;

/// A learned spell: an ordered note sequence plus rarity tier and level.
///
/// Melodies are created by the loot generator and only ever change through
/// leveling; the sequence is never reordered.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Melody {
    pub name: String,
    /// Rarity class, 1 (common) ..= 4 (legendary).
    pub tier: u8,
    /// Starts at 1 and grows by one per duplicate loot.
    pub level: u32,
    pub sequence: NoteSequence,
}

impl Melody {
    /// Creates a level-1 melody. Notes beyond the sequence capacity are dropped.
    pub fn new(tier: u8, notes: impl IntoIterator<Item = Note>) -> Self {
        let sequence = notes
            .into_iter()
            .take(GameConfig::MAX_MELODY_NOTES)
            .collect();
        Self {
            name: String::new(),
            tier,
            level: 1,
            sequence,
        }
    }

    /// Creates a melody from colors using each color's default cost.
    pub fn from_colors(tier: u8, colors: &[NoteColor]) -> Self {
        Self::new(tier, colors.iter().copied().map(Note::of))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn colors(&self) -> impl Iterator<Item = NoteColor> + '_ {
        self.sequence.iter().map(|note| note.color)
    }

    /// Sum of complexity costs, used against tier cost bounds.
    pub fn total_cost(&self) -> u32 {
        self.sequence
            .iter()
            .map(|note| u32::from(note.complexity_cost))
            .sum()
    }

    /// Order-sensitive, full-length color equality.
    pub fn is_same_sequence(&self, other: &Melody) -> bool {
        self.sequence.len() == other.sequence.len()
            && self
                .sequence
                .iter()
                .zip(other.sequence.iter())
                .all(|(a, b)| a.color == b.color)
    }

    /// Compact color tag, e.g. `"RBG"`.
    pub fn signature(&self) -> String {
        self.colors().map(NoteColor::initial).collect()
    }
}
