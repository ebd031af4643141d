use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::loot::Inventory;
use crate::melody::Melody;
use crate::note::{Note, NoteCatalog};

use super::builder::SpellBuilder;
use super::payload::SpellPayload;

/// Queue slots consumed by a match, ascending.
pub type MatchedIndices = ArrayVec<usize, { GameConfig::MAX_QUEUE_NOTES }>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("note key {index} is not bound")]
    UnknownKey { index: usize },
}

impl GameError for MatchError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKey { .. } => "MATCH_UNKNOWN_KEY",
        }
    }
}

/// Bounded FIFO of played notes. The oldest note is evicted on overflow.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteQueue {
    notes: ArrayVec<Note, { GameConfig::MAX_QUEUE_NOTES }>,
}

impl NoteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a note and returns the evicted one, if any.
    pub fn push(&mut self, note: Note) -> Option<Note> {
        let evicted = if self.notes.is_full() {
            Some(self.notes.remove(0))
        } else {
            None
        };
        self.notes.push(note);
        evicted
    }

    /// Removes the given slots, keeping the order of the rest.
    pub fn remove_indices(&mut self, indices: &[usize]) {
        let mut slot = 0;
        self.notes.retain(|_| {
            let keep = !indices.contains(&slot);
            slot += 1;
            keep
        });
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

/// The winning melody and where it sits in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellMatch {
    pub inventory_index: usize,
    pub offset: usize,
    pub len: usize,
    pub tier: u8,
}

impl SpellMatch {
    pub fn indices(&self) -> MatchedIndices {
        (self.offset..self.offset + self.len).collect()
    }

    /// Longer wins, then higher tier. Equal candidates keep the earlier one.
    fn beats(&self, other: &SpellMatch) -> bool {
        (self.len, self.tier) > (other.len, other.tier)
    }
}

/// Result of a successful fire.
#[derive(Clone, Debug, PartialEq)]
pub struct FiredSpell {
    pub melody: Melody,
    pub payload: SpellPayload,
    pub consumed: MatchedIndices,
    /// Match found on the remaining notes right after consuming.
    pub chained: Option<SpellMatch>,
}

/// Matches the note queue against the inventory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpellMatcher {
    queue: NoteQueue,
    current: Option<SpellMatch>,
}

impl SpellMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_note(&mut self, note: Note, inventory: &Inventory) -> Option<SpellMatch> {
        self.queue.push(note);
        self.check_for_combinations(inventory)
    }

    /// Resolves a key index through the catalog and pushes the note.
    pub fn push_key(
        &mut self,
        index: usize,
        catalog: &NoteCatalog,
        inventory: &Inventory,
    ) -> Result<Option<SpellMatch>, MatchError> {
        let note = catalog
            .note_for_key(index)
            .ok_or(MatchError::UnknownKey { index })?;
        Ok(self.push_note(note, inventory))
    }

    /// Re-evaluates the best match for the current queue.
    ///
    /// Every melody is tried at every offset where it fits, right-most offset
    /// first. The longest match wins; ties go to the higher tier, then to the
    /// melody learned first.
    pub fn check_for_combinations(&mut self, inventory: &Inventory) -> Option<SpellMatch> {
        let queue = self.queue.as_slice();
        let mut best: Option<SpellMatch> = None;

        for (inventory_index, melody) in inventory.iter().enumerate() {
            let len = melody.len();
            if len == 0 || len > queue.len() {
                continue;
            }
            let found = (0..=queue.len() - len).rev().find(|&offset| {
                queue[offset..offset + len]
                    .iter()
                    .zip(melody.sequence.iter())
                    .all(|(played, wanted)| played == wanted)
            });
            let Some(offset) = found else {
                continue;
            };
            let candidate = SpellMatch {
                inventory_index,
                offset,
                len,
                tier: melody.tier,
            };
            if best.as_ref().is_none_or(|current| candidate.beats(current)) {
                best = Some(candidate);
            }
        }

        self.current = best;
        best
    }

    pub fn has_spell_ready(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_match(&self) -> Option<&SpellMatch> {
        self.current.as_ref()
    }

    /// Lit queue slots; empty when nothing matches.
    pub fn matched_indices(&self) -> MatchedIndices {
        self.current
            .as_ref()
            .map(SpellMatch::indices)
            .unwrap_or_default()
    }

    pub fn queue_snapshot(&self) -> &[Note] {
        self.queue.as_slice()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.current = None;
    }

    /// Builds the matched melody, consumes its notes and re-matches.
    ///
    /// Returns `None` without touching the queue when no spell is ready.
    pub fn fire_current_spell(
        &mut self,
        inventory: &Inventory,
        builder: &SpellBuilder,
    ) -> Option<FiredSpell> {
        // The inventory may have grown since the last push.
        let current = self.check_for_combinations(inventory)?;
        let melody = inventory.get(current.inventory_index)?.clone();
        let payload = builder.build(&melody);
        let consumed = current.indices();

        self.queue.remove_indices(&consumed);
        let chained = self.check_for_combinations(inventory);

        Some(FiredSpell {
            melody,
            payload,
            consumed,
            chained,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteColor::{self, *};

    fn play(matcher: &mut SpellMatcher, inventory: &Inventory, colors: &[NoteColor]) {
        for color in colors {
            matcher.push_note(Note::of(*color), inventory);
        }
    }

    fn queue_colors(matcher: &SpellMatcher) -> Vec<NoteColor> {
        matcher.queue_snapshot().iter().map(|n| n.color).collect()
    }

    #[test]
    fn queue_never_exceeds_capacity() {
        let mut queue = NoteQueue::new();
        for color in [Green, Blue, Red, Yellow] {
            assert_eq!(queue.push(Note::of(color)), None);
        }
        assert_eq!(queue.push(Note::of(Green)), Some(Note::of(Green)));
        assert_eq!(queue.len(), GameConfig::MAX_QUEUE_NOTES);
        let colors: Vec<_> = queue.as_slice().iter().map(|n| n.color).collect();
        assert_eq!(colors, vec![Blue, Red, Yellow, Green]);
    }

    #[test]
    fn matches_inner_pair_and_consumes_only_it() {
        let inventory: Inventory = [Melody::from_colors(1, &[Red, Blue])].into_iter().collect();
        let mut matcher = SpellMatcher::new();
        play(&mut matcher, &inventory, &[Green, Red, Blue, Green]);

        assert!(matcher.has_spell_ready());
        assert_eq!(matcher.matched_indices().as_slice(), &[1, 2]);

        let fired = matcher
            .fire_current_spell(&inventory, &SpellBuilder::default())
            .expect("spell ready");
        assert_eq!(fired.consumed.as_slice(), &[1, 2]);
        assert_eq!(queue_colors(&matcher), vec![Green, Green]);
        assert_eq!(fired.chained, None);
        assert!(!matcher.has_spell_ready());
    }

    #[test]
    fn longest_match_wins() {
        let inventory: Inventory = [
            Melody::from_colors(1, &[Red]),
            Melody::from_colors(1, &[Red, Blue]),
        ]
        .into_iter()
        .collect();
        let mut matcher = SpellMatcher::new();
        play(&mut matcher, &inventory, &[Green, Red, Blue]);

        let current = matcher.current_match().copied().expect("match");
        assert_eq!(current.inventory_index, 1);
        assert_eq!(matcher.matched_indices().as_slice(), &[1, 2]);
    }

    #[test]
    fn equal_length_prefers_higher_tier_then_insertion_order() {
        let inventory: Inventory = [
            Melody::from_colors(1, &[Green, Green]),
            Melody::from_colors(2, &[Red, Red]),
            Melody::from_colors(2, &[Blue, Blue]),
        ]
        .into_iter()
        .collect();
        let mut matcher = SpellMatcher::new();
        play(&mut matcher, &inventory, &[Green, Green, Blue, Blue]);
        assert_eq!(matcher.current_match().map(|m| m.inventory_index), Some(2));

        matcher.clear();
        play(&mut matcher, &inventory, &[Red, Red, Blue, Blue]);
        assert_eq!(matcher.current_match().map(|m| m.inventory_index), Some(1));
    }

    #[test]
    fn fire_without_match_is_a_no_op() {
        let inventory = Inventory::new();
        let mut matcher = SpellMatcher::new();
        play(&mut matcher, &inventory, &[Red, Blue]);
        assert!(
            matcher
                .fire_current_spell(&inventory, &SpellBuilder::default())
                .is_none()
        );
        assert_eq!(queue_colors(&matcher), vec![Red, Blue]);
    }

    #[test]
    fn firing_rechecks_remaining_notes() {
        let inventory: Inventory = [
            Melody::from_colors(1, &[Green, Green]),
            Melody::from_colors(1, &[Red, Blue]),
        ]
        .into_iter()
        .collect();
        let mut matcher = SpellMatcher::new();
        play(&mut matcher, &inventory, &[Green, Red, Blue, Green]);

        let fired = matcher
            .fire_current_spell(&inventory, &SpellBuilder::default())
            .expect("spell ready");
        assert_eq!(fired.melody.signature(), "RB");
        assert_eq!(fired.chained.map(|m| m.inventory_index), Some(0));
        assert!(matcher.has_spell_ready());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut matcher = SpellMatcher::new();
        let err = matcher
            .push_key(9, &NoteCatalog::default(), &Inventory::new())
            .expect_err("out of range");
        assert_eq!(err, MatchError::UnknownKey { index: 9 });
        assert!(matcher.queue_snapshot().is_empty());
    }
}
