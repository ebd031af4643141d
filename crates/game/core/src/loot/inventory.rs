use crate::melody::Melody;

/// Result of adding a looted melody to the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootOutcome {
    Learned { index: usize },
    LevelledUp { index: usize, level: u32 },
}

impl LootOutcome {
    pub const fn index(&self) -> usize {
        match *self {
            Self::Learned { index } | Self::LevelledUp { index, .. } => index,
        }
    }
}

/// Known melodies in insertion order.
///
/// Insertion order is the matcher's final tie-break, so entries are never
/// reordered or removed.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    melodies: Vec<Melody>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels up an entry with the same color sequence, or appends the
    /// melody at level 1.
    pub fn learn(&mut self, melody: Melody) -> LootOutcome {
        if let Some((index, known)) = self
            .melodies
            .iter_mut()
            .enumerate()
            .find(|(_, known)| known.is_same_sequence(&melody))
        {
            known.level += 1;
            return LootOutcome::LevelledUp {
                index,
                level: known.level,
            };
        }

        self.melodies.push(melody.with_level(1));
        LootOutcome::Learned {
            index: self.melodies.len() - 1,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Melody> {
        self.melodies.get(index)
    }

    pub fn melodies(&self) -> &[Melody] {
        &self.melodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Melody> {
        self.melodies.iter()
    }

    pub fn len(&self) -> usize {
        self.melodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.melodies.is_empty()
    }
}

impl FromIterator<Melody> for Inventory {
    fn from_iter<I: IntoIterator<Item = Melody>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for melody in iter {
            inventory.learn(melody);
        }
        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteColor::*;

    #[test]
    fn duplicate_sequence_levels_existing_entry() {
        let mut inventory = Inventory::new();
        assert_eq!(
            inventory.learn(Melody::from_colors(1, &[Red, Blue])),
            LootOutcome::Learned { index: 0 }
        );
        assert_eq!(
            inventory.learn(Melody::from_colors(1, &[Red, Blue])),
            LootOutcome::LevelledUp { index: 0, level: 2 }
        );
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get(0).map(|m| m.level), Some(2));
    }

    #[test]
    fn single_color_difference_is_a_new_entry() {
        let mut inventory = Inventory::new();
        inventory.learn(Melody::from_colors(1, &[Red, Blue]));
        let outcome = inventory.learn(Melody::from_colors(1, &[Red, Green]));
        assert_eq!(outcome, LootOutcome::Learned { index: 1 });
        assert_eq!(inventory.get(1).map(|m| m.level), Some(1));
    }

    #[test]
    fn reversed_sequence_is_distinct() {
        let inventory: Inventory = [
            Melody::from_colors(1, &[Red, Blue]),
            Melody::from_colors(1, &[Blue, Red]),
        ]
        .into_iter()
        .collect();
        assert_eq!(inventory.len(), 2);
    }
}
