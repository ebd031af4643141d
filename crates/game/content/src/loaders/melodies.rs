//! Starting spellbook loader.

use std::path::Path;

use melody_core::{GameConfig, Inventory, Melody, Note, NoteCatalog, NoteColor};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// One hand-authored melody.
///
/// ```ron
/// [
///     (name: Some("Spark"), tier: 1, notes: [Red, Green]),
///     (tier: 2, notes: [Green, Blue, Green]),
/// ]
/// ```
///
/// Listing a sequence twice starts it at level 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MelodySpec {
    #[serde(default)]
    pub name: Option<String>,
    pub tier: u8,
    pub notes: Vec<NoteColor>,
}

impl MelodySpec {
    /// Resolves note costs through `catalog`, falling back to color defaults.
    pub fn build(&self, catalog: &NoteCatalog) -> LoadResult<Melody> {
        anyhow::ensure!(
            (1..=GameConfig::MAX_MELODY_NOTES).contains(&self.notes.len()),
            "melody must have 1..={} notes, got {}",
            GameConfig::MAX_MELODY_NOTES,
            self.notes.len()
        );
        let notes = self
            .notes
            .iter()
            .map(|&color| catalog.note(color).unwrap_or(Note::of(color)));
        let mut melody = Melody::new(self.tier, notes);
        melody.name = match &self.name {
            Some(name) => name.clone(),
            None => format!("Spell T{}-{}", self.tier, melody.signature()),
        };
        Ok(melody)
    }
}

pub struct MelodyLoader;

impl MelodyLoader {
    /// Loads `melodies.ron` into an inventory. Duplicate sequences level up
    /// the first copy.
    pub fn load(path: &Path, catalog: &NoteCatalog) -> LoadResult<Inventory> {
        let specs: Vec<MelodySpec> = parse_ron(path)?;
        let mut inventory = Inventory::new();
        for (index, spec) in specs.iter().enumerate() {
            let melody = spec
                .build(catalog)
                .map_err(|e| e.context(format!("melody #{} in {}", index, path.display())))?;
            inventory.learn(melody);
        }
        Ok(inventory)
    }
}
