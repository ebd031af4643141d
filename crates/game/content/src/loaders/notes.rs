//! Note catalog loader.

use std::path::Path;

use melody_core::{GameConfig, Note, NoteCatalog, NoteColor};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron};

/// On-disk shape of the note catalog.
///
/// ```ron
/// (
///     notes: [
///         (color: Green, complexity_cost: 1),
///         (color: Red, complexity_cost: 3),
///     ],
///     keys: Some([Some(Green), None, Some(Red), None]),
/// )
/// ```
///
/// Without `keys`, each note is bound to its color's default key. With
/// `keys`, unlisted indices are unbound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCatalogSpec {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub keys: Option<Vec<Option<NoteColor>>>,
}

impl NoteCatalogSpec {
    pub fn build(self) -> LoadResult<NoteCatalog> {
        anyhow::ensure!(!self.notes.is_empty(), "note catalog is empty");
        for note in &self.notes {
            anyhow::ensure!(
                (1..=5).contains(&note.complexity_cost),
                "note {} has cost {} outside 1..=5",
                note.color,
                note.complexity_cost
            );
        }

        let mut catalog = NoteCatalog::new(self.notes);
        if let Some(keys) = self.keys {
            anyhow::ensure!(
                keys.len() <= GameConfig::NOTE_KEYS,
                "key map binds {} keys, at most {} exist",
                keys.len(),
                GameConfig::NOTE_KEYS
            );
            for index in 0..GameConfig::NOTE_KEYS {
                catalog = catalog.with_key(index, keys.get(index).copied().flatten());
            }
        }
        Ok(catalog)
    }
}

pub struct NoteLoader;

impl NoteLoader {
    pub fn load(path: &Path) -> LoadResult<NoteCatalog> {
        let spec: NoteCatalogSpec = parse_ron(path)?;
        spec.build()
            .map_err(|e| e.context(format!("invalid note catalog {}", path.display())))
    }
}
