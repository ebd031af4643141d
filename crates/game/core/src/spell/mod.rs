//! Spell matching and building.
//!
//! The matcher turns played notes into a ready melody; the builder turns a
//! melody into a [`SpellPayload`] the effect arena can materialize.
mod builder;
mod matcher;
mod payload;

pub use builder::SpellBuilder;
pub use matcher::{FiredSpell, MatchError, MatchedIndices, NoteQueue, SpellMatch, SpellMatcher};
pub use payload::{FireDirections, SpellEffect, SpellForm, SpellPayload};
