//! Event types for different topics.

use melody_core::{
    CombatReport, CombatantId, EffectEvent, EffectHandle, EffectOutcome, LootOutcome,
    MatchedIndices, NoteColor, SpellEffect, SpellForm, SwingKind,
};
use serde::{Deserialize, Serialize};

/// Note queue and spell lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpellEvent {
    /// A note entered the queue; `queue` is the queue afterwards.
    NotePlayed {
        color: NoteColor,
        queue: Vec<NoteColor>,
    },

    /// The queue now matches a known melody.
    SpellReady {
        melody: String,
        indices: MatchedIndices,
    },

    SpellFired {
        melody: String,
        form: SpellForm,
        effect: SpellEffect,
        consumed: MatchedIndices,
        handles: Vec<EffectHandle>,
    },
}

/// Everything that touched a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    Effect(EffectEvent),

    MeleeHit {
        target: CombatantId,
        kind: SwingKind,
        outcome: EffectOutcome,
    },

    /// An enemy strike landed on the player (blocked or not).
    PlayerHit {
        attacker: CombatantId,
        outcome: EffectOutcome,
    },

    /// An enemy strike met a fresh guard.
    Parried {
        attacker: CombatantId,
        counter: EffectOutcome,
    },

    Respawned {
        target: CombatantId,
    },

    Thawed {
        target: CombatantId,
    },

    Report {
        target: CombatantId,
        report: CombatReport,
    },

    PlayerExhausted,

    PlayerRecovered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LootEvent {
    MelodyLooted {
        source: String,
        melody: String,
        tier: u8,
        level: u32,
        outcome: LootOutcome,
        /// The luck roll bumped the tier.
        lucky: bool,
        within_budget: bool,
    },
}
