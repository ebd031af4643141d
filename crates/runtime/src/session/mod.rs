//! Frame-stepped session tying the core rules together.
//!
//! [`Session::step`] runs one frame in a fixed order: raw note input,
//! controller input (which may play notes, raise guard or fire), controller
//! timers, the active melee swing, effect resolvers, then combatant and
//! player timers. Every observable change is logged through `tracing`,
//! published on the [`EventBus`] and queued for [`Session::drain_events`].
mod builder;
mod input;

use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use melody_core::{
    CastOrigin, CombatTarget, CombatantId, ControlEvent, Damageable, EffectArena, EffectEvent,
    EffectHandle, EffectOutcome, GameConfig, GuardResult, Inventory, LootGenerator, LootSeed,
    LootTable, MatchedIndices, Melody, Note, NoteCatalog, NoteColor, PlayerController,
    PlayerStats, RngOracle, SlowSpec, SpellBuilder, SpellEffect, SpellMatch, SpellMatcher,
    TablesOracle, TargetKind, TargetStore, apply_effect,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

pub use builder::{SessionBuilder, SessionConfig};
pub use input::FrameInput;

use crate::error::{Result, RuntimeError};
use crate::events::{CombatEvent, Event, EventBus, LootEvent, SpellEvent, Topic};
use crate::oracle::OracleManager;
use crate::world::{Arena, Wall};

/// Per-frame gauges for a HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub health: f32,
    pub shield: f32,
    pub stamina: f32,
    pub exhausted: bool,
    pub queue: Vec<NoteColor>,
    pub lit: MatchedIndices,
    pub spell_ready: bool,
    pub targets: Vec<TargetGauge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetGauge {
    pub id: CombatantId,
    pub kind: TargetKind,
    pub health: f32,
    pub shield: f32,
    pub slow: f32,
}

/// How an enemy strike on the player resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeOutcome {
    pub guard: Option<GuardResult>,
    /// Effect on the player; `Ignored` on a perfect parry.
    pub player: EffectOutcome,
    /// Counter damage dealt back on a perfect parry.
    pub counter: Option<EffectOutcome>,
}

pub struct Session {
    config: SessionConfig,
    oracles: OracleManager,
    generator: LootGenerator,
    builder: SpellBuilder,
    matcher: SpellMatcher,
    inventory: Inventory,
    controller: PlayerController,
    arena: Arena,
    effects: EffectArena,
    loot_sources: HashMap<String, LootTable>,
    loot_nonce: u64,
    bus: EventBus,
    /// Undrained events, oldest first, capped at `event_buffer_size`.
    pending: VecDeque<Event>,
    facing: Vec3,
    clock: f32,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Seconds simulated so far.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn catalog(&self) -> &NoteCatalog {
        self.generator.catalog()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn effects(&self) -> &EffectArena {
        &self.effects
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Takes the events produced since the last drain.
    ///
    /// At most `event_buffer_size` events are kept; older ones are dropped,
    /// so hosts that only use [`Session::subscribe`] never need to drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.pending.drain(..).collect()
    }

    /// Number of events waiting for [`Session::drain_events`].
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    // ------------------------------------------------------------------
    // Notes and spells
    // ------------------------------------------------------------------

    /// Pushes the note bound to key `index`. Unknown keys are logged and
    /// ignored.
    pub fn push_note(&mut self, index: usize) -> Option<SpellMatch> {
        match self.try_push_note(index) {
            Ok(found) => found,
            Err(err) => {
                warn!(index, error = %err, "ignoring note input");
                None
            }
        }
    }

    pub fn try_push_note(&mut self, index: usize) -> Result<Option<SpellMatch>> {
        let found = self
            .matcher
            .push_key(index, self.generator.catalog(), &self.inventory)?;
        if let Some(note) = self.matcher.queue_snapshot().last().copied() {
            self.note_played(note, found);
        }
        Ok(found)
    }

    fn play_color(&mut self, color: NoteColor) {
        let Some(note) = self.generator.catalog().note(color) else {
            let err = RuntimeError::MissingNote { color };
            warn!(error = %err, "swing note dropped");
            return;
        };
        let found = self.matcher.push_note(note, &self.inventory);
        self.note_played(note, found);
    }

    fn note_played(&mut self, note: Note, found: Option<SpellMatch>) {
        let queue: Vec<NoteColor> = self
            .matcher
            .queue_snapshot()
            .iter()
            .map(|n| n.color)
            .collect();
        debug!(color = %note.color, ?queue, "note played");
        self.publish(Event::Spell(SpellEvent::NotePlayed {
            color: note.color,
            queue,
        }));
        if let Some(found) = found {
            self.spell_ready(found);
        }
    }

    fn spell_ready(&mut self, found: SpellMatch) {
        let melody = self
            .inventory
            .get(found.inventory_index)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        debug!(%melody, offset = found.offset, len = found.len, "spell ready");
        self.publish(Event::Spell(SpellEvent::SpellReady {
            melody,
            indices: found.indices(),
        }));
    }

    pub fn has_spell_ready(&self) -> bool {
        self.matcher.has_spell_ready()
    }

    pub fn queue_snapshot(&self) -> &[Note] {
        self.matcher.queue_snapshot()
    }

    pub fn matched_indices(&self) -> MatchedIndices {
        self.matcher.matched_indices()
    }

    /// Where the player would cast from right now.
    pub fn cast_origin(&self) -> CastOrigin {
        let position = self
            .arena
            .player()
            .map(|p| p.position)
            .unwrap_or(self.config.player_spawn);
        CastOrigin {
            caster: CombatantId::PLAYER,
            position,
            forward: self.facing,
        }
    }

    /// Fires the matched spell from `origin`, consuming its notes.
    ///
    /// Returns the spawned resolver handles, or `None` when nothing was
    /// ready. A broken payload fires with no handles.
    pub fn fire_current_spell(&mut self, origin: CastOrigin) -> Option<Vec<EffectHandle>> {
        let fired = self
            .matcher
            .fire_current_spell(&self.inventory, &self.builder)?;

        let env = self.oracles.as_game_env();
        let handles = match self.effects.spawn_payload(&fired.payload, origin, &env) {
            Ok(handles) => handles,
            Err(err) => {
                warn!(error = %err, spell = %fired.payload.name, "spell fizzled");
                Vec::new()
            }
        };
        if fired.payload.broken {
            warn!(melody = %fired.melody.name, "melody too short, broken spell fired");
        }

        info!(
            melody = %fired.melody.name,
            spell = %fired.payload.name,
            form = %fired.payload.delivery,
            effect = %fired.payload.effect,
            power = fired.payload.power,
            resolvers = handles.len(),
            "spell fired"
        );
        self.publish(Event::Spell(SpellEvent::SpellFired {
            melody: fired.melody.name.clone(),
            form: fired.payload.delivery,
            effect: fired.payload.effect,
            consumed: fired.consumed.clone(),
            handles: handles.clone(),
        }));
        if let Some(chained) = fired.chained {
            self.spell_ready(chained);
        }
        Some(handles)
    }

    // ------------------------------------------------------------------
    // Loot
    // ------------------------------------------------------------------

    pub fn register_loot_source(&mut self, id: impl Into<String>, table: LootTable) {
        let id = id.into();
        debug!(source = %id, total_weight = table.total_weight(), "loot source registered");
        self.loot_sources.insert(id, table);
    }

    pub fn loot_source_ids(&self) -> impl Iterator<Item = &str> {
        self.loot_sources.keys().map(String::as_str)
    }

    /// Rolls the source's table, learns the melody and returns it as stored
    /// (with its current level). Unknown sources are logged and yield `None`.
    pub fn loot_from_source(&mut self, source_id: &str) -> Option<Melody> {
        match self.try_loot_from_source(source_id) {
            Ok(melody) => Some(melody),
            Err(err) => {
                warn!(source = source_id, error = %err, "loot failed");
                None
            }
        }
    }

    pub fn try_loot_from_source(&mut self, source_id: &str) -> Result<Melody> {
        let table = *self
            .loot_sources
            .get(source_id)
            .ok_or_else(|| RuntimeError::UnknownLootSource(source_id.to_string()))?;

        let seed = self.next_loot_seed(source_id);
        let env = self.oracles.as_game_env();
        let mut generated = self.generator.generate_from_table(&env, &table, seed)?;

        let luck = self.loot_luck();
        let lucky = luck > 0.0
            && generated.melody.tier < GameConfig::MAX_TIER
            && env.rng()?.unit(seed.seed(LootSeed::LUCK_CONTEXT)) < luck;
        if lucky {
            let bumped = generated.melody.tier + 1;
            debug!(luck, tier = bumped, "loot luck bumped tier");
            generated = self.generator.generate(&env, bumped, seed)?;
        }
        if generated.fallback_rule {
            warn!(
                requested = generated.requested_tier,
                "no tier rule, fell back to tier 1"
            );
        }
        if !generated.within_budget {
            debug!(
                attempts = generated.attempts,
                cost = generated.melody.total_cost(),
                "no draw fit the tier budget, keeping last"
            );
        }

        Ok(self.learn(source_id, generated.melody, lucky, generated.within_budget))
    }

    /// Generates a melody of an explicit tier (debug loot).
    pub fn loot_tier(&mut self, tier: u8) -> Option<Melody> {
        const DEBUG_SOURCE: &str = "debug";
        let seed = self.next_loot_seed(DEBUG_SOURCE);
        let env = self.oracles.as_game_env();
        match self.generator.generate(&env, tier, seed) {
            Ok(generated) => {
                Some(self.learn(DEBUG_SOURCE, generated.melody, false, generated.within_budget))
            }
            Err(err) => {
                warn!(tier, error = %err, "debug loot failed");
                None
            }
        }
    }

    fn next_loot_seed(&mut self, source_id: &str) -> LootSeed {
        let nonce = self.loot_nonce;
        self.loot_nonce += 1;
        LootSeed::new(
            self.config.game_config.game_seed,
            nonce,
            source_key(source_id),
        )
    }

    fn learn(&mut self, source: &str, melody: Melody, lucky: bool, within_budget: bool) -> Melody {
        let outcome = self.inventory.learn(melody.clone());
        let stored = self
            .inventory
            .get(outcome.index())
            .cloned()
            .unwrap_or(melody);
        info!(
            source,
            melody = %stored.name,
            sequence = %stored.signature(),
            tier = stored.tier,
            level = stored.level,
            ?outcome,
            "melody looted"
        );
        self.publish(Event::Loot(LootEvent::MelodyLooted {
            source: source.to_string(),
            melody: stored.name.clone(),
            tier: stored.tier,
            level: stored.level,
            outcome,
            lucky,
            within_budget,
        }));
        // A new melody may complete what is already queued.
        if let Some(found) = self.matcher.check_for_combinations(&self.inventory) {
            self.spell_ready(found);
        }
        stored
    }

    /// Highest loot luck among the player's active buffs.
    pub fn loot_luck(&self) -> f32 {
        self.effects.loot_luck(CombatantId::PLAYER)
    }

    // ------------------------------------------------------------------
    // Combatants
    // ------------------------------------------------------------------

    /// Spawns a hostile or protected target. The player kind is refused.
    pub fn spawn_combatant(&mut self, kind: TargetKind, position: Vec3) -> Option<CombatantId> {
        let rules = self.oracles.tables().target_rules();
        let target = match kind {
            TargetKind::Hostile => CombatTarget::hostile(rules),
            TargetKind::Protected => CombatTarget::protected(rules),
            TargetKind::Player => {
                warn!("refusing to spawn a second player");
                return None;
            }
        };
        let id = self.arena.spawn_target(position, target);
        debug!(%id, ?kind, ?position, "combatant spawned");
        Some(id)
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.arena.add_wall(wall);
    }

    /// Resolves an enemy attack against the player's guard.
    pub fn enemy_strike(&mut self, attacker: CombatantId, damage: f32) -> StrikeOutcome {
        let guard = self.controller.guard_contact();
        if let Some(GuardResult::PerfectParry { counter_damage }) = guard {
            let counter = self
                .arena
                .damageable_mut(attacker)
                .map(|target| apply_effect(target, SpellEffect::Damage, counter_damage, NO_SLOW));
            info!(%attacker, counter_damage, "perfect parry");
            self.publish(Event::Combat(CombatEvent::Parried {
                attacker,
                counter: counter.unwrap_or(EffectOutcome::Ignored),
            }));
            return StrikeOutcome {
                guard,
                player: EffectOutcome::Ignored,
                counter,
            };
        }

        let player = self
            .arena
            .damageable_mut(CombatantId::PLAYER)
            .map(|player| player.take_damage(damage))
            .unwrap_or(EffectOutcome::Ignored);
        match player {
            EffectOutcome::Damaged { killed: true, .. } => info!(%attacker, "player killed"),
            EffectOutcome::Guarded { exhausted: true, .. } => {
                info!(%attacker, "guard broken, player exhausted");
                self.publish(Event::Combat(CombatEvent::PlayerExhausted));
            }
            _ => debug!(%attacker, damage, ?player, "player struck"),
        }
        self.publish(Event::Combat(CombatEvent::PlayerHit {
            attacker,
            outcome: player,
        }));
        self.sync_guard();
        StrikeOutcome {
            guard,
            player,
            counter: None,
        }
    }

    pub fn ui(&self) -> UiSnapshot {
        let stats = self.arena.player_stats();
        UiSnapshot {
            health: stats.map_or(0.0, PlayerStats::health_fraction),
            shield: stats.map_or(0.0, PlayerStats::shield_fraction),
            stamina: stats.map_or(0.0, PlayerStats::stamina_fraction),
            exhausted: stats.is_some_and(PlayerStats::is_exhausted),
            queue: self.queue_snapshot().iter().map(|n| n.color).collect(),
            lit: self.matched_indices(),
            spell_ready: self.has_spell_ready(),
            targets: self
                .arena
                .iter()
                .filter_map(|c| {
                    let target = c.target()?;
                    Some(TargetGauge {
                        id: c.id,
                        kind: c.kind(),
                        health: target.health_fraction(),
                        shield: target.shield_fraction(),
                        slow: target.slow_fraction(),
                    })
                })
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    pub fn step(&mut self, dt: f32, input: &FrameInput) {
        self.clock += dt;
        if let Some(facing) = input.facing.and_then(Vec3::try_normalize) {
            self.facing = facing;
        }

        for &key in &input.notes {
            self.push_note(key);
        }

        for &control in &input.controls {
            let can_act = self
                .arena
                .player_stats()
                .is_some_and(PlayerStats::can_act);
            let ready = self.matcher.has_spell_ready();
            let events = self.controller.handle(control, can_act, ready);
            self.dispatch(events);
        }
        let events = self.controller.tick(dt);
        self.dispatch(events);

        self.resolve_swing();

        for event in self.effects.tick(dt, &mut self.arena) {
            self.log_effect(&event);
            self.publish(Event::Combat(CombatEvent::Effect(event)));
        }

        let speed = self.config.move_speed;
        if let Some(player) = self.arena.get_mut(CombatantId::PLAYER) {
            player.velocity = input.movement * speed;
        }
        for (id, tick) in self.arena.tick(dt) {
            if tick.respawned {
                debug!(%id, "target respawned");
                self.publish(Event::Combat(CombatEvent::Respawned { target: id }));
            }
            if tick.thawed {
                debug!(%id, "target thawed");
                self.publish(Event::Combat(CombatEvent::Thawed { target: id }));
            }
            if let Some(report) = tick.report {
                info!(%id, dps = report.dps, hps = report.hps, "combat report");
                self.publish(Event::Combat(CombatEvent::Report { target: id, report }));
            }
            if tick.recovered {
                debug!("player recovered from exhaustion");
                self.publish(Event::Combat(CombatEvent::PlayerRecovered));
            }
        }
        self.sync_guard();
    }

    fn dispatch(&mut self, events: Vec<ControlEvent>) {
        for event in events {
            self.publish(Event::Control(event));
            match event {
                ControlEvent::NotePlayed { color } => self.play_color(color),
                ControlEvent::GuardRaised => self.set_guard(true),
                ControlEvent::GuardLowered => self.set_guard(false),
                ControlEvent::FireSpell { forced } => {
                    if forced {
                        debug!("no fire frame, casting on safety timeout");
                    }
                    let origin = self.cast_origin();
                    if self.fire_current_spell(origin).is_none() {
                        debug!("cast ended with no spell ready");
                    }
                }
                ControlEvent::Rejected { input } => debug!(%input, "input rejected"),
                ControlEvent::SwingStarted { .. }
                | ControlEvent::ChargeReady
                | ControlEvent::ChargeCancelled
                | ControlEvent::Repel
                | ControlEvent::CastStarted
                | ControlEvent::CastFinished => {}
            }
        }
    }

    fn set_guard(&mut self, raised: bool) {
        if let Some(stats) = self.arena.player_stats_mut() {
            stats.set_shielded(raised);
        }
    }

    /// Drops the controller's guard once the player can no longer hold it.
    fn sync_guard(&mut self) {
        let exhausted = self
            .arena
            .player_stats()
            .is_none_or(|stats| !stats.can_act());
        if exhausted && self.controller.is_guarding() {
            let events = self.controller.interrupt();
            self.dispatch(events);
        }
    }

    fn resolve_swing(&mut self) {
        let Some(swing) = self.controller.active_swing_mut() else {
            return;
        };
        let origin = self
            .arena
            .player()
            .map(|p| p.position)
            .unwrap_or(self.config.player_spawn);
        let kind = swing.kind;
        let hits = swing.strike(origin, &mut self.arena);
        for (target, outcome) in hits {
            debug!(%target, %kind, ?outcome, "melee hit");
            self.publish(Event::Combat(CombatEvent::MeleeHit {
                target,
                kind,
                outcome,
            }));
        }
    }

    fn log_effect(&self, event: &EffectEvent) {
        match event {
            EffectEvent::Applied {
                target,
                outcome: EffectOutcome::Damaged { killed: true, .. },
                ..
            } => info!(%target, "target killed"),
            EffectEvent::Applied {
                handle,
                target,
                effect,
                outcome,
            } => debug!(handle = handle.0, %target, %effect, ?outcome, "effect applied"),
            EffectEvent::Expired { handle, form } => {
                debug!(handle = handle.0, %form, "resolver expired")
            }
        }
    }

    fn publish(&mut self, event: Event) {
        self.bus.publish(event.clone());
        let capacity = self.config.event_buffer_size.max(1);
        while self.pending.len() >= capacity {
            if let Some(dropped) = self.pending.pop_front() {
                trace!(topic = ?dropped.topic(), "undrained event dropped");
            }
        }
        self.pending.push_back(event);
    }
}

const NO_SLOW: SlowSpec = SlowSpec::new(0.0, 0.0);

/// Stable 32-bit key of a loot source id (FNV-1a).
fn source_key(id: &str) -> u32 {
    id.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}
