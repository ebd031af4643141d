//! Scripted arena run: builds a session from loaded content and drives it
//! with a simple autoplayer, writing every event as a JSON line.
use std::io::Write;

use anyhow::{Context, Result};
use glam::Vec3;
use melody_content::GameContent;
use melody_core::{
    CombatantId, ControlInput, Damageable, GameConfig, LootTable, Melody, NoteCatalog, TargetKind,
};
use runtime::{Event, FrameInput, OracleManager, Session, UiSnapshot, Wall};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SimConfig;

/// Frames between two notes of a melody.
const NOTE_GAP: u32 = 6;
/// Frames between cast signals (start, fire frame, end).
const CAST_GAP: u32 = 3;
/// Frames the autoplayer idles after a cast.
const COOLDOWN: u32 = 30;

const STRIKE_EVERY: u32 = 120;
const STRIKE_DAMAGE: f32 = 12.0;
const LOOT_EVERY: u32 = 240;
/// Source registered when the content defines no loot tables.
const DEFAULT_LOOT_SOURCE: &str = "chest";

/// Builds a session from loaded content. `seed` overrides the content seed.
pub fn build_session(content: &GameContent, seed: Option<u64>) -> Result<Session> {
    let mut builder = Session::builder()
        .oracles(OracleManager::from_balance(content.tables))
        .game_seed(seed.unwrap_or(content.config.game_seed))
        .catalog(content.notes.clone())
        .tier_rules(content.tiers.clone())
        .loot_sources(content.loot_tables.clone())
        .inventory(content.melodies.clone())
        .wall(Wall::new(Vec3::new(0.0, 0.0, 14.0), Vec3::new(6.0, 2.0, 0.5)));
    if content.loot_tables.is_empty() {
        builder = builder.loot_source(DEFAULT_LOOT_SOURCE, LootTable::default());
    }
    builder.build().context("failed to build session")
}

/// One line of the event stream.
#[derive(Serialize)]
struct EventLine<'a> {
    t: f32,
    event: &'a Event,
}

/// Final line of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub frames: u32,
    pub clock: f32,
    pub events: usize,
    pub ui: UiSnapshot,
    pub inventory: Vec<Melody>,
}

/// Arena layout and autoplayer for one run.
pub struct Scenario {
    session: Session,
    player: Autoplayer,
    attacker: Option<CombatantId>,
    loot_source: String,
}

impl Scenario {
    pub fn new(mut session: Session) -> Self {
        let attacker = session.spawn_combatant(TargetKind::Hostile, Vec3::new(0.0, 0.0, 8.0));
        session.spawn_combatant(TargetKind::Hostile, Vec3::new(3.0, 0.0, 10.0));
        session.spawn_combatant(TargetKind::Protected, Vec3::new(-2.0, 0.0, 3.0));

        let loot_source = session
            .loot_source_ids()
            .min()
            .unwrap_or(DEFAULT_LOOT_SOURCE)
            .to_owned();

        Self {
            session,
            player: Autoplayer::new(),
            attacker,
            loot_source,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs `frames` frames of `dt` seconds, writing events to `out`.
    pub fn run<W: Write>(&mut self, frames: u32, dt: f32, out: &mut W) -> Result<RunSummary> {
        let mut written = 0;
        for frame in 1..=frames {
            let input = self.player.next_input(&self.session);
            self.session.step(dt, &input);

            if frame % STRIKE_EVERY == 0
                && let Some(attacker) = self.attacker
            {
                let outcome = self.session.enemy_strike(attacker, STRIKE_DAMAGE);
                debug!(frame, ?outcome, "enemy strike");
            }
            if frame % LOOT_EVERY == 0 {
                self.loot();
            }

            written += self.flush(out)?;
        }

        let summary = RunSummary {
            frames,
            clock: self.session.clock(),
            events: written,
            ui: self.session.ui(),
            inventory: self.session.inventory().melodies().to_vec(),
        };
        serde_json::to_writer(&mut *out, &summary).context("failed to write summary")?;
        writeln!(out)?;
        info!(
            frames,
            events = written,
            melodies = summary.inventory.len(),
            "simulation finished"
        );
        Ok(summary)
    }

    fn loot(&mut self) {
        if let Some(melody) = self.session.loot_from_source(&self.loot_source) {
            debug!(name = %melody.name, signature = %melody.signature(), "looted");
        }
    }

    fn flush<W: Write>(&mut self, out: &mut W) -> Result<usize> {
        let t = self.session.clock();
        let events = self.session.drain_events();
        for event in &events {
            serde_json::to_writer(&mut *out, &EventLine { t, event })
                .context("failed to write event")?;
            writeln!(out)?;
        }
        Ok(events.len())
    }
}

/// Builds the session for `content` and runs the scenario for the frame
/// budget in `config`.
pub fn run_with_config<W: Write>(
    content: &GameContent,
    config: &SimConfig,
    out: &mut W,
) -> Result<RunSummary> {
    let session = build_session(content, config.seed)?;
    info!(
        seed = session.config().game_config.game_seed,
        melodies = session.inventory().len(),
        frames = config.frames,
        "starting simulation"
    );
    Scenario::new(session).run(config.frames, config.frame_dt, out)
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle { wait: u32 },
    Playing { keys: Vec<usize>, next: usize, wait: u32 },
    Casting { frame: u32 },
}

/// Cycles through the spellbook: plays each melody's notes, then casts.
#[derive(Debug, Clone)]
struct Autoplayer {
    phase: Phase,
    cursor: usize,
}

impl Autoplayer {
    fn new() -> Self {
        Self {
            phase: Phase::Idle { wait: COOLDOWN },
            cursor: 0,
        }
    }

    fn next_input(&mut self, session: &Session) -> FrameInput {
        let mut input = FrameInput::idle();
        if let Some(facing) = nearest_hostile_direction(session) {
            input = input.facing(facing);
        }

        let next = match &mut self.phase {
            Phase::Idle { wait } if *wait > 0 => {
                *wait -= 1;
                None
            }
            Phase::Idle { .. } => next_melody(&mut self.cursor, session).map(|keys| Phase::Playing {
                keys,
                next: 0,
                wait: 0,
            }),
            Phase::Playing { wait, .. } if *wait > 0 => {
                *wait -= 1;
                None
            }
            Phase::Playing { keys, next, wait } => match keys.get(*next) {
                Some(&key) => {
                    input = input.with_note(key);
                    *next += 1;
                    *wait = NOTE_GAP;
                    None
                }
                None if session.has_spell_ready() => Some(Phase::Casting { frame: 0 }),
                None => Some(Phase::Idle { wait: COOLDOWN }),
            },
            Phase::Casting { frame } => {
                let step = *frame;
                *frame += 1;
                if step == 0 {
                    input = input.with_control(ControlInput::Cast);
                    None
                } else if step == CAST_GAP {
                    input = input.with_control(ControlInput::FireFrame);
                    None
                } else if step == CAST_GAP * 2 {
                    input = input.with_control(ControlInput::CastEnd);
                    Some(Phase::Idle { wait: COOLDOWN })
                } else if !session.controller().is_casting() {
                    // Cast was rejected or already recovered.
                    Some(Phase::Idle { wait: COOLDOWN })
                } else {
                    None
                }
            }
        };
        if let Some(phase) = next {
            self.phase = phase;
        }
        input
    }
}

/// Key sequence of the next playable melody, advancing `cursor`.
fn next_melody(cursor: &mut usize, session: &Session) -> Option<Vec<usize>> {
    let melodies = session.inventory().melodies();
    for _ in 0..melodies.len() {
        let melody = &melodies[*cursor % melodies.len()];
        *cursor = cursor.wrapping_add(1);
        if let Some(keys) = melody_keys(melody, session.catalog()) {
            return Some(keys);
        }
    }
    None
}

/// Maps a melody onto key indices; `None` when a color has no bound key.
fn melody_keys(melody: &Melody, catalog: &NoteCatalog) -> Option<Vec<usize>> {
    melody
        .colors()
        .map(|color| {
            (0..GameConfig::NOTE_KEYS)
                .find(|&key| catalog.note_for_key(key).is_some_and(|n| n.color == color))
        })
        .collect()
}

fn nearest_hostile_direction(session: &Session) -> Option<Vec3> {
    let origin = session.cast_origin().position;
    session
        .arena()
        .iter()
        .filter(|c| c.kind() == TargetKind::Hostile && c.is_alive())
        .map(|c| c.position - origin)
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
        .and_then(|offset| offset.try_normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use melody_core::NoteColor;

    #[test]
    fn melody_keys_follow_catalog_bindings() {
        use NoteColor::*;
        let melody = Melody::from_colors(1, &[Red, Green]);
        let catalog = NoteCatalog::default();
        assert_eq!(melody_keys(&melody, &catalog), Some(vec![2, 0]));

        let remapped = catalog.with_key(2, None).with_key(3, Some(Red));
        assert_eq!(melody_keys(&melody, &remapped), Some(vec![3, 0]));

        let unbound = NoteCatalog::default().with_key(0, None);
        assert_eq!(melody_keys(&melody, &unbound), None);
    }
}
