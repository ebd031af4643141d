//! Player action controller.
//!
//! A small state machine over melee swings, heavy charge, guard and the
//! cast pipeline. Every melee input also plays its note; the session feeds
//! those notes to the matcher. Timed transitions are accumulated-time
//! fields advanced by [`PlayerController::tick`].
//!
//! The cast pipeline waits for the animation's fire frame but never
//! indefinitely: after `cast_safety_timeout` the spell fires anyway, and
//! the controller returns to normal `cast_recovery` seconds after firing.
mod melee;

pub use melee::{MeleeSwing, SwingKind};

use crate::env::ControllerRules;
use crate::note::NoteColor;

#[derive(Clone, Debug, PartialEq)]
pub enum ControllerState {
    Normal,
    Attacking(MeleeSwing),
    Charging { elapsed: f32, ready: bool },
    Guarding { elapsed: f32 },
    Casting { elapsed: f32, fired_at: Option<f32> },
}

/// Per-frame edge inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ControlInput {
    Light,
    Sweep,
    HeavyPress,
    HeavyRelease,
    GuardPress,
    GuardRelease,
    Cast,
    /// Animation reached the frame where the spell leaves the hand.
    FireFrame,
    /// Cast animation finished.
    CastEnd,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlEvent {
    NotePlayed { color: NoteColor },
    SwingStarted { kind: SwingKind },
    ChargeReady,
    ChargeCancelled,
    /// Guard released within the tap window.
    Repel,
    GuardRaised,
    GuardLowered,
    CastStarted,
    /// The session should fire the matched spell now.
    FireSpell { forced: bool },
    CastFinished,
    Rejected { input: ControlInput },
}

/// How a guarded hit resolves.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GuardResult {
    PerfectParry { counter_damage: f32 },
    Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerController {
    rules: ControllerRules,
    state: ControllerState,
}

impl PlayerController {
    pub fn new(rules: ControllerRules) -> Self {
        Self {
            rules,
            state: ControllerState::Normal,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_guarding(&self) -> bool {
        matches!(self.state, ControllerState::Guarding { .. })
    }

    pub fn is_casting(&self) -> bool {
        matches!(self.state, ControllerState::Casting { .. })
    }

    pub fn active_swing_mut(&mut self) -> Option<&mut MeleeSwing> {
        match &mut self.state {
            ControllerState::Attacking(swing) => Some(swing),
            _ => None,
        }
    }

    /// Applies one input. `can_act` is false while exhausted or dead.
    pub fn handle(
        &mut self,
        input: ControlInput,
        can_act: bool,
        spell_ready: bool,
    ) -> Vec<ControlEvent> {
        let idle = matches!(self.state, ControllerState::Normal) && can_act;
        let mut events = Vec::new();
        match input {
            ControlInput::Light | ControlInput::Sweep if idle => {
                let kind = if input == ControlInput::Light {
                    SwingKind::Light
                } else {
                    SwingKind::Sweep
                };
                self.state = ControllerState::Attacking(MeleeSwing::new(kind, &self.rules));
                events.push(ControlEvent::SwingStarted { kind });
                events.push(ControlEvent::NotePlayed { color: kind.note() });
            }
            ControlInput::HeavyPress if idle => {
                self.state = ControllerState::Charging {
                    elapsed: 0.0,
                    ready: false,
                };
            }
            ControlInput::HeavyRelease => {
                if let ControllerState::Charging { elapsed, .. } = self.state {
                    if elapsed >= self.rules.heavy_min_charge {
                        let swing = MeleeSwing::new(SwingKind::Heavy, &self.rules);
                        self.state = ControllerState::Attacking(swing);
                        events.push(ControlEvent::SwingStarted {
                            kind: SwingKind::Heavy,
                        });
                        events.push(ControlEvent::NotePlayed {
                            color: SwingKind::Heavy.note(),
                        });
                    } else {
                        self.state = ControllerState::Normal;
                        events.push(ControlEvent::ChargeCancelled);
                    }
                }
            }
            ControlInput::GuardPress if idle => {
                self.state = ControllerState::Guarding { elapsed: 0.0 };
                events.push(ControlEvent::GuardRaised);
            }
            ControlInput::GuardRelease => {
                if let ControllerState::Guarding { elapsed } = self.state {
                    if elapsed <= self.rules.guard_tap_window {
                        events.push(ControlEvent::Repel);
                    }
                    self.state = ControllerState::Normal;
                    events.push(ControlEvent::GuardLowered);
                    events.push(ControlEvent::NotePlayed {
                        color: NoteColor::Yellow,
                    });
                }
            }
            ControlInput::Cast if idle && spell_ready => {
                self.state = ControllerState::Casting {
                    elapsed: 0.0,
                    fired_at: None,
                };
                events.push(ControlEvent::CastStarted);
            }
            ControlInput::FireFrame => {
                if let ControllerState::Casting { elapsed, fired_at } = &mut self.state
                    && fired_at.is_none()
                {
                    *fired_at = Some(*elapsed);
                    events.push(ControlEvent::FireSpell { forced: false });
                }
            }
            ControlInput::CastEnd => {
                if let ControllerState::Casting { fired_at, .. } = self.state {
                    if fired_at.is_none() {
                        events.push(ControlEvent::FireSpell { forced: true });
                    }
                    self.state = ControllerState::Normal;
                    events.push(ControlEvent::CastFinished);
                }
            }
            ControlInput::Light
            | ControlInput::Sweep
            | ControlInput::HeavyPress
            | ControlInput::GuardPress
            | ControlInput::Cast => events.push(ControlEvent::Rejected { input }),
        }
        events
    }

    /// Advances swing, charge, guard and cast timers.
    pub fn tick(&mut self, dt: f32) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        match &mut self.state {
            ControllerState::Normal => {}
            ControllerState::Attacking(swing) => {
                swing.elapsed += dt;
                if swing.is_finished() {
                    self.state = ControllerState::Normal;
                }
            }
            ControllerState::Charging { elapsed, ready } => {
                *elapsed += dt;
                if !*ready && *elapsed >= self.rules.heavy_min_charge {
                    *ready = true;
                    events.push(ControlEvent::ChargeReady);
                }
            }
            ControllerState::Guarding { elapsed } => *elapsed += dt,
            ControllerState::Casting { elapsed, fired_at } => {
                *elapsed += dt;
                if fired_at.is_none() && *elapsed >= self.rules.cast_safety_timeout {
                    *fired_at = Some(*elapsed);
                    events.push(ControlEvent::FireSpell { forced: true });
                }
                if let Some(at) = *fired_at
                    && *elapsed - at >= self.rules.cast_recovery
                {
                    self.state = ControllerState::Normal;
                    events.push(ControlEvent::CastFinished);
                }
            }
        }
        events
    }

    /// Drops guard or charge when the player can no longer act.
    pub fn interrupt(&mut self) -> Vec<ControlEvent> {
        let event = match self.state {
            ControllerState::Guarding { .. } => ControlEvent::GuardLowered,
            ControllerState::Charging { .. } => ControlEvent::ChargeCancelled,
            _ => return Vec::new(),
        };
        self.state = ControllerState::Normal;
        vec![event]
    }

    /// Classifies an incoming hit against the current guard.
    pub fn guard_contact(&self) -> Option<GuardResult> {
        match self.state {
            ControllerState::Guarding { elapsed } if elapsed <= self.rules.parry_window => {
                Some(GuardResult::PerfectParry {
                    counter_damage: self.rules.counter_damage,
                })
            }
            ControllerState::Guarding { .. } => Some(GuardResult::Block),
            _ => None,
        }
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(ControllerRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlayerController {
        PlayerController::default()
    }

    #[test]
    fn light_swing_plays_green_and_recovers() {
        let mut c = controller();
        let events = c.handle(ControlInput::Light, true, false);
        assert!(events.contains(&ControlEvent::NotePlayed {
            color: NoteColor::Green
        }));
        assert!(c.active_swing_mut().is_some());

        assert!(c.handle(ControlInput::Sweep, true, false).contains(&ControlEvent::Rejected {
            input: ControlInput::Sweep
        }));
        c.tick(0.25);
        assert_eq!(c.state(), &ControllerState::Normal);
    }

    #[test]
    fn heavy_needs_full_charge() {
        let mut c = controller();
        c.handle(ControlInput::HeavyPress, true, false);
        c.tick(0.3);
        assert_eq!(
            c.handle(ControlInput::HeavyRelease, true, false),
            vec![ControlEvent::ChargeCancelled]
        );

        c.handle(ControlInput::HeavyPress, true, false);
        assert_eq!(c.tick(0.6), vec![ControlEvent::ChargeReady]);
        let events = c.handle(ControlInput::HeavyRelease, true, false);
        assert!(events.contains(&ControlEvent::NotePlayed {
            color: NoteColor::Red
        }));
        assert!(matches!(
            c.state(),
            ControllerState::Attacking(swing) if swing.kind == SwingKind::Heavy
        ));
    }

    #[test]
    fn guard_tap_repels_and_plays_yellow() {
        let mut c = controller();
        c.handle(ControlInput::GuardPress, true, false);
        c.tick(0.1);
        let events = c.handle(ControlInput::GuardRelease, true, false);
        assert_eq!(
            events,
            vec![
                ControlEvent::Repel,
                ControlEvent::GuardLowered,
                ControlEvent::NotePlayed {
                    color: NoteColor::Yellow
                }
            ]
        );
    }

    #[test]
    fn parry_window_then_block() {
        let mut c = controller();
        assert_eq!(c.guard_contact(), None);
        c.handle(ControlInput::GuardPress, true, false);
        c.tick(0.1);
        assert_eq!(
            c.guard_contact(),
            Some(GuardResult::PerfectParry {
                counter_damage: 80.0
            })
        );
        c.tick(0.2);
        assert_eq!(c.guard_contact(), Some(GuardResult::Block));
    }

    #[test]
    fn exhausted_player_cannot_start_actions() {
        let mut c = controller();
        assert_eq!(
            c.handle(ControlInput::GuardPress, false, false),
            vec![ControlEvent::Rejected {
                input: ControlInput::GuardPress
            }]
        );
        assert_eq!(c.state(), &ControllerState::Normal);
    }

    #[test]
    fn cast_requires_ready_spell() {
        let mut c = controller();
        assert_eq!(
            c.handle(ControlInput::Cast, true, false),
            vec![ControlEvent::Rejected {
                input: ControlInput::Cast
            }]
        );
        assert_eq!(
            c.handle(ControlInput::Cast, true, true),
            vec![ControlEvent::CastStarted]
        );
    }

    #[test]
    fn cast_fires_on_signal() {
        let mut c = controller();
        c.handle(ControlInput::Cast, true, true);
        c.tick(0.1);
        assert_eq!(
            c.handle(ControlInput::FireFrame, true, true),
            vec![ControlEvent::FireSpell { forced: false }]
        );
        assert!(c.handle(ControlInput::FireFrame, true, true).is_empty());
        assert_eq!(
            c.handle(ControlInput::CastEnd, true, true),
            vec![ControlEvent::CastFinished]
        );
        assert_eq!(c.state(), &ControllerState::Normal);
    }

    #[test]
    fn cast_safety_fires_without_signal() {
        let mut c = controller();
        c.handle(ControlInput::Cast, true, true);
        assert!(c.tick(0.3).is_empty());
        assert_eq!(c.tick(0.15), vec![ControlEvent::FireSpell { forced: true }]);
        assert!(c.is_casting());
        assert!(c.tick(0.1).is_empty());
        assert_eq!(c.tick(0.15), vec![ControlEvent::CastFinished]);
        assert_eq!(c.state(), &ControllerState::Normal);
    }

    #[test]
    fn interrupt_drops_guard() {
        let mut c = controller();
        c.handle(ControlInput::GuardPress, true, false);
        assert_eq!(c.interrupt(), vec![ControlEvent::GuardLowered]);
        assert!(!c.is_guarding());
        assert!(c.interrupt().is_empty());
    }
}
