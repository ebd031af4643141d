//! Session orchestration for the melody combat rules.
//!
//! This crate wires the deterministic core into a playable, frame-stepped
//! [`Session`]: oracle access, an in-memory arena implementing the core's
//! world traits, and a topic-based event bus. Consumers build a session,
//! call [`Session::step`] once per frame and either drain events or
//! subscribe to topics.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and builder
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] adapts loaded content to the core's oracle traits
//! - [`world`] owns combatants and obstacles
pub mod error;
pub mod events;
pub mod oracle;
pub mod session;
pub mod world;

pub use error::{Result, RuntimeError};
pub use events::{CombatEvent, Event, EventBus, LootEvent, SpellEvent, Topic};
pub use oracle::{OracleManager, TablesOracleImpl};
pub use session::{
    FrameInput, Session, SessionBuilder, SessionConfig, StrikeOutcome, TargetGauge, UiSnapshot,
};
pub use world::{Arena, Wall};
