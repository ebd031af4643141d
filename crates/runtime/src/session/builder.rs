use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use melody_core::{
    EffectArena, GameConfig, Inventory, LootGenerator, LootTable, NoteCatalog, PlayerController,
    SpellBuilder, SpellMatcher, TablesOracle, TierRules,
};
use tracing::debug;

use super::Session;
use crate::error::{Result, RuntimeError};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::world::{Arena, Wall};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub game_config: GameConfig,
    /// Capacity of each bus topic and of the undrained event queue.
    pub event_buffer_size: usize,
    /// Player movement speed before slow and exhaustion factors.
    pub move_speed: f32,
    pub player_spawn: Vec3,
    pub facing: Vec3,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 256,
            move_speed: 5.0,
            player_spawn: Vec3::ZERO,
            facing: Vec3::Z,
        }
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    config: SessionConfig,
    oracles: Option<OracleManager>,
    catalog: NoteCatalog,
    tier_rules: TierRules,
    loot_sources: HashMap<String, LootTable>,
    inventory: Inventory,
    walls: Vec<Wall>,
    bus: Option<EventBus>,
}

impl SessionBuilder {
    pub(super) fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            oracles: None,
            catalog: NoteCatalog::default(),
            tier_rules: TierRules::default(),
            loot_sources: HashMap::new(),
            inventory: Inventory::new(),
            walls: Vec::new(),
            bus: None,
        }
    }

    /// Override session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn game_seed(mut self, seed: u64) -> Self {
        self.config.game_config.game_seed = seed;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    pub fn catalog(mut self, catalog: NoteCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn tier_rules(mut self, rules: TierRules) -> Self {
        self.tier_rules = rules;
        self
    }

    pub fn loot_source(mut self, id: impl Into<String>, table: LootTable) -> Self {
        self.loot_sources.insert(id.into(), table);
        self
    }

    pub fn loot_sources(mut self, sources: impl IntoIterator<Item = (String, LootTable)>) -> Self {
        self.loot_sources.extend(sources);
        self
    }

    /// Starting inventory (defaults to empty).
    pub fn inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn wall(mut self, wall: Wall) -> Self {
        self.walls.push(wall);
        self
    }

    /// Share an existing bus instead of creating one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn build(self) -> Result<Session> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let tables = oracles.tables();
        let builder = SpellBuilder::from_oracle(tables);
        let controller = PlayerController::new(tables.controller_rules());

        let mut arena = Arena::new(tables.player_rules(), self.config.player_spawn);
        for wall in self.walls {
            arena.add_wall(wall);
        }

        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let facing = self.config.facing.try_normalize().unwrap_or(Vec3::Z);

        debug!(
            seed = self.config.game_config.game_seed,
            melodies = self.inventory.len(),
            loot_sources = self.loot_sources.len(),
            "session built"
        );

        Ok(Session {
            config: self.config,
            generator: LootGenerator::new(self.catalog, self.tier_rules),
            builder,
            matcher: SpellMatcher::new(),
            inventory: self.inventory,
            controller,
            arena,
            effects: EffectArena::new(),
            loot_sources: self.loot_sources,
            loot_nonce: 0,
            bus,
            pending: VecDeque::new(),
            facing,
            clock: 0.0,
            oracles,
        })
    }
}
