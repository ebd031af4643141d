//! Tables oracle backed by loaded balance content.

use melody_core::{
    AreaSettings, BalanceTables, BeamSettings, BuffSettings, ControllerRules, PlayerRules,
    ProgressionRules, ProjectileSettings, TablesOracle, TargetRules,
};

/// TablesOracle implementation over a [`BalanceTables`] snapshot.
#[derive(Debug, Clone, Default)]
pub struct TablesOracleImpl {
    tables: BalanceTables,
}

impl TablesOracleImpl {
    pub fn new(tables: BalanceTables) -> Self {
        Self { tables }
    }

    /// Create with the built-in defaults.
    pub fn test_tables() -> Self {
        Self::new(BalanceTables::default())
    }

    pub fn balance(&self) -> &BalanceTables {
        &self.tables
    }
}

impl TablesOracle for TablesOracleImpl {
    fn projectile(&self) -> ProjectileSettings {
        self.tables.projectile
    }

    fn area(&self) -> AreaSettings {
        self.tables.area
    }

    fn beam(&self) -> BeamSettings {
        self.tables.beam
    }

    fn buff(&self) -> BuffSettings {
        self.tables.buff
    }

    fn progression(&self) -> ProgressionRules {
        self.tables.progression
    }

    fn target_rules(&self) -> TargetRules {
        self.tables.target
    }

    fn player_rules(&self) -> PlayerRules {
        self.tables.player
    }

    fn controller_rules(&self) -> ControllerRules {
        self.tables.controller
    }
}
