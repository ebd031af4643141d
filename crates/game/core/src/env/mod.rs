//! Traits describing the world outside the rules.
//!
//! Oracles expose balance tables and randomness; the spatial traits expose
//! the host's scene. The [`Env`] aggregate bundles the oracles so rule code
//! reaches them without hard coupling to concrete implementations.
mod error;
mod rng;
mod spatial;
mod tables;

pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use spatial::{CombatWorld, Contact, Region, SpatialQuery, TargetStore};
pub use tables::{
    AreaSettings, BalanceTables, BeamSettings, BuffSettings, ControllerRules, PlayerRules,
    ProgressionRules, ProjectileSettings, SlowSpec, SwingSpec, TablesOracle, TargetRules,
};

/// Aggregates read-only oracles required by the loot generator and the
/// effect arena.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, T, R>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    tables: Option<&'a T>,
    rng: Option<&'a R>,
}

pub type GameEnv<'a> = Env<'a, dyn TablesOracle + 'a, dyn RngOracle + 'a>;

impl<'a, T, R> Env<'a, T, R>
where
    T: TablesOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(tables: Option<&'a T>, rng: Option<&'a R>) -> Self {
        Self { tables, rng }
    }

    pub fn with_all(tables: &'a T, rng: &'a R) -> Self {
        Self::new(Some(tables), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            tables: None,
            rng: None,
        }
    }

    /// Returns the TablesOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TablesNotAvailable` if no tables oracle was provided.
    pub fn tables(&self) -> Result<&'a T, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, T, R> Env<'a, T, R>
where
    T: TablesOracle + 'a,
    R: RngOracle + 'a,
{
    /// Erases the concrete oracle types.
    pub fn into_game_env(self) -> GameEnv<'a> {
        let tables: Option<&'a dyn TablesOracle> = self.tables.map(|tables| tables as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(tables, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_oracles_are_reported() {
        let env: GameEnv<'_> = Env::empty();
        assert_eq!(env.tables().err(), Some(OracleError::TablesNotAvailable));
        assert_eq!(env.rng().err(), Some(OracleError::RngNotAvailable));

        let tables = BalanceTables::default();
        let env = Env::with_all(&tables, &PcgRng).into_game_env();
        assert!(env.tables().is_ok());
        assert_eq!(env.tables().map(|t| t.buff().duration).ok(), Some(10.0));
    }
}
