/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Base seed mixed into every loot roll. Same seed + same inputs replays
    /// the same melodies.
    pub game_seed: u64,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Capacity of the note input FIFO.
    pub const MAX_QUEUE_NOTES: usize = 4;
    /// Longest melody the generator or inventory will hold.
    pub const MAX_MELODY_NOTES: usize = 4;
    /// Number of note keys exposed to input collaborators (indices 0..=3).
    pub const NOTE_KEYS: usize = 4;
    /// Rejection-sampling budget for loot generation.
    pub const MAX_LOOT_ATTEMPTS: u32 = 100;
    /// Highest loot tier (legendary).
    pub const MAX_TIER: u8 = 4;
    /// Tick interval used when a payload has no positive tick rate.
    pub const IDLE_TICK_INTERVAL: f32 = 99.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GAME_SEED: u64 = 0x5eed_1e10_d1e5;

    pub fn new() -> Self {
        Self {
            game_seed: Self::DEFAULT_GAME_SEED,
        }
    }

    pub fn with_game_seed(game_seed: u64) -> Self {
        Self { game_seed }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
