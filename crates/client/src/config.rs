//! Simulation configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Settings for one headless simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub content_dir: PathBuf,
    /// Overrides the seed from `config.toml` when set.
    pub seed: Option<u64>,
    pub frames: u32,
    pub frame_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(Self::DEFAULT_CONTENT_DIR),
            seed: None,
            frames: 600,
            frame_dt: 1.0 / 60.0,
        }
    }
}

impl SimConfig {
    pub const DEFAULT_CONTENT_DIR: &'static str = "crates/client/content";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MELODY_CONTENT_DIR` - Data directory (default: `crates/client/content`)
    /// - `MELODY_SEED` - Game seed; `random` picks a fresh one (default: from content)
    /// - `MELODY_FRAMES` - Frames to simulate (default: 600)
    /// - `MELODY_FRAME_DT` - Seconds per frame (default: 1/60)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("MELODY_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }

        if let Some(seed) = read_env::<u64>("MELODY_SEED") {
            config.seed = Some(seed);
        } else if env::var("MELODY_SEED").is_ok_and(|v| v.trim().eq_ignore_ascii_case("random")) {
            config.seed = Some(rand::random());
        }

        if let Some(frames) = read_env::<u32>("MELODY_FRAMES") {
            config.frames = frames;
        }

        if let Some(dt) = read_env::<f32>("MELODY_FRAME_DT")
            && dt > 0.0
        {
            config.frame_dt = dt;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_ten_seconds() {
        let config = SimConfig::default();
        assert_eq!(config.frames, 600);
        assert!((config.frames as f32 * config.frame_dt - 10.0).abs() < 1e-3);
        assert!(config.seed.is_none());
    }
}
