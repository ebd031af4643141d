//! Melody simulation binary.
//!
//! ```bash
//! MELODY_SEED=42 MELODY_FRAMES=1200 cargo run -p melody-client > events.jsonl
//! RUST_LOG=debug cargo run -p melody-client
//! ```
//!
//! Events go to stdout, logs to stderr.

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use melody_client::{SimConfig, run_with_config};
use melody_content::ContentFactory;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let config = SimConfig::from_env();
    tracing::info!(content_dir = %config.content_dir.display(), "loading content");
    let content = ContentFactory::load_dir(&config.content_dir)
        .with_context(|| format!("failed to load {}", config.content_dir.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run_with_config(&content, &config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
