use std::path::PathBuf;

use melody_client::{SimConfig, run_with_config};
use melody_content::ContentFactory;

fn sample_config(frames: u32) -> SimConfig {
    SimConfig {
        content_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content"),
        seed: Some(42),
        frames,
        frame_dt: 1.0 / 60.0,
    }
}

fn simulate(config: &SimConfig) -> (Vec<u8>, melody_client::RunSummary) {
    let content = ContentFactory::load_dir(&config.content_dir).expect("sample content loads");
    let mut out = Vec::new();
    let summary = run_with_config(&content, config, &mut out).expect("simulation runs");
    (out, summary)
}

#[test]
fn sample_content_loads() {
    let content = ContentFactory::load_dir(sample_config(0).content_dir).expect("content");
    assert_eq!(content.config.game_seed, 1337);
    assert_eq!(content.melodies.len(), 5);
    assert!(content.loot_tables.contains_key("chest"));
}

#[test]
fn every_line_is_json_and_spells_fire() {
    let (out, summary) = simulate(&sample_config(300));
    let text = String::from_utf8(out).expect("utf8 output");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), summary.events + 1);

    for line in &lines {
        serde_json::from_str::<serde_json::Value>(line).expect("valid json line");
    }
    assert!(lines.iter().any(|l| l.contains("SpellFired")));
    assert!(lines.iter().any(|l| l.contains("MelodyLooted")));

    let last: serde_json::Value = serde_json::from_str(lines[lines.len() - 1]).expect("summary");
    assert_eq!(last["frames"], 300);
    assert!(summary.inventory.len() >= 5);
}

#[test]
fn same_seed_replays_identically() {
    let config = sample_config(480);
    let (first, _) = simulate(&config);
    let (second, _) = simulate(&config);
    assert_eq!(first, second);
}
