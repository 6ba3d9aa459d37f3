//! Loader tests against files on disk.

use std::io::Write;
use std::path::PathBuf;

use tactics_content::{ConfigLoader, ScenarioLoader};
use tactics_core::{CombatEventKind, ObjectiveAction, TacticsConfig};

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn partial_config_keeps_defaults() {
    let file = write_temp(
        r#"
seed = 99

[squad]
flank_distance = 20.0
objective_sharing = false

[events]
capacity = 0
"#,
        ".toml",
    );

    let config = ConfigLoader::load(file.path()).expect("load config");
    let defaults = TacticsConfig::default();

    assert_eq!(config.seed, 99);
    assert_eq!(config.squad.flank_distance, 20.0);
    assert!(!config.squad.objective_sharing);
    assert_eq!(config.squad.guard_distance, defaults.squad.guard_distance);
    assert_eq!(config.formation, defaults.formation);

    // Zero capacity is loaded as written and clamped by the sanitizer.
    assert_eq!(config.events.capacity, 0);
    let (sanitized, adjustments) = config.sanitized();
    assert_eq!(sanitized.events.capacity, 256);
    assert_eq!(adjustments.len(), 1);
}

#[test]
fn config_round_trips_through_toml() {
    let mut config = TacticsConfig::with_seed(1234);
    config.squad.trusted_follower_count = 4;
    config.events.weights.airdrop = 0.5;

    let text = ConfigLoader::to_toml(&config).expect("serialize");
    let parsed = ConfigLoader::parse(&text).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn bundled_config_is_valid() {
    let config = ConfigLoader::load(&data_dir().join("config.toml")).expect("load bundled config");
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn malformed_config_reports_the_file() {
    let file = write_temp("squad = 3", ".toml");
    let error = ConfigLoader::load(file.path()).expect_err("wrong type must fail");
    let message = error.to_string();
    assert!(message.contains("Failed to parse config TOML"), "{message}");
    assert!(message.contains(&file.path().display().to_string()), "{message}");
}

#[test]
fn missing_file_is_an_error() {
    let result = ConfigLoader::load(&data_dir().join("does-not-exist.toml"));
    assert!(result.is_err());
}

#[test]
fn bundled_scenario_loads() {
    let scenario = ScenarioLoader::load(&data_dir().join("scenarios/ambush.ron"))
        .expect("load bundled scenario");

    assert_eq!(scenario.name, "ambush");
    assert_eq!(scenario.agents.len(), 5);
    assert_eq!(scenario.squads[0].followers.len(), 4);
    assert_eq!(scenario.objectives[0].action, ObjectiveAction::Ambush);
    assert_eq!(scenario.events[2].kind, CombatEventKind::Explosion);
    assert_eq!(scenario.tick_count(), 400);
}

#[test]
fn scenario_events_are_sorted_by_time() {
    let file = write_temp(
        r#"(
    name: "unsorted",
    duration: 5.0,
    agents: [(name: "a", position: (x: 0.0, y: 0.0, z: 0.0))],
    events: [
        (at: 3.0, kind: gunshot, position: (x: 1.0, y: 0.0, z: 0.0)),
        (at: 1.0, kind: explosion, position: (x: 2.0, y: 0.0, z: 0.0), boss: true),
    ],
)"#,
        ".ron",
    );

    let scenario = ScenarioLoader::load(file.path()).expect("load scenario");
    assert_eq!(scenario.tick, 0.1);
    let times: Vec<f32> = scenario.events.iter().map(|event| event.at).collect();
    assert_eq!(times, vec![1.0, 3.0]);

    let event = scenario.events[0].to_event();
    assert!(event.boss);
    assert!(event.active);
    assert_eq!(event.time, 1.0);
}

#[test]
fn scenario_rejects_unknown_agents() {
    let file = write_temp(
        r#"(
    name: "broken",
    duration: 5.0,
    agents: [(name: "a", position: (x: 0.0, y: 0.0, z: 0.0))],
    squads: [(leader: "a", followers: ["ghost"])],
)"#,
        ".ron",
    );

    let error = ScenarioLoader::load(file.path()).expect_err("unknown follower must fail");
    assert!(error.to_string().contains("ghost"), "{error}");
}

#[test]
fn scenario_rejects_double_membership() {
    let file = write_temp(
        r#"(
    name: "double",
    duration: 5.0,
    agents: [
        (name: "a", position: (x: 0.0, y: 0.0, z: 0.0)),
        (name: "b", position: (x: 1.0, y: 0.0, z: 0.0)),
        (name: "c", position: (x: 2.0, y: 0.0, z: 0.0)),
    ],
    squads: [
        (leader: "a", followers: ["c"]),
        (leader: "b", followers: ["c"]),
    ],
)"#,
        ".ron",
    );

    let error = ScenarioLoader::load(file.path()).expect_err("double membership must fail");
    assert!(error.to_string().contains("more than one squad"), "{error}");
}
