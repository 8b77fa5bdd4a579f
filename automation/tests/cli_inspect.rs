//! CLI tests for `dungeon-automation inspect` and `init`.
//!
//! Spawns the binary against snapshot files and verifies exit codes and the
//! reported catchable set / progress label.

use std::process::Command;

use dungeon_automation::exit_codes;
use dungeon_automation::io::config::{AutomationConfig, load_config};
use dungeon_automation::test_support::SnapshotDir;

const TOWN_SNAPSHOT: &str = r#"{
    "game_state": "town",
    "town": { "name": "Shiny Cavern", "dungeon": "Shiny Cavern" },
    "dungeons": {
        "Shiny Cavern": {
            "normal_encounters": [
                { "kind": "pokemon", "name": "CaughtMon" },
                { "kind": "pokemon", "name": "MissingMon" },
                { "kind": "pokemon", "name": "TrickyMon", "mimic": true }
            ]
        }
    },
    "party": { "CaughtMon": { "shiny": true } }
}"#;

fn inspect_json(snapshot: &str) -> (Option<i32>, serde_json::Value) {
    let dir = SnapshotDir::new().expect("snapshot dir");
    let path = dir.write("host.json", snapshot).expect("write snapshot");
    let output = Command::new(env!("CARGO_BIN_EXE_dungeon-automation"))
        .arg("inspect")
        .arg("--snapshot")
        .arg(&path)
        .arg("--json")
        .output()
        .expect("dungeon-automation inspect");
    let report = serde_json::from_slice(&output.stdout).expect("report json");
    (output.status.code(), report)
}

#[test]
fn inspect_reports_catchable_set_and_progress() {
    let (code, report) = inspect_json(TOWN_SNAPSHOT);

    assert_eq!(code, Some(exit_codes::OK));
    assert_eq!(report["dungeon"], "Shiny Cavern");
    assert_eq!(
        report["catchable"],
        serde_json::json!(["CaughtMon", "MissingMon"])
    );
    assert_eq!(report["progress"], "1/2");
    assert_eq!(report["shiny_completed"], false);
}

#[test]
fn inspect_without_dungeon_exits_with_no_dungeon_code() {
    let (code, report) = inspect_json(r#"{ "town": { "name": "Pallet Town" } }"#);

    assert_eq!(code, Some(exit_codes::NO_DUNGEON));
    assert!(report["dungeon"].is_null());
    assert_eq!(report["catchable"], serde_json::json!([]));
    assert_eq!(report["shiny_completed"], false);
}

#[test]
fn inspect_shiny_completed_run_exits_with_complete_code() {
    let snapshot = r#"{
        "game_state": "dungeon",
        "run": { "dungeon": "Helper Cavern" },
        "dungeons": {
            "Helper Cavern": {
                "available": ["Zubat", { "pokemonName": "BossMon" }, { "pokemon": { "name": "ShadowMon" } }, null, "Zubat"]
            }
        },
        "party": {
            "Zubat": { "shiny": true },
            "BossMon": { "shiny": true },
            "ShadowMon": { "shiny": true }
        }
    }"#;
    let (code, report) = inspect_json(snapshot);

    assert_eq!(code, Some(exit_codes::SHINY_COMPLETE));
    assert_eq!(report["run_active"], true);
    assert_eq!(
        report["catchable"],
        serde_json::json!(["Zubat", "BossMon", "ShadowMon"])
    );
    assert!(report["progress"].is_null());
}

#[test]
fn inspect_invalid_snapshot_exits_invalid() {
    let dir = SnapshotDir::new().expect("snapshot dir");
    let path = dir.write("host.json", "not json").expect("write snapshot");
    let status = Command::new(env!("CARGO_BIN_EXE_dungeon-automation"))
        .arg("inspect")
        .arg("--snapshot")
        .arg(&path)
        .status()
        .expect("dungeon-automation inspect");

    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn init_writes_default_config_once() {
    let dir = SnapshotDir::new().expect("temp dir");
    let config = dir.path().join("automation.toml");

    let status = Command::new(env!("CARGO_BIN_EXE_dungeon-automation"))
        .arg("init")
        .arg("--config")
        .arg(&config)
        .status()
        .expect("dungeon-automation init");
    assert_eq!(status.code(), Some(exit_codes::OK));
    assert_eq!(
        load_config(&config).expect("load"),
        AutomationConfig::default()
    );

    let status = Command::new(env!("CARGO_BIN_EXE_dungeon-automation"))
        .arg("init")
        .arg("--config")
        .arg(&config)
        .status()
        .expect("dungeon-automation init");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}
