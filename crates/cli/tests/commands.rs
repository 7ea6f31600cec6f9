use assert_cmd::Command;
use predicates::str::contains;
use pretty_assertions::{assert_eq, assert_ne};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const HEADER: &str = "id,full_name,team,position,height,weight,age,average_points,average_assists,average_rebounds,average_steals,average_blocks,awards_count";

fn roster_dir() -> TempDir {
    let temp = tempdir().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    let rows = [
        "1,Ann Lee,Lakers,Guard,190,185,27,24.5,7,5,1.4,0.3,2",
        "2,Bo Diaz,Lakers,Forward,203,225,31,12,2,9,0.8,1.1,0",
        "3,Cy Moss,Celtics,Center,213,260,24,15,1,11,0.5,2.4,1",
        "4,Di Park,Heat,G-F,198,205,29,18,4,6,1.1,0.4,0",
        "5,Ed Cole,Suns,F,206,230,22,9,1,7,0.6,0.9,0",
        "6,Fay Ng,Suns,C,211,250,33,11,2,10,0.4,1.8,3",
        "7,Gus Orr,Heat,G,185,180,25,21,8,4,1.6,0.2,0",
        "8,Hal Ivy,Celtics,F-C,208,240,28,14,3,8,0.9,1.3,0",
    ];
    fs::write(
        data.join("merged_player_data.csv"),
        format!("{HEADER}\n{}\n", rows.join("\n")),
    )
    .unwrap();
    temp
}

#[allow(deprecated)]
fn legend(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("legend").expect("binary");
    cmd.current_dir(workdir).arg("--quiet");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn players_lists_roster_with_conference() {
    let dir = roster_dir();
    let players = stdout_json(legend(dir.path()).arg("players"));
    let players = players.as_array().unwrap();
    assert_eq!(players.len(), 8);
    assert_eq!(players[0]["full_name"], "Ann Lee");
    assert_eq!(players[0]["position"], "G");
    assert_eq!(players[0]["conference"], "west");
    assert_eq!(players[2]["conference"], "east");
}

#[test]
fn ask_returns_question_with_descriptor() {
    let dir = roster_dir();
    let next = stdout_json(legend(dir.path()).arg("ask"));
    assert_eq!(next["remaining"], 8);
    assert_eq!(next["question"], "Has your player received any awards?");
    assert_eq!(next["meta"], serde_json::json!({ "type": "awards" }));
}

#[test]
fn ask_enumerates_a_restricted_pool() {
    let dir = roster_dir();
    // The trained tree still leads with its root question.
    let next = stdout_json(legend(dir.path()).args(["ask", "--ids", "3,1"]));
    assert_eq!(next["remaining"], 2);
    assert_ne!(next["meta"]["type"], "list");

    let config = dir.path().join("engine.json");
    fs::write(&config, r#"{"use_tree": false}"#).unwrap();
    let next = stdout_json(
        legend(dir.path())
            .arg("--config")
            .arg(&config)
            .args(["ask", "--ids", "3,1"]),
    );
    assert_eq!(next["remaining"], 2);
    assert_eq!(next["question"], "Is your player one of these: Ann Lee, Cy Moss?");
}

#[test]
fn guess_narrows_by_transcript() {
    let dir = roster_dir();
    let asked = r#"[{"question": "Is your player on the Suns?", "answer": true}]"#;
    let guess = stdout_json(legend(dir.path()).args(["guess", "--asked", asked]));
    assert_eq!(guess["player_id"], "6");
    assert_eq!(guess["full_name"], "Fay Ng");
    assert_eq!(guess["confidence"], 0.9);
}

#[test]
fn contradictory_answers_fail() {
    let dir = roster_dir();
    let asked = r#"[
        {"question": "Is your player on the Heat?", "answer": true},
        {"question": "Is your player on the Heat?", "answer": false}
    ]"#;
    legend(dir.path())
        .args(["guess", "--asked", asked])
        .assert()
        .failure()
        .stderr(contains("No candidates remain after filters"));
}

#[test]
fn tree_summary_reports_shape() {
    let dir = roster_dir();
    legend(dir.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(contains("players: 8"))
        .stdout(contains("leaves: "));

    let tree = stdout_json(legend(dir.path()).args(["tree", "--json", "--max-depth", "0"]));
    assert_eq!(tree["root"]["type"], "leaf");
    assert_eq!(tree["root"]["candidates"].as_array().unwrap().len(), 8);
}

#[test]
fn config_file_is_validated() {
    let dir = roster_dir();
    let config = dir.path().join("engine.toml");
    fs::write(&config, "list_threshold = 0\n").unwrap();
    legend(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("ask")
        .assert()
        .failure()
        .stderr(contains("list_threshold"));

    fs::write(&config, "list_threshold = 8\n").unwrap();
    let next = stdout_json(legend(dir.path()).arg("--config").arg(&config).arg("ask"));
    assert_eq!(next["meta"]["type"], "list");
}

#[test]
fn missing_roster_is_reported() {
    let dir = tempdir().unwrap();
    legend(dir.path())
        .arg("players")
        .assert()
        .failure()
        .stderr(contains("merged_player_data.csv"));
}
