//! Headless runs of the compiled binary against a SQLite file.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

use super::common::{fixture_file, sample_quakes};

struct Fixture {
    dir: TempDir,
    url: String,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("quakes.db");
    fixture_file(&db, &sample_quakes()).await;
    let url = format!("sqlite:{}", db.display());
    Fixture { dir, url }
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quake-glance"))
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("missing.toml"))
        .args(args)
        .env("RUST_LOG", "off")
        .env_remove("DATABASE_URL")
        .env_remove("PGHOST")
        .env_remove("PGDATABASE")
        .env_remove("QUAKE_GLANCE_CONFIG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test]
async fn test_list_without_database() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["--list"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("1. Top 10 Strongest Earthquakes\n"));
    assert!(out.contains("30. Deep-focus Regions (> 300km)"));
    assert_eq!(out.lines().count(), 28);
}

#[tokio::test]
async fn test_query_as_json() {
    let f = fixture().await;
    let output = run(f.dir.path(), &[&f.url, "--query", "1", "--output", "json"]);

    assert!(output.status.success(), "{:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["label"], "1. Top 10 Strongest Earthquakes");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["row_count"], 6);
    assert_eq!(json["columns"], serde_json::json!(["place", "mag", "time"]));
    assert_eq!(json["rows"][0][0], "Chile");
    assert_eq!(json["rows"][0][1], 9.1);
}

#[tokio::test]
async fn test_total_as_text() {
    let f = fixture().await;
    let output = run(f.dir.path(), &[&f.url, "--total"]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(stdout(&output), "Total Records: 6\n");
}

#[tokio::test]
async fn test_query_by_label_prints_table() {
    let f = fixture().await;
    let output = run(
        f.dir.path(),
        &[&f.url, "-q", "3. Shallow & Powerful (Depth < 50km, Mag > 7.5)"],
    );

    assert!(output.status.success(), "{:?}", output);
    let out = stdout(&output);
    assert!(out.contains("Chile"));
    assert!(out.contains("Alaska"));
    assert!(out.contains("(2 rows in "));
}

#[tokio::test]
async fn test_unknown_query_fails() {
    let f = fixture().await;
    let output = run(f.dir.path(), &[&f.url, "--query", "4"]);

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown query: 4"));
}

#[tokio::test]
async fn test_headless_needs_an_action() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["--headless"]);
    assert!(!output.status.success());
}
