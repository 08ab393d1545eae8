use std::path::{Path, PathBuf};

use anyhow::Result;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// The binary, run from `dir` so no stray config file is picked up
fn dashboard_command(dir: &Path) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("esco-dashboard")?;
    cmd.current_dir(dir).env("RUST_LOG", "esco=debug");
    Ok(cmd)
}

#[test]
fn highlight_prints_markup() -> Result<()> {
    let dir = TempDir::new()?;
    let labels = fixture("labels.json");

    dashboard_command(dir.path())?
        .args(["highlight", "--text", "the quick fox", "--labels"])
        .arg(&labels)
        .assert()
        .success()
        .stdout(contains(r#"<mark style="background:#fde68a">the </mark>"#))
        .stdout(contains(r#"<mark style="background:#fca5a5">quick</mark>"#))
        .stdout(contains(r#"<mark style="background:#93c5fd"> fox</mark>"#));
    Ok(())
}

#[test]
fn highlight_uses_configured_palette() -> Result<()> {
    let dir = TempDir::new()?;
    dashboard_command(dir.path())?
        .arg("--config")
        .arg(fixture("esco-dashboard.toml"))
        .args(["highlight", "--text", "the quick fox", "--labels"])
        .arg(fixture("labels.json"))
        .assert()
        .success()
        .stdout(contains(r#"<mark style="background:#fde68a"> fox</mark>"#));
    Ok(())
}

#[test]
fn highlight_skips_malformed_label_entries() -> Result<()> {
    let dir = TempDir::new()?;
    let labels = dir.path().join("labels.json");
    std::fs::write(
        &labels,
        r#"[
            {"skill": "work in teams", "reason": "ok", "span": "quick fox"},
            {"skill": "show empathy", "reason": 5, "span": "fox"}
        ]"#,
    )?;

    dashboard_command(dir.path())?
        .args(["highlight", "--text", "the quick fox", "--labels"])
        .arg(&labels)
        .assert()
        .success()
        .stdout(contains(r#"<mark style="background:#fde68a">quick fox</mark>"#))
        .stdout(contains("show empathy").not());
    Ok(())
}

#[test]
fn list_prints_one_line_per_activity()-> Result<()> {
    let dir = TempDir::new()?;
    let output = dashboard_command(dir.path())?
        .args(["list", "--data"])
        .arg(fixture("activities.json"))
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("0\t4\tWalk the shelter dogs"));
    assert!(lines[1].starts_with("1\t2\tSort donated books"));
    assert_eq!(
        lines[2],
        "2\t0\tRead stories to children at the community centre."
    );
    Ok(())
}

#[test]
fn render_without_score_writes_page() -> Result<()> {
    let dir = TempDir::new()?;
    let out = dir.path().join("page.html");

    dashboard_command(dir.path())?
        .args(["render", "--no-score", "--activity", "1", "--goal", "Learn & share"])
        .arg("--data")
        .arg(fixture("activities.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout("")
        .stderr(contains("wrote dashboard page"));

    let page = std::fs::read_to_string(&out)?;
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<dd>Learn &amp; share</dd>"));
    assert!(page.contains("<dd>Computer Games, Cinema, Pets</dd>"));
    assert!(page.contains("Scoring disabled."));
    assert!(page.contains("attend to detail"));
    Ok(())
}

#[test]
fn render_reports_bad_activity_index() -> Result<()> {
    let dir = TempDir::new()?;
    dashboard_command(dir.path())?
        .args(["render", "--no-score", "--activity", "7", "--data"])
        .arg(fixture("activities.json"))
        .assert()
        .failure()
        .stderr(contains("Activity 7 out of range (dataset has 3)"));
    Ok(())
}

#[test]
fn invalid_config_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[highlight]\npalette = [\"red\"]\n")?;

    dashboard_command(dir.path())?
        .arg("--config")
        .arg(&config)
        .args(["list", "--data"])
        .arg(fixture("activities.json"))
        .assert()
        .failure()
        .stderr(contains("Failed to load config").and(contains("not a #rgb or #rrggbb")));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn render_scores_through_lm_studio() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content":
                "{\"score\": 0.3, \"explanation\": \"Few matching skills\", \"explanation_short\": \"Weak match.\"}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new()?;
    let config = dir.path().join("esco-dashboard.toml");
    std::fs::write(
        &config,
        format!(
            "[model]\nbase_url = \"{}/v1\"\nmodel = \"test-model\"\n\n[poll]\ninterval_ms = 20\nmax_attempts = 250\n",
            server.uri()
        ),
    )?;

    dashboard_command(dir.path())?
        .args(["render", "--person", "2", "--data"])
        .arg(fixture("activities.json"))
        .assert()
        .success()
        .stdout(contains("Weak match.").and(contains("\"value\":30.0")))
        .stdout(contains("Person 3"));
    Ok(())
}
