use assert_cmd::prelude::*;
use rstest::rstest;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &tempfile::TempDir, extra: &str) -> PathBuf {
    let toml = format!(
        r#"
[loop]
tick_hz = 1000
time_scale = 10.0
{extra}
"#
    );
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON: {l:?}: {e}")))
        .collect()
}

#[rstest]
fn tick_lines_carry_the_full_schema() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let out = Command::cargo_bin("balance")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "--log-level", "error", "run", "--ticks", "8"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let lines = json_lines(&out.stdout);
    assert_eq!(lines.len(), 9, "8 tick lines plus a summary");

    for (i, v) in lines[..8].iter().enumerate() {
        assert_eq!(v["event"], "tick");
        assert_eq!(v["tick"].as_u64(), Some(i as u64 + 1));
        for key in [
            "measurement_m",
            "position_m",
            "velocity_mps",
            "raw_command",
            "angle",
            "time_scale",
        ] {
            assert!(v[key].is_f64(), "{key} should be a number in {v}");
        }
        assert!(v["fault_ticks"].is_u64());
        assert_eq!(v["state"], "running");
        assert_eq!(v["status"], "running");
        assert!(v["angle"].as_f64().unwrap().abs() <= 1.3962 + 1e-12);
    }

    let summary = lines.last().unwrap();
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["ticks"].as_u64(), Some(8));
    assert!(summary["frozen_at"].is_null());
    assert_eq!(summary["state"], "running");
}

#[rstest]
#[case(1, 13)]
#[case(4, 4)]
fn every_thins_tick_lines(#[case] every: u64, #[case] expected_ticks: usize) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let ticks = if every == 1 { 13 } else { 16 };

    let out = Command::cargo_bin("balance")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "--log-level", "error", "run"])
        .args(["--ticks", &ticks.to_string(), "--every", &every.to_string()])
        .output()
        .unwrap();
    assert!(out.status.success());

    let lines = json_lines(&out.stdout);
    let tick_lines = lines.iter().filter(|v| v["event"] == "tick").count();
    assert_eq!(tick_lines, expected_ticks);
    assert_eq!(lines.last().unwrap()["event"], "summary");
}

#[rstest]
fn ball_leaving_the_beam_reports_the_freeze() {
    let dir = tempdir().unwrap();
    // Ball starts near the far end rolling outward; no grace and a short fault window.
    let cfg = write_config(
        &dir,
        r#"
[contact]
grace_ms = 0
fault_ticks = 3

[sim]
ball_offset = 245.0
ball_speed = 100.0
"#,
    );

    let out = Command::cargo_bin("balance")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "--log-level", "error", "run", "--ticks", "50"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let lines = json_lines(&out.stdout);
    let tripped: Vec<_> = lines.iter().filter(|v| v["status"] == "tripped").collect();
    assert_eq!(tripped.len(), 1, "freeze is reported exactly once");
    assert_eq!(tripped[0]["fault_ticks"].as_u64(), Some(4));
    assert_eq!(tripped[0]["state"], "frozen");
    assert_eq!(tripped[0]["time_scale"].as_f64(), Some(0.0));

    let summary = lines.last().unwrap();
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["state"], "frozen");
    let frozen_at = summary["frozen_at"].as_u64().expect("frozen_at should be set");
    assert_eq!(Some(frozen_at + 1), tripped[0]["tick"].as_u64());

    let after: Vec<_> = lines
        .iter()
        .filter(|v| v["event"] == "tick" && v["tick"].as_u64() > Some(frozen_at + 1))
        .collect();
    assert!(!after.is_empty());
    assert!(after.iter().all(|v| v["status"] == "frozen"));
}

#[rstest]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let out = Command::cargo_bin("balance")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["--json", "run", "--ticks", "1", "--time-scale=-1"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));

    let stderr = String::from_utf8_lossy(&out.stderr);
    let line = stderr
        .lines()
        .rev()
        .find(|l| l.contains("\"reason\""))
        .expect("structured error line");
    let v: Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "InvalidConfig");
    assert!(v["message"].as_str().unwrap().contains("time_scale"));
    assert!(v["chain"].is_array());
}
