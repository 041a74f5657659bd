//! End-to-end tests for the `numera` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::TempDir;

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// A `numera` command isolated from the caller's environment and config.
fn numera(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("numera").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("NUMERA_BACKEND")
        .env_remove("NUMERA_FORMAT")
        .env_remove("NUMERA_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// ROOT FINDING
// =============================================================================

#[test]
fn test_bisection_table() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["root", "bisection", "x^3 - x - 2", "-a", "1", "-b", "2", "-t", "1e-4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("converged"))
        .stdout(predicate::str::contains("1.521"));
}

#[test]
fn test_newton_json() {
    let dir = TempDir::new().unwrap();
    let value = json_output(numera(&dir).args([
        "--format", "json", "root", "newton", "x^2 - 2", "--x0", "1", "-t", "1e-6",
    ]));
    assert_eq!(value["kind"], "root");
    assert_eq!(value["status"], "converged");
    let estimate = value["finalEstimate"].as_f64().unwrap();
    assert!((estimate - 2f64.sqrt()).abs() < 1e-6);
    assert!(value["derivatives"].is_array());
}

#[test]
fn test_finite_difference_backend_from_env() {
    let dir = TempDir::new().unwrap();
    let value = json_output(
        numera(&dir)
            .env("NUMERA_BACKEND", "finite-difference")
            .args(["-f", "json", "root", "multiple-roots", "(x - 1)^2", "--x0", "3"]),
    );
    assert_eq!(value["status"], "converged");
    assert!(value["secondDerivatives"].is_array());
}

#[test]
fn test_csv_history() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["-f", "csv", "root", "newton", "x^2 - 2", "--x0", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("iter,x,f(x),f'(x),error\n1,1.5,"));
}

#[test]
fn test_negative_bracket_values() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["root", "bisection", "-x^3 + 2", "-a", "-1", "-b", "3", "-t", "1e-4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.259"));
}

#[test]
fn test_invalid_bracket_fails() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["root", "bisection", "x^3 - x - 2", "-a", "2", "-b", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid bracket"));
}

#[test]
fn test_missing_field_fails() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["root", "secant", "x^2 - 4", "--x0", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("x1"));
}

#[test]
fn test_unknown_method_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["root", "golden-section", "x", "-a", "0", "-b", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown root-finding method"));
}

// =============================================================================
// LINEAR SYSTEMS
// =============================================================================

#[test]
fn test_direct_from_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "2, 1").unwrap();
    writeln!(file, "1, 3").unwrap();

    let value = json_output(numera(&dir).args([
        "-f",
        "json",
        "direct",
        "doolittle",
        "--matrix-file",
        path.to_str().unwrap(),
        "--vector",
        "3 4",
        "-d",
        "8",
    ]));
    assert_eq!(value["status"], "solved");
    assert_eq!(value["solution"], serde_json::json!([1.0, 1.0]));
    assert!(value["lower"].is_array());
}

#[test]
fn test_malformed_matrix_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["direct", "crout", "-m", "1 2; 3", "--vector", "1 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn test_sor_reports_spectral_radius() {
    let dir = TempDir::new().unwrap();
    let value = json_output(numera(&dir).args([
        "-f",
        "json",
        "iterative",
        "sor",
        "-m",
        "4 -1 0; -1 4 -1; 0 -1 4",
        "--vector",
        "3 2 3",
        "-w",
        "1.1",
        "--norm",
        "2",
    ]));
    assert_eq!(value["status"], "converged");
    assert!(value["spectralRadius"].as_f64().unwrap() < 1.0);
    for x in value["solution"].as_array().unwrap() {
        assert!((x.as_f64().unwrap() - 1.0).abs() < 1e-5);
    }
}

// =============================================================================
// INTERPOLATION
// =============================================================================

#[test]
fn test_interpolation_table() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["interpolate", "newton", "-x", "1 2 3", "-y", "1 4 9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Polynomial"))
        .stdout(predicate::str::contains("x^2"));
}

#[test]
fn test_interpolation_from_points_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("points.csv");
    std::fs::write(&path, "x,y\n-1,15.5\n0,3\n3,8\n4,1\n").unwrap();

    let value = json_output(numera(&dir).args([
        "-f",
        "json",
        "interpolate",
        "vandermonde",
        "--points",
        path.to_str().unwrap(),
        "-d",
        "6",
    ]));
    assert_eq!(value["status"], "solved");
    assert_eq!(value["coefficients"].as_array().unwrap().len(), 4);
}

// =============================================================================
// REQUEST FILES
// =============================================================================

#[test]
fn test_run_from_stdin() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["-f", "json", "run", "-"])
        .write_stdin(
            r#"{"kind": "root", "method": "secant", "function": "cos(x) - x", "x0": 0, "x1": 1}"#,
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"converged\""));
}

#[test]
fn test_run_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("request.json");
    std::fs::write(&path, r#"{"kind": "root"}"#).unwrap();
    numera(&dir)
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("json error"));
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    numera(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("numera.toml").exists());

    // A second init refuses to overwrite.
    numera(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    let value = json_output(numera(&dir).args(["-f", "json", "config", "show"]));
    assert_eq!(value["backend"], "symbolic");
    assert_eq!(value["max_iterations"], 100);
}

#[test]
fn test_config_file_settings_apply() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "format = \"json\"\nmax_iterations = 1\n").unwrap();

    let value = json_output(numera(&dir).args([
        "--config",
        path.to_str().unwrap(),
        "root",
        "bisection",
        "x^3 - x - 2",
        "-a",
        "1",
        "-b",
        "2",
    ]));
    assert_eq!(value["status"], "maxIterationsReached");
    assert_eq!(value["iterations"], serde_json::json!([1]));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    numera(&dir)
        .args(["--config", "nope.toml", "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
