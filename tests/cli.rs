//! End-to-end tests of the `chart-overrides` binary

mod fixtures;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use chart_overrides::{apply_overrides, parse_document};
use fixtures::FixtureCase;

/// Run the binary with an isolated config location
fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chart-overrides"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run chart-overrides")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn test_extract_to_stdout() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("new_keys");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
            "--no-header",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(!text.starts_with('#'));
    assert_eq!(Some(parse_document(&text, "stdout").unwrap()), case.expected());
}

#[test]
fn test_extract_to_file_with_report() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("prometheus");
    let out = home.path().join("out/overrides.yaml");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
            "-o",
            &path_str(&out),
            "--json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["differences"], true);
    assert_eq!(report["output"], path_str(&out));
    assert_eq!(report["overridden"][0], "server.image.tag");
    assert_eq!(report["local_digest"].as_str().unwrap().len(), 64);

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("# Values overriding chart defaults\n"));
    assert_eq!(Some(parse_document(&written, "out").unwrap()), case.expected());
}

#[test]
fn test_extract_json_format() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("explicit_null");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
            "--format",
            "json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value, serde_json::json!({ "priorityClassName": "critical" }));
}

#[test]
fn test_extract_without_differences() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("no_differences");
    let out = home.path().join("overrides.yaml");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
            "-o",
            &path_str(&out),
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_config_disables_empty_file() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config/chart-overrides");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[output]\nwrite_empty = false\n").unwrap();

    let case = FixtureCase::named("no_differences");
    let out = home.path().join("overrides.yaml");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
            "-o",
            &path_str(&out),
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!out.exists());
}

#[test]
fn test_invalid_config_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("custom.toml");
    fs::write(&config, "[output]\nunknown_key = 1\n").unwrap();
    let case = FixtureCase::named("new_keys");

    let output = run(
        home.path(),
        &[
            "--config",
            &path_str(&config),
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
        ],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error loading config"));
}

#[test]
fn test_missing_local_file() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("new_keys");
    let missing = home.path().join("absent.yaml");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&missing),
            "--defaults-file",
            &path_str(&case.defaults_path()),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error:"));
    assert!(stderr(&output).contains("absent.yaml"));
}

#[test]
fn test_missing_helm() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("new_keys");

    let output = run(
        home.path(),
        &[
            "--helm",
            "definitely-not-a-real-helm-binary",
            "extract",
            &path_str(&case.local_path()),
            "--repo",
            "bitnami",
            "--chart",
            "nginx",
            "--version",
            "15.0.0",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("command not found"));
}

#[test]
fn test_json_report_requires_output() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("new_keys");

    let output = run(
        home.path(),
        &[
            "extract",
            &path_str(&case.local_path()),
            "--defaults-file",
            &path_str(&case.defaults_path()),
            "--json",
        ],
    );

    assert!(!output.status.success());
}

#[test]
fn test_merge_reproduces_local() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("prometheus");

    let output = run(
        home.path(),
        &[
            "merge",
            &path_str(&case.defaults_path()),
            &path_str(&case.expected_path()),
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let merged = parse_document(&stdout(&output), "stdout").unwrap();
    let expected = apply_overrides(&case.defaults(), &case.expected().unwrap());
    assert_eq!(merged, expected);
    assert_eq!(merged, case.local());
}

#[test]
fn test_error_reported_once() {
    let home = tempfile::tempdir().unwrap();
    let case = FixtureCase::named("new_keys");
    let missing = home.path().join("absent.yaml");

    let output = run(
        home.path(),
        &[
            "-q",
            "extract",
            &path_str(&missing),
            "--defaults-file",
            &path_str(&case.defaults_path()),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "stderr: {}", stderr);
    assert!(lines[0].starts_with("error: "));
    assert_eq!(stderr.matches("absent.yaml").count(), 1);
}
