use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pdfpress() -> Command {
    Command::cargo_bin("pdfpress").unwrap()
}

fn config_arg(dir: &TempDir) -> String {
    dir.path().join("config.json").display().to_string()
}

/// Write an empty config so commands that read it see defaults.
fn empty_config(dir: &TempDir) -> String {
    let path = config_arg(dir);
    std::fs::write(&path, "{}").unwrap();
    path
}

#[test]
fn test_config_path_reports_missing_file() {
    let dir = TempDir::new().unwrap();

    pdfpress()
        .args(["-c", &config_arg(&dir), "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_config_show_prints_defaults() {
    let dir = TempDir::new().unwrap();

    pdfpress()
        .args(["-c", &config_arg(&dir), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"file_prefix\": \"compressed_\""))
        .stdout(predicate::str::contains("\"default_level\": \"medium\""));
}

#[test]
fn test_config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = config_arg(&dir);

    pdfpress()
        .args(["-c", &config, "config", "init"])
        .assert()
        .success();
    pdfpress()
        .args(["-c", &config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    pdfpress()
        .args(["-c", &config, "config", "set", "compression.default_level", "high"])
        .assert()
        .success();
    pdfpress()
        .args(["-c", &config, "config", "get", "compression.default_level"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"high\""));
}

#[test]
fn test_config_set_rejects_invalid_level() {
    let dir = TempDir::new().unwrap();

    pdfpress()
        .args([
            "-c",
            &config_arg(&dir),
            "config",
            "set",
            "compression.default_level",
            "extreme",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_analyze_rejects_invalid_pdf() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.pdf");
    std::fs::write(&input, b"this is not a pdf").unwrap();

    pdfpress()
        .args(["-c", &empty_config(&dir), "analyze"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse PDF"));
}

#[test]
fn test_compress_rejects_missing_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.pdf");

    pdfpress()
        .args(["-c", &empty_config(&dir), "compress"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));

    assert!(!dir.path().join("compressed_missing.pdf").exists());
}

#[test]
fn test_compress_rejects_unknown_level() {
    pdfpress()
        .args(["compress", "in.pdf", "--level", "extreme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown compression level"));
}
