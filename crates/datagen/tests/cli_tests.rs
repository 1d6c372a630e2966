//! CLI integration tests

use ndarray::Array3;
use ndarray_npy::NpzReader;
use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn datagen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_resource-datagen"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("Failed to execute command")
}

fn manifest(dir: &TempDir, name: &str) -> serde_json::Value {
    let text = fs::read_to_string(dir.path().join(name)).expect("manifest missing");
    serde_json::from_str(&text).unwrap()
}

fn read_array(path: &Path, key: &str) -> Array3<f32> {
    let mut npz = NpzReader::new(File::open(path).unwrap()).unwrap();
    let name = npz
        .names()
        .unwrap()
        .into_iter()
        .find(|n| n.trim_end_matches(".npy") == key)
        .unwrap_or_else(|| panic!("{key} missing"));
    npz.by_name(&name).unwrap()
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run(datagen().arg("--help"));
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("--samples"), "Should show samples option");
    assert!(stdout.contains("--seq-len"), "Should show seq-len option");
    assert!(stdout.contains("--anomaly-ratio"), "Should show ratio option");
    assert!(stdout.contains("--metrics-file"), "Should show metrics option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run(datagen().arg("--version"));
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("resource-datagen"), "Should show binary name");
}

#[test]
fn test_invalid_ratio_rejected_without_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.npz");
    let output = run(datagen()
        .args(["--samples", "10", "--anomaly-ratio", "1.5", "--output"])
        .arg(&path));

    assert!(!output.status.success(), "Out of range ratio should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("anomaly_ratio"), "stderr: {stderr}");
    assert!(!path.exists(), "No dataset should be written");
}

#[test]
fn test_unknown_anomaly_kind_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.npz");
    let output = run(datagen()
        .args(["--samples", "10", "--anomaly-kinds", "memory_leak,meltdown", "--output"])
        .arg(&path));

    assert!(!output.status.success(), "Unknown kind should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("meltdown"), "stderr: {stderr}");
    assert!(!path.exists());
}

#[test]
fn test_generates_dataset_and_manifest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("train.npz");
    let metrics = dir.path().join("metrics.prom");
    let output = run(datagen()
        .args(["--samples", "30", "--seq-len", "4", "--seed", "7", "--format", "json"])
        .arg("--output")
        .arg(&path)
        .arg("--metrics-file")
        .arg(&metrics));

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["train_samples"], 24);
    assert_eq!(summary["validation_samples"], 3);
    assert_eq!(summary["test_samples"], 3);
    assert_eq!(summary["seed"], 7);

    let train = read_array(&path, "train_sequences");
    assert_eq!(train.shape(), &[24, 4, 12]);

    assert_eq!(manifest(&dir, "data/train.json")["seq_len"], 4);
    let exposition = fs::read_to_string(&metrics).unwrap();
    assert!(exposition.contains("datagen_samples_generated_total"));
}

#[test]
fn test_same_seed_writes_identical_arrays() {
    let dir = TempDir::new().unwrap();
    for name in ["a.npz", "b.npz"] {
        let output = run(datagen()
            .args(["--samples", "40", "--seq-len", "3"])
            .arg("--output")
            .arg(dir.path().join(name)));
        assert!(output.status.success());
    }

    let a = read_array(&dir.path().join("a.npz"), "val_sequences");
    let b = read_array(&dir.path().join("b.npz"), "val_sequences");
    assert_eq!(a.shape(), &[4, 3, 12]);
    assert_eq!(a, b);
}

#[test]
fn test_config_layering() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("datagen.toml");
    fs::write(
        &config,
        "num_samples = 20\nseq_len = 3\nmode = \"flat\"\narchetypes = [\"cron\"]\n",
    )
    .unwrap();

    // file only
    let output = run(datagen()
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(dir.path().join("file.npz")));
    assert!(output.status.success());
    let m = manifest(&dir, "file.json");
    assert_eq!(m["train_samples"], 16);
    assert_eq!(m["mode"], "flat");
    assert_eq!(m["by_archetype"]["cron"], 20);

    // environment beats file, flags beat environment
    let output = run(datagen()
        .env("DATAGEN_NUM_SAMPLES", "50")
        .env("DATAGEN_MODE", "sequence")
        .env("DATAGEN_ARCHETYPES", "web,batch")
        .arg("--config")
        .arg(&config)
        .args(["--seq-len", "5", "--output"])
        .arg(dir.path().join("layered.npz")));
    assert!(output.status.success());
    let m = manifest(&dir, "layered.json");
    assert_eq!(m["train_samples"], 40);
    assert_eq!(m["mode"], "sequence");
    assert_eq!(m["seq_len"], 5);
    assert!(m["by_archetype"].get("cron").is_none());
}
