mod common;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

use common::{MANIFEST, VALUES, deployment_tree, deployment_tree_with_manifest, required_names};

/// `deploycfg` in `root` with a clean slate of required values
fn deploycfg(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("deploycfg").unwrap();
    cmd.current_dir(root)
        .env_remove("GITHUB_OUTPUT")
        .env_remove("DEPLOYCFG_CONFIG");
    for name in required_names() {
        cmd.env_remove(name);
    }
    cmd
}

fn with_values<'a>(cmd: &'a mut Command, skip: &[&str]) -> &'a mut Command {
    for (name, value) in VALUES {
        if !skip.contains(&name) {
            cmd.env(name, value);
        }
    }
    cmd
}

#[test]
fn all_values_present_passes() -> Result<(), Box<dyn std::error::Error>> {
    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[]).arg("run");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PASS:"))
        .stdout(predicate::str::contains("Generated"));

    let artifact = fs::read_to_string(root.path().join("firebase-config.js"))?;
    for (_, value) in VALUES {
        assert!(artifact.contains(value), "{value} missing from artifact");
    }
    assert!(!artifact.contains("{{"));
    assert!(artifact.contains("const firebaseConfig"));
    Ok(())
}

#[test]
fn default_command_is_run() {
    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[]);
    cmd.assert().success().stdout(predicate::str::contains("PASS:"));
    root.child("firebase-config.js").assert(predicate::path::is_file());
}

#[test]
fn missing_values_fail_without_generating() {
    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &["FIREBASE_APP_ID", "FIREBASE_MEASUREMENT_ID"]).arg("run");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("[MissingValue] FIREBASE_APP_ID"))
        .stdout(predicate::str::contains("[MissingValue] FIREBASE_MEASUREMENT_ID"))
        .stdout(predicate::str::contains("[MissingEntry] firebase-config.js"))
        .stdout(predicate::str::contains("3 fatal defect(s)"))
        .stdout(predicate::str::contains("FAIL:"));

    root.child("firebase-config.js")
        .assert(predicate::path::missing());
}

#[test]
fn leftover_placeholder_in_artifact_fails_verification() {
    let root = deployment_tree();
    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[]).arg("generate");
    cmd.assert().success();

    let artifact = root.child("firebase-config.js");
    let content = fs::read_to_string(artifact.path()).unwrap();
    artifact
        .write_str(&content.replace("demo-app.appspot.com", "{{FIREBASE_STORAGE_BUCKET}}"))
        .unwrap();

    deploycfg(root.path())
        .arg("verify")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[ContentCheckFailure] firebase-config.js: 1 unresolved placeholder marker(s)",
        ))
        .stdout(predicate::str::contains(
            "raw variable name(s) used as literal text: FIREBASE_STORAGE_BUCKET",
        ));
}

#[test]
fn missing_manifest_stage_is_fatal_and_other_checks_still_run() {
    let manifest = MANIFEST
        .replace("  generate-config:", "  build-config:")
        .replace("needs: generate-config", "needs: build-config");
    let root = deployment_tree_with_manifest(&manifest);

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[]).arg("run");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[ManifestMarkerMissing] .github/workflows/deploy.yml: missing generate-config stage",
        ))
        .stdout(predicate::str::contains("1 fatal defect(s)"))
        .stdout(predicate::str::contains("index.html  file"))
        .stdout(predicate::str::contains("firebase-config.js  file"));
}

#[test]
fn missing_manual_dispatch_is_advisory() {
    let manifest = MANIFEST.replace("  workflow_dispatch:\n", "");
    let root = deployment_tree_with_manifest(&manifest);

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[]).arg("run");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Advisory defects (1):"))
        .stdout(predicate::str::contains("manual dispatch trigger"))
        .stdout(predicate::str::contains("PASS:"));
}

#[test]
fn var_overrides_fill_in_missing_values() {
    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &["FIREBASE_PROJECT_ID"]).args([
        "run",
        "--var",
        "FIREBASE_PROJECT_ID=override-project",
    ]);
    cmd.assert().success();

    root.child("firebase-config.js")
        .assert(predicate::str::contains("projectId: \"override-project\""));
}

#[test]
fn json_report() -> Result<(), Box<dyn std::error::Error>> {
    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &["FIREBASE_API_KEY"]).args(["--format", "json", "run"]);
    let output = cmd.assert().code(1).get_output().stdout.clone();

    let report: Value = serde_json::from_slice(&output)?;
    assert_eq!(report["passed"], false);
    assert_eq!(report["defects"][0]["kind"], "MissingValue");
    assert_eq!(report["defects"][0]["source"], "FIREBASE_API_KEY");
    assert!(report["entries"].as_array().is_some_and(|e| !e.is_empty()));
    Ok(())
}

#[test]
fn github_output_receives_fingerprint() -> Result<(), Box<dyn std::error::Error>> {
    let root = deployment_tree();
    let output_file = root.path().join("github-output.txt");

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[])
        .args(["run", "--github-output", "config_fingerprint"])
        .env("GITHUB_OUTPUT", &output_file);
    cmd.assert().success();

    let contents = fs::read_to_string(&output_file)?;
    let line = contents.trim();
    let fingerprint = line
        .strip_prefix("config_fingerprint=")
        .ok_or("missing output name")?;
    assert_eq!(fingerprint.len(), 12);
    assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    Ok(())
}

#[test]
fn github_output_fallback_keeps_json_stdout_clean() -> Result<(), Box<dyn std::error::Error>> {
    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[]).args([
        "--format",
        "json",
        "run",
        "--github-output",
        "config_fingerprint",
    ]);
    let assert = cmd.assert().success();
    let output = assert.get_output();

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["passed"], true);
    assert!(String::from_utf8_lossy(&output.stderr).contains("config_fingerprint="));
    Ok(())
}

#[cfg(unix)]
#[test]
fn check_env_flags_non_utf8_value() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &["FIREBASE_API_KEY"])
        .env("FIREBASE_API_KEY", OsString::from_vec(vec![b'A', b'I', 0xff]))
        .arg("check-env");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[FormatError] FIREBASE_API_KEY: value is not valid UTF-8",
        ))
        .stdout(predicate::str::contains("[MissingValue] FIREBASE_API_KEY").not());
}

#[test]
fn check_env_masks_values() {
    let root = deployment_tree();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &["FIREBASE_MEASUREMENT_ID"]).arg("check-env");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("FIREBASE_API_KEY  AIzaS...ample"))
        .stdout(predicate::str::contains("FIREBASE_PROJECT_ID  *****"))
        .stdout(predicate::str::contains("FIREBASE_MEASUREMENT_ID  (not set)"))
        .stdout(predicate::str::contains("AIzaSyD-exampleexampleexample").not());

    root.child("firebase-config.js")
        .assert(predicate::path::missing());
}

#[test]
fn write_failure_aborts_the_run() {
    let root = deployment_tree();
    root.child("deploycfg.yml")
        .write_str(
            "template: firebase-config.template.js\n\
             output: dist/firebase-config.js\n\
             required_values:\n  - name: FIREBASE_API_KEY\n  - name: FIREBASE_AUTH_DOMAIN\n  - name: FIREBASE_DATABASE_URL\n  - name: FIREBASE_PROJECT_ID\n  - name: FIREBASE_STORAGE_BUCKET\n  - name: FIREBASE_MESSAGING_SENDER_ID\n  - name: FIREBASE_APP_ID\n  - name: FIREBASE_MEASUREMENT_ID\n\
             expected_entries:\n  - path: index.html\n",
        )
        .unwrap();

    let mut cmd = deploycfg(root.path());
    with_values(&mut cmd, &[]).arg("run");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("[WriteFailure] dist/firebase-config.js"))
        .stdout(predicate::str::contains("Run aborted"));
}

#[test]
fn invalid_config_exits_with_usage_status() {
    let root = deployment_tree();
    root.child("deploycfg.yml")
        .write_str("template: [unclosed\n")
        .unwrap();

    deploycfg(root.path())
        .arg("verify")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn init_writes_defaults_once() {
    let root = assert_fs::TempDir::new().unwrap();

    deploycfg(root.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));
    root.child("deploycfg.yml")
        .assert(predicate::str::contains("FIREBASE_API_KEY"));
    root.child("firebase-config.template.js")
        .assert(predicate::str::contains("{{FIREBASE_API_KEY}}"));

    deploycfg(root.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));
}
