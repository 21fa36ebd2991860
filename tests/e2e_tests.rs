//! End-to-end tests for the specup binary
//!
//! External tools are replaced with stub scripts via --checker-cmd and
//! --comparator-cmd so the full update pipeline runs without nvchecker
//! or rpmdev-vercmp installed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOURCES_TOML: &str = r#"
[zlib]
source = "git"
git = "https://github.com/madler/zlib.git"
prefix = "v"
use_max_tag = true
"#;

const ZLIB_SPEC: &str = "\
Name: zlib
Version: 1.2.13
Release: %mkrel 2
Summary: A compression and decompression library
";

fn specup() -> Command {
    Command::cargo_bin("specup").expect("binary builds")
}

/// Lay out a working directory with a source table and a flat spec file.
fn setup_workspace() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = dir.path().join("sources.toml");
    fs::write(&config, SOURCES_TOML).unwrap();
    let spec = dir.path().join("zlib.spec");
    fs::write(&spec, ZLIB_SPEC).unwrap();
    (dir, config, spec)
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stub that emits one nvchecker JSON event line for zlib.
#[cfg(unix)]
fn stub_checker(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-nvchecker",
        "#!/bin/sh\n\
         echo '{\"logger_name\": \"nvchecker.core\", \"event\": \"updated\", \
         \"name\": \"zlib\", \"version\": \"v1.3.1\"}'\n",
    )
}

/// Stub comparator with a fixed rpmdev-vercmp exit code.
#[cfg(unix)]
fn stub_comparator(dir: &Path, code: i32) -> PathBuf {
    write_script(
        dir,
        "fake-vercmp",
        &format!("#!/bin/sh\nexit {}\n", code),
    )
}

#[test]
fn test_missing_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    specup()
        .arg(dir.path().join("nope.toml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("source table not found"));
}

#[test]
fn test_malformed_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sources.toml");
    fs::write(&config, "[zlib\nsource =").unwrap();

    specup().arg(&config).assert().failure().code(1);
}

#[test]
fn test_unknown_package_filter_is_partial_failure() {
    let (dir, config, _spec) = setup_workspace();

    specup()
        .arg(&config)
        .args(["--specs-dir"])
        .arg(dir.path())
        .args(["-p", "nosuch"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("not in the source table"));
}

#[cfg(unix)]
#[test]
fn test_full_update_flow() {
    let (dir, config, spec) = setup_workspace();
    let checker = stub_checker(dir.path());
    // 12 means the second argument (upstream) is newer
    let comparator = stub_comparator(dir.path(), 12);
    let log = dir.path().join("updates.log");

    specup()
        .arg(&config)
        .args(["--specs-dir"])
        .arg(dir.path())
        .args(["--checker-cmd"])
        .arg(&checker)
        .args(["--comparator-cmd"])
        .arg(&comparator)
        .args(["--log"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("updated zlib: 1.2.13 -> 1.3.1"))
        .stdout(predicate::str::contains("1 updated, 0 current, 0 failed"));

    let content = fs::read_to_string(&spec).unwrap();
    assert!(content.contains("Version: 1.3.1"));
    assert!(content.contains("Release: %mkrel 1"));

    let logged = fs::read_to_string(&log).unwrap();
    assert!(logged.contains("zlib: 1.2.13 -> 1.3.1"));
}

#[cfg(unix)]
#[test]
fn test_already_current_package() {
    let (dir, config, spec) = setup_workspace();
    let checker = stub_checker(dir.path());
    let comparator = stub_comparator(dir.path(), 0);

    specup()
        .arg(&config)
        .args(["--specs-dir"])
        .arg(dir.path())
        .args(["--checker-cmd"])
        .arg(&checker)
        .args(["--comparator-cmd"])
        .arg(&comparator)
        .assert()
        .success()
        .stdout(predicate::str::contains("current zlib"))
        .stdout(predicate::str::contains("0 updated, 1 current, 0 failed"));

    assert_eq!(fs::read_to_string(&spec).unwrap(), ZLIB_SPEC);
}

#[cfg(unix)]
#[test]
fn test_dry_run_leaves_spec_untouched() {
    let (dir, config, spec) = setup_workspace();
    let checker = stub_checker(dir.path());
    let comparator = stub_comparator(dir.path(), 12);

    specup()
        .arg(&config)
        .args(["--specs-dir"])
        .arg(dir.path())
        .args(["--checker-cmd"])
        .arg(&checker)
        .args(["--comparator-cmd"])
        .arg(&comparator)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("(dry-run)"))
        .stdout(predicate::str::contains("updated zlib: 1.2.13 -> 1.3.1"));

    assert_eq!(fs::read_to_string(&spec).unwrap(), ZLIB_SPEC);
}

#[cfg(unix)]
#[test]
fn test_json_output_schema() {
    let (dir, config, _spec) = setup_workspace();
    let checker = stub_checker(dir.path());
    let comparator = stub_comparator(dir.path(), 12);

    let output = specup()
        .arg(&config)
        .args(["--specs-dir"])
        .arg(dir.path())
        .args(["--checker-cmd"])
        .arg(&checker)
        .args(["--comparator-cmd"])
        .arg(&comparator)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["dry_run"], false);
    assert_eq!(parsed["summary"]["updated"], 1);
    assert_eq!(parsed["summary"]["failed"], 0);
    assert_eq!(parsed["packages"][0]["name"], "zlib");
    assert_eq!(parsed["packages"][0]["status"], "updated");
    assert_eq!(parsed["packages"][0]["from"], "1.2.13");
    assert_eq!(parsed["packages"][0]["to"], "1.3.1");
}

#[cfg(unix)]
#[test]
fn test_checker_failure_is_partial_failure() {
    let (dir, config, spec) = setup_workspace();
    // Checker exits nonzero without emitting any event
    let checker = write_script(dir.path(), "fake-nvchecker", "#!/bin/sh\nexit 3\n");
    let comparator = stub_comparator(dir.path(), 12);

    specup()
        .arg(&config)
        .args(["--specs-dir"])
        .arg(dir.path())
        .args(["--checker-cmd"])
        .arg(&checker)
        .args(["--comparator-cmd"])
        .arg(&comparator)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("error zlib"));

    assert_eq!(fs::read_to_string(&spec).unwrap(), ZLIB_SPEC);
}
