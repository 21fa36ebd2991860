//! Spec file rewriting
//!
//! The edit is all-or-nothing: the full new content is staged in a
//! temporary file next to the spec and renamed over it, so an interrupted
//! run never leaves a partially written spec behind.

use crate::error::{AppError, WriteError};
use regex::{Captures, Regex};
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

static VERSION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(Version:[ \t]*)(\S.*?)[ \t]*$").unwrap());

static RELEASE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(Release:[ \t]*)(\S.*?)[ \t]*$").unwrap());

static FIRST_INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Reset the numeric component of a Release value to 1
///
/// The first integer run is replaced and any surrounding macro text is
/// preserved: `%mkrel 2` becomes `%mkrel 1`, `3%{?dist}` becomes
/// `1%{?dist}`, plain `2` becomes `1`. Values without digits are left
/// unchanged.
pub fn reset_release(value: &str) -> String {
    FIRST_INT_RE.replace(value, "1").into_owned()
}

/// Render the updated spec content, or None when nothing would change
///
/// Rewrites the first Version field to `new_version` and resets the first
/// Release field. Field whitespace is preserved.
pub fn render_update(content: &str, new_version: &str) -> Option<String> {
    let current = VERSION_LINE_RE.captures(content).map(|c| c[2].to_string())?;
    if current == new_version {
        return None;
    }

    let updated = VERSION_LINE_RE.replace(content, |caps: &Captures| {
        format!("{}{}", &caps[1], new_version)
    });
    let updated = RELEASE_LINE_RE.replace(&updated, |caps: &Captures| {
        format!("{}{}", &caps[1], reset_release(&caps[2]))
    });

    Some(updated.into_owned())
}

/// Rewrite the spec file at `path` to record `new_version`
///
/// Returns true if the file was replaced, false if it already records the
/// requested version. The original file is untouched on any failure.
pub fn apply_update(path: &Path, new_version: &str) -> Result<bool, AppError> {
    let content = super::read_spec(path)?;

    let Some(updated) = render_update(&content, new_version) else {
        return Ok(false);
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".specup-")
        .tempfile_in(dir)
        .map_err(|e| WriteError::StageError {
            path: path.to_path_buf(),
            source: e,
        })?;
    tmp.write_all(updated.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| WriteError::StageError {
            path: path.to_path_buf(),
            source: e,
        })?;

    // Carry the original permissions over the rename
    if let Ok(metadata) = std::fs::metadata(path) {
        let _ = std::fs::set_permissions(tmp.path(), metadata.permissions());
    }

    tmp.persist(path).map_err(|e| WriteError::ReplaceError {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ZLIB_SPEC: &str = "\
Name: zlib
Version: 1.2.13
Release: %mkrel 2
Summary: A compression and decompression library
Source0: https://zlib.net/zlib-%{version}.tar.gz
";

    #[test]
    fn test_reset_release_mkrel() {
        assert_eq!(reset_release("%mkrel 2"), "%mkrel 1");
    }

    #[test]
    fn test_reset_release_dist_suffix() {
        assert_eq!(reset_release("3%{?dist}"), "1%{?dist}");
    }

    #[test]
    fn test_reset_release_bare_number() {
        assert_eq!(reset_release("7"), "1");
    }

    #[test]
    fn test_reset_release_no_digits() {
        assert_eq!(reset_release("%{release}"), "%{release}");
    }

    #[test]
    fn test_render_update_rewrites_version() {
        let updated = render_update(ZLIB_SPEC, "1.3.1").unwrap();
        assert!(updated.contains("Version: 1.3.1"));
        assert!(!updated.contains("1.2.13"));
    }

    #[test]
    fn test_render_update_resets_release() {
        let updated = render_update(ZLIB_SPEC, "1.3.1").unwrap();
        assert!(updated.contains("Release: %mkrel 1"));
    }

    #[test]
    fn test_render_update_preserves_other_lines() {
        let updated = render_update(ZLIB_SPEC, "1.3.1").unwrap();
        assert!(updated.contains("Name: zlib"));
        assert!(updated.contains("Source0: https://zlib.net/zlib-%{version}.tar.gz"));
    }

    #[test]
    fn test_render_update_preserves_field_whitespace() {
        let content = "Version:\t\t1.2.13\n";
        let updated = render_update(content, "1.3.1").unwrap();
        assert_eq!(updated, "Version:\t\t1.3.1\n");
    }

    #[test]
    fn test_render_update_same_version_is_none() {
        assert!(render_update(ZLIB_SPEC, "1.2.13").is_none());
    }

    #[test]
    fn test_render_update_no_version_field_is_none() {
        assert!(render_update("Name: zlib\n", "1.3.1").is_none());
    }

    #[test]
    fn test_apply_update_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zlib.spec");
        fs::write(&path, ZLIB_SPEC).unwrap();

        let changed = apply_update(&path, "1.3.1").unwrap();
        assert!(changed);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Version: 1.3.1"));
        assert!(content.contains("Release: %mkrel 1"));
    }

    #[test]
    fn test_apply_update_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zlib.spec");
        fs::write(&path, ZLIB_SPEC).unwrap();

        assert!(apply_update(&path, "1.3.1").unwrap());
        let after_first = fs::read_to_string(&path).unwrap();

        // Second run with the same upstream version edits nothing
        assert!(!apply_update(&path, "1.3.1").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn test_apply_update_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zlib.spec");
        fs::write(&path, ZLIB_SPEC).unwrap();

        apply_update(&path, "1.3.1").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("zlib.spec")]);
    }

    #[test]
    fn test_apply_update_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.spec");
        assert!(apply_update(&path, "1.3.1").is_err());
    }

    #[test]
    fn test_apply_update_failure_leaves_original_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zlib.spec");
        // Invalid UTF-8 makes the read step fail while the file exists
        let original = b"Name: zlib\nVersion: 1.2.13\xff\n".to_vec();
        fs::write(&path, &original).unwrap();

        assert!(apply_update(&path, "1.3.1").is_err());
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_apply_update_unreachable_target_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("specs");
        fs::write(&blocker, "not a directory").unwrap();

        // The target's parent is a regular file, so nothing can be staged
        let path = blocker.join("zlib.spec");
        assert!(apply_update(&path, "1.3.1").is_err());
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("specs")]);
    }
}
