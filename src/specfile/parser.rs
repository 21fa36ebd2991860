//! Spec file field extraction

use crate::error::SpecError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Version:[ \t]*(\S.*?)[ \t]*$").unwrap());

static RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Release:[ \t]*(\S.*?)[ \t]*$").unwrap());

/// Fields extracted from a spec file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFields {
    /// Value of the first Version: field
    pub version: String,
    /// Value of the first Release: field, when present
    pub release: Option<String>,
}

/// Extract Version and Release from spec file content
///
/// The first occurrence of each field wins. A macro-valued version such as
/// `%{upstream_version}` is accepted verbatim; the comparator decides what
/// to make of it.
pub fn parse_spec(content: &str, path: &Path) -> Result<SpecFields, SpecError> {
    let version = VERSION_RE
        .captures(content)
        .map(|c| c[1].to_string())
        .ok_or_else(|| SpecError::parse_error(path, "no Version field"))?;

    let release = RELEASE_RE.captures(content).map(|c| c[1].to_string());

    Ok(SpecFields { version, release })
}

/// Read a spec file's content
pub fn read_spec(path: &Path) -> Result<String, SpecError> {
    std::fs::read_to_string(path).map_err(|e| SpecError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Locate the spec file for a package under the specs directory
///
/// Checks `<dir>/<pkg>/<pkg>.spec` (one checkout per package) first, then
/// the flat layout `<dir>/<pkg>.spec`.
pub fn resolve_spec_path(specs_dir: &Path, package: &str) -> Option<PathBuf> {
    let nested = specs_dir.join(package).join(format!("{}.spec", package));
    if nested.is_file() {
        return Some(nested);
    }
    let flat = specs_dir.join(format!("{}.spec", package));
    if flat.is_file() {
        return Some(flat);
    }
    None
}
