//! Source table configuration
//!
//! This module provides:
//! - TOML source table loading (one section per package, nvchecker layout)
//! - SourceDescriptor with discovery method, location and version filters
//! - Version string normalization (prefix strip, from/to substitution)
//!
//! The table is the only durable artifact owned by this tool. It is loaded
//! once per run and never written back.

use crate::error::{CheckError, ConfigError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Discovery method for a package's upstream version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Tags of an arbitrary git repository
    Git,
    /// GitHub releases/tags
    Github,
    /// Repology project feed
    Repology,
    /// Regex applied to a scraped URL
    Regex,
}

impl SourceKind {
    /// Returns the nvchecker source name
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Git => "git",
            SourceKind::Github => "github",
            SourceKind::Repology => "repology",
            SourceKind::Regex => "regex",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One version-source descriptor, as written in the source table
///
/// The field set mirrors the checker's own config format so an entry can be
/// forwarded to it verbatim. Keys this tool does not interpret are kept in
/// `extra` and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Discovery method
    pub source: SourceKind,

    /// Git repository URL (source = "git")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,

    /// GitHub "owner/repo" identifier (source = "github")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,

    /// Repology project name (source = "repology")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repology: Option<String>,

    /// Page URL to scrape (source = "regex")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Tag prefix to strip from the reported version (e.g. "v")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Pick the highest tag instead of the most recent one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_max_tag: Option<bool>,

    /// Tags matching this pattern are ignored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_regex: Option<String>,

    /// Extraction pattern (source = "regex")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Substitution applied to the extracted version: pattern side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_pattern: Option<String>,

    /// Substitution applied to the extracted version: replacement side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_pattern: Option<String>,

    /// Unrecognized keys, forwarded to the checker config untouched
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl SourceDescriptor {
    /// Returns the location string for this descriptor's source kind
    pub fn location(&self) -> Option<&str> {
        match self.source {
            SourceKind::Git => self.git.as_deref(),
            SourceKind::Github => self.github.as_deref(),
            SourceKind::Repology => self.repology.as_deref(),
            SourceKind::Regex => self.url.as_deref(),
        }
    }

    /// Check that the descriptor carries the keys its source kind requires
    fn validate(&self, package: &str) -> Result<(), ConfigError> {
        if self.location().is_none() {
            let key = match self.source {
                SourceKind::Git => "git",
                SourceKind::Github => "github",
                SourceKind::Repology => "repology",
                SourceKind::Regex => "url",
            };
            return Err(ConfigError::invalid_descriptor(
                package,
                format!("source = \"{}\" requires the '{}' key", self.source, key),
            ));
        }
        if self.source == SourceKind::Regex && self.regex.is_none() {
            return Err(ConfigError::invalid_descriptor(
                package,
                "source = \"regex\" requires the 'regex' key",
            ));
        }
        Ok(())
    }

    /// Descriptor as written into the checker's per-package config
    ///
    /// `from_pattern`/`to_pattern` are held back: the substitution is
    /// applied by [`SourceDescriptor::normalize_version`] so it runs
    /// exactly once regardless of checker behavior.
    pub fn checker_entry(&self) -> SourceDescriptor {
        let mut entry = self.clone();
        entry.from_pattern = None;
        entry.to_pattern = None;
        entry
    }

    /// Normalize a raw version string reported by the checker
    ///
    /// Strips the configured tag prefix when present, then applies the
    /// from_pattern/to_pattern substitution.
    pub fn normalize_version(&self, package: &str, raw: &str) -> Result<String, CheckError> {
        let stripped = match self.prefix.as_deref() {
            Some(prefix) => raw.strip_prefix(prefix).unwrap_or(raw),
            None => raw,
        };

        let version = match self.from_pattern.as_deref() {
            Some(pattern) => {
                let re = Regex::new(pattern).map_err(|e| CheckError::BadPattern {
                    package: package.to_string(),
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
                let replacement = self.to_pattern.as_deref().unwrap_or("");
                re.replace_all(stripped, replacement).into_owned()
            }
            None => stripped.to_string(),
        };

        Ok(version)
    }
}

/// The declarative package → source descriptor table
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    packages: BTreeMap<String, SourceDescriptor>,
}

impl SourceTable {
    /// Load the source table from a TOML file
    ///
    /// Missing or malformed files are fatal: no package can be processed
    /// without the table.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Parse the source table from TOML text
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::parse_error(path, e.to_string()))?;

        let mut packages = BTreeMap::new();
        for (name, value) in table {
            // nvchecker holds its own settings in [__config__]
            if name.starts_with("__") {
                continue;
            }
            let descriptor: SourceDescriptor = value.try_into().map_err(|e: toml::de::Error| {
                ConfigError::parse_error(path, format!("[{}]: {}", name, e))
            })?;
            descriptor.validate(&name)?;
            packages.insert(name, descriptor);
        }

        Ok(Self { packages })
    }

    /// Look up a package's descriptor
    pub fn get(&self, package: &str) -> Option<&SourceDescriptor> {
        self.packages.get(package)
    }

    /// All configured package names, in deterministic (sorted) order
    pub fn names(&self) -> Vec<String> {
        self.packages.keys().cloned().collect()
    }

    /// Number of configured packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if no packages are configured
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
