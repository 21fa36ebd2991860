//! RPM spec file access
//!
//! This module provides:
//! - Version/Release field extraction from spec files
//! - Atomic rewrite of the Version field with a Release reset
//! - Spec file path resolution under the specs directory

mod parser;
mod writer;

pub use parser::{parse_spec, read_spec, resolve_spec_path, SpecFields};
pub use writer::{apply_update, render_update, reset_release};
