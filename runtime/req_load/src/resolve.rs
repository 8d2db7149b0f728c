//! Module name resolution.
//!
//! Maps a requested name to an existing file: absolute names are checked
//! as given, everything else is tried against each search directory and
//! each candidate extension, in that nesting order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{self, LoadError};
use crate::format::{extension_set, Format};
use crate::search_path::SearchPath;

/// A module name resolved to a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Canonical path: the bookkeeping identity.
    pub path: PathBuf,
    /// The candidate as it was found, before symlinks were followed.
    pub origin: PathBuf,
    /// Format selected by the origin's extension.
    pub format: Option<Format>,
}

impl ResolvedModule {
    fn new(path: PathBuf, origin: PathBuf) -> Self {
        let format = Format::of(&origin);
        ResolvedModule {
            path,
            origin,
            format,
        }
    }

    /// The format, or an invalid-extension error.
    pub fn format(&self) -> Result<Format, LoadError> {
        self.format
            .ok_or_else(|| errors::invalid_extension(&self.origin))
    }
}

/// Resolve `name` against `search_path`.
///
/// Names starting with `.` are looked up relative to the working directory
/// only. The first existing file wins.
#[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
pub fn resolve(search_path: &SearchPath, name: &str) -> Result<ResolvedModule, LoadError> {
    if is_absolute_name(name) {
        let origin = PathBuf::from(name);
        tracing::trace!(candidate = %origin.display(), "probing absolute name");
        return probe(&origin)
            .map(|path| ResolvedModule::new(path, origin))
            .ok_or_else(|| errors::not_found(name));
    }

    let dirs: Vec<&Path> = if name.starts_with('.') {
        vec![Path::new(".")]
    } else {
        search_path.iter().collect()
    };

    let extensions = extension_set(name);
    for dir in dirs {
        for ext in extensions {
            let origin = dir.join(candidate_name(name, ext));
            tracing::trace!(candidate = %origin.display(), "probing");
            if let Some(path) = probe(&origin) {
                tracing::debug!(path = %path.display(), "resolved");
                return Ok(ResolvedModule::new(path, origin));
            }
        }
    }

    Err(errors::not_found(name))
}

fn candidate_name(name: &str, ext: &str) -> String {
    if ext.is_empty() {
        name.to_string()
    } else {
        format!("{name}.{ext}")
    }
}

/// Canonicalize `candidate` if it names an existing regular file.
fn probe(candidate: &Path) -> Option<PathBuf> {
    let path = fs::canonicalize(candidate).ok()?;
    path.is_file().then_some(path)
}

#[cfg(windows)]
fn is_absolute_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    name.starts_with(['/', '\\'])
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

#[cfg(not(windows))]
fn is_absolute_name(name: &str) -> bool {
    name.starts_with('/')
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
