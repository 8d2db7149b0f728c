//! Require bookkeeping.
//!
//! One insertion-ordered map from canonical path to load state. A path is
//! `Pending` while its load is on the stack and `Complete` once it has run.
//! Completed entries are kept in completion order so the shutdown pass can
//! walk native libraries in the order they were loaded.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::format::Format;

/// Load state of a registered module.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Load started and has not finished (the cycle guard).
    Pending,
    /// Ran to completion.
    Complete,
}

/// A registered module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleRecord {
    pub state: LoadState,
    /// The path the module was found at (before symlinks were followed).
    pub origin: PathBuf,
    pub format: Format,
}

/// Per-interpreter record of what `require` has seen.
#[derive(Clone, Debug, Default)]
pub struct LoadRegistry {
    modules: IndexMap<PathBuf, ModuleRecord, FxBuildHasher>,
}

impl LoadRegistry {
    pub fn new() -> Self {
        LoadRegistry::default()
    }

    pub fn state(&self, path: &Path) -> Option<LoadState> {
        self.modules.get(path).map(|record| record.state)
    }

    /// Pending or Complete.
    pub fn contains(&self, path: &Path) -> bool {
        self.modules.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&ModuleRecord> {
        self.modules.get(path)
    }

    /// Mark `path` as loading.
    ///
    /// Returns `false`, leaving the registry untouched, if `path` is already
    /// registered.
    pub fn begin(&mut self, path: &Path, origin: &Path, format: Format) -> bool {
        if self.modules.contains_key(path) {
            return false;
        }
        tracing::trace!(path = %path.display(), "pending");
        self.modules.insert(
            path.to_path_buf(),
            ModuleRecord {
                state: LoadState::Pending,
                origin: origin.to_path_buf(),
                format,
            },
        );
        true
    }

    /// Mark a pending `path` as loaded, moving it to the end of the order.
    ///
    /// Returns `false` if `path` was not pending.
    pub fn complete(&mut self, path: &Path) -> bool {
        let Some((index, _, record)) = self.modules.get_full_mut(path) else {
            return false;
        };
        if record.state != LoadState::Pending {
            return false;
        }
        record.state = LoadState::Complete;
        let last = self.modules.len() - 1;
        self.modules.move_index(index, last);
        tracing::trace!(path = %path.display(), "complete");
        true
    }

    /// Forget a pending `path` after its load failed.
    ///
    /// Complete entries are never removed.
    pub fn abandon(&mut self, path: &Path) -> bool {
        if self.state(path) != Some(LoadState::Pending) {
            return false;
        }
        tracing::trace!(path = %path.display(), "abandoned");
        self.modules.shift_remove(path).is_some()
    }

    /// Canonical paths of completed modules, in completion order.
    pub fn loaded(&self) -> impl Iterator<Item = &Path> + '_ {
        self.completed().map(|(path, _)| path)
    }

    /// Completed modules, in completion order.
    pub fn completed(&self) -> impl Iterator<Item = (&Path, &ModuleRecord)> + '_ {
        self.modules
            .iter()
            .filter(|(_, record)| record.state == LoadState::Complete)
            .map(|(path, record)| (path.as_path(), record))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
