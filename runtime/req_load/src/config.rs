//! Loader configuration.
//!
//! The engine reads three environment variables once, at startup:
//!
//! | variable | effect |
//! |---|---|
//! | `MRBLIB` | path list appended to the search path |
//! | `MRBGEMS_ROOT` | one more directory (falls back to the build-time value) |
//! | `MRUBY_REQUIRE` | comma-separated names required right after boot |
//!
//! Embedders that do not want the process environment build a
//! [`LoaderConfig`] directly.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::search_path::SearchPath;

pub const LIB_PATH_VAR: &str = "MRBLIB";
pub const GEMS_ROOT_VAR: &str = "MRBGEMS_ROOT";
pub const EAGER_REQUIRE_VAR: &str = "MRUBY_REQUIRE";

/// Separator between entries of `MRBLIB`.
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// `MRBGEMS_ROOT` as seen when this crate was compiled.
const BUILD_GEMS_ROOT: Option<&str> = option_env!("MRBGEMS_ROOT");

/// Startup configuration for a [`crate::Loader`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    pub search_path: SearchPath,
    /// Names required, in order, by [`crate::Loader::boot`].
    pub eager_requires: Vec<String>,
}

impl LoaderConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var_os(name))
    }

    /// Read the configuration through `lookup`.
    ///
    /// The search path is the `MRBLIB` entries followed by the gems root.
    /// Path values are taken as raw OS strings; require names must be UTF-8.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut search_path: SearchPath = lookup(LIB_PATH_VAR)
            .map(|list| split_path_list(&list))
            .unwrap_or_default()
            .into_iter()
            .collect();

        match lookup(GEMS_ROOT_VAR) {
            Some(root) => search_path.push(root),
            None => {
                if let Some(root) = BUILD_GEMS_ROOT {
                    search_path.push(root);
                }
            }
        }

        let eager_requires = match lookup(EAGER_REQUIRE_VAR) {
            Some(list) => match list.to_str() {
                Some(list) => split_require_list(list),
                None => {
                    tracing::warn!(
                        var = EAGER_REQUIRE_VAR,
                        value = %list.to_string_lossy(),
                        "ignoring non-UTF-8 require list"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        tracing::debug!(
            dirs = search_path.len(),
            eager = eager_requires.len(),
            "loader configuration read"
        );

        LoaderConfig {
            search_path,
            eager_requires,
        }
    }

    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_path.push(dir);
        self
    }

    #[must_use]
    pub fn with_eager_require(mut self, name: impl Into<String>) -> Self {
        self.eager_requires.push(name.into());
        self
    }
}

/// Split a `MRBLIB`-style list on [`PATH_LIST_SEPARATOR`]. Empty entries
/// are skipped. Entries need not be UTF-8.
pub fn split_path_list(list: impl AsRef<OsStr>) -> Vec<PathBuf> {
    std::env::split_paths(list.as_ref())
        .filter(|entry| !entry.as_os_str().is_empty())
        .collect()
}

fn split_require_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
