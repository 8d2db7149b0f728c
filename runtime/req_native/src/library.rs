use std::fmt;
use std::path::{Path, PathBuf};

use crate::entry::RawEntry;
use crate::symbol::Symbol;

/// A loaded native library, seen through its exported symbols.
pub trait NativeLibrary {
    /// The path the library was opened from.
    fn path(&self) -> &Path;

    /// Resolve an exported symbol.
    ///
    /// Implementations return the entry typed the way the library exports
    /// it; callers check it against [`Symbol::kind`] before using it.
    fn lookup(&self, symbol: &Symbol) -> Option<RawEntry<'_>>;
}

/// Opens native libraries.
pub trait LibraryOpener {
    /// Open (or re-open) the library at `path`.
    ///
    /// Opening an already-open library must be idempotent.
    fn open(&self, path: &Path) -> Result<Box<dyn NativeLibrary>, OpenError>;
}

/// A library could not be opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenError {
    pub path: PathBuf,
    /// The platform loader's own error text.
    pub detail: String,
}

impl OpenError {
    #[cold]
    pub fn new(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        OpenError {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load {}: {}", self.path.display(), self.detail)
    }
}

impl std::error::Error for OpenError {}
