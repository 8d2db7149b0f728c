//! Load errors.
//!
//! `LoadErrorKind` carries structured data for each failure; `LoadError`
//! adds the rendered message and context notes. Construct errors through the
//! factory functions below rather than by hand so the message and kind stay
//! in sync.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use req_native::{EntryKind, OpenError};
use req_unit::FrameError;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadErrorKind {
    // Resolution
    NotFound {
        name: String,
    },
    /// Found during resolution but could not be read afterwards.
    Unreadable {
        path: PathBuf,
        reason: String,
    },

    // Format
    InvalidExtension {
        path: PathBuf,
    },

    // Native
    NativeOpen {
        path: PathBuf,
        detail: String,
    },
    MissingEntry {
        library: PathBuf,
        init: String,
        blob: String,
    },
    EntryKindMismatch {
        library: PathBuf,
        symbol: String,
        expected: EntryKind,
    },
    MissingFinalizer {
        library: PathBuf,
        symbol: String,
    },

    // Bytecode
    Deserialize {
        origin: String,
        error: FrameError,
    },

    // Arguments
    ArgumentType {
        inspect: String,
    },

    /// An exception raised by the VM while running code.
    Script {
        class: String,
        message: String,
    },
}

impl LoadErrorKind {
    /// The script-level exception class this error surfaces as.
    pub fn class_name(&self) -> &str {
        match self {
            Self::ArgumentType { .. } => "TypeError",
            Self::NativeOpen { .. } => "RuntimeError",
            Self::Script { class, .. } => class.as_str(),
            _ => "ScriptError",
        }
    }
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "cannot load such file -- {name}"),
            Self::Unreadable { path, reason } => {
                write!(f, "cannot load such file -- {} ({reason})", path.display())
            }
            Self::InvalidExtension { path } => {
                write!(f, "Filepath '{}' has invalid extension.", path.display())
            }
            Self::NativeOpen { path, detail } => {
                write!(f, "failed to load {}: {detail}", path.display())
            }
            Self::MissingEntry {
                library,
                init,
                blob,
            } => write!(
                f,
                "failed to attach {init} or {blob} in library {}",
                library.display()
            ),
            Self::EntryKindMismatch {
                library,
                symbol,
                expected,
            } => write!(
                f,
                "symbol {symbol} in library {} is not a {expected}",
                library.display()
            ),
            Self::MissingFinalizer { library, symbol } => {
                write!(f, "can't attach {symbol} in library {}", library.display())
            }
            Self::Deserialize { origin, error } => {
                write!(f, "failed to read unit from {origin}: {error}")
            }
            Self::ArgumentType { inspect } => write!(f, "can't convert {inspect} into String"),
            Self::Script { class, message } => write!(f, "{message} ({class})"),
        }
    }
}

/// A load failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    /// Rendered from `kind`.
    pub message: String,
    /// Raised while a loaded unit was executing, as opposed to by the
    /// loader itself before or around execution.
    pub raised_in_script: bool,
    /// Context, innermost first (e.g. which files were being loaded).
    pub notes: Vec<String>,
}

impl LoadError {
    fn from_kind(kind: LoadErrorKind) -> Self {
        let message = kind.to_string();
        LoadError {
            kind,
            message,
            raised_in_script: false,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Mark this error as raised by code running from `path`.
    #[must_use]
    pub(crate) fn raised_in(mut self, path: &Path) -> Self {
        self.raised_in_script = true;
        self.with_note(format!("while loading {}", path.display()))
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

// Resolution Errors

#[cold]
pub fn not_found(name: &str) -> LoadError {
    LoadError::from_kind(LoadErrorKind::NotFound {
        name: name.to_string(),
    })
}

#[cold]
pub fn unreadable(path: &Path, error: &io::Error) -> LoadError {
    LoadError::from_kind(LoadErrorKind::Unreadable {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })
}

// Format Errors

#[cold]
pub fn invalid_extension(path: &Path) -> LoadError {
    LoadError::from_kind(LoadErrorKind::InvalidExtension {
        path: path.to_path_buf(),
    })
}

// Native Errors

#[cold]
pub fn native_open(error: OpenError) -> LoadError {
    LoadError::from_kind(LoadErrorKind::NativeOpen {
        path: error.path,
        detail: error.detail,
    })
}

#[cold]
pub fn missing_entry(library: &Path, init: &str, blob: &str) -> LoadError {
    LoadError::from_kind(LoadErrorKind::MissingEntry {
        library: library.to_path_buf(),
        init: init.to_string(),
        blob: blob.to_string(),
    })
}

#[cold]
pub fn entry_kind_mismatch(library: &Path, symbol: &str, expected: EntryKind) -> LoadError {
    LoadError::from_kind(LoadErrorKind::EntryKindMismatch {
        library: library.to_path_buf(),
        symbol: symbol.to_string(),
        expected,
    })
}

#[cold]
pub fn missing_finalizer(library: &Path, symbol: &str) -> LoadError {
    LoadError::from_kind(LoadErrorKind::MissingFinalizer {
        library: library.to_path_buf(),
        symbol: symbol.to_string(),
    })
}

// Bytecode Errors

#[cold]
pub fn deserialize(origin: impl fmt::Display, error: FrameError) -> LoadError {
    LoadError::from_kind(LoadErrorKind::Deserialize {
        origin: origin.to_string(),
        error,
    })
}

// Argument Errors

#[cold]
pub fn argument_type(inspect: &str) -> LoadError {
    LoadError::from_kind(LoadErrorKind::ArgumentType {
        inspect: inspect.to_string(),
    })
}

// Script Errors

/// An exception raised by the VM. VM implementations return these from
/// [`crate::Vm::eval_source`] and [`crate::Vm::call_unit`].
#[cold]
pub fn script(class: &str, message: impl Into<String>) -> LoadError {
    LoadError::from_kind(LoadErrorKind::Script {
        class: class.to_string(),
        message: message.into(),
    })
}
