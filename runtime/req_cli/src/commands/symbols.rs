//! The `symbols` command.

use std::fmt;
use std::path::{Path, PathBuf};

use req_native::{DylibOpener, EntryKind, LibraryOpener, RawEntry, SymbolSet};

/// Show the expected entry points of a library and which it exports.
pub fn show_symbols(path: &str) {
    print!("{}", symbol_report(Path::new(path), &DylibOpener));
}

/// Whether each expected symbol is exported, or why the library could not
/// be checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolReport {
    pub path: PathBuf,
    pub symbols: SymbolSet,
    /// `None` if the file does not exist.
    pub exports: Option<Result<Vec<Exported>, String>>,
}

/// One expected symbol and what the library has under that name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exported {
    pub name: String,
    pub expected: EntryKind,
    /// `Some(true)` for a function, `Some(false)` for data.
    pub found: Option<bool>,
}

pub fn symbol_report(path: &Path, opener: &dyn LibraryOpener) -> SymbolReport {
    let symbols = SymbolSet::for_path(path);
    let exports = path.exists().then(|| -> Result<Vec<Exported>, String> {
        let library = opener.open(path).map_err(|e| e.detail)?;
        Ok([&symbols.init, &symbols.blob, &symbols.finalizer]
            .into_iter()
            .map(|symbol| Exported {
                name: symbol.name().to_string(),
                expected: symbol.kind(),
                found: library
                    .lookup(symbol)
                    .map(|entry| matches!(entry, RawEntry::Function(_))),
            })
            .collect())
    });
    SymbolReport {
        path: path.to_path_buf(),
        symbols,
        exports,
    }
}

impl fmt::Display for SymbolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "library: {}", self.path.display())?;
        writeln!(f, "id:      {}", self.symbols.id)?;
        match &self.exports {
            Some(Ok(exports)) => {
                for export in exports {
                    let status = match export.found {
                        None => "missing",
                        Some(true) => "function",
                        Some(false) => "data",
                    };
                    let expected = export.expected.to_string();
                    writeln!(f, "  {:<40} {expected:<12} {status}", export.name)?;
                }
            }
            unchecked => {
                for symbol in [&self.symbols.init, &self.symbols.blob, &self.symbols.finalizer] {
                    writeln!(f, "  {:<40} {}", symbol.name(), symbol.kind())?;
                }
                if let Some(Err(detail)) = unchecked {
                    writeln!(f, "cannot open library: {detail}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
