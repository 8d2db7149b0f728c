//! Storage formats and the extensions that select them.

use std::fmt;
use std::path::Path;

/// How a module is stored on disk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Textual source, compiled and run by the VM.
    Source,
    /// Precompiled bytecode container.
    Bytecode,
    /// Platform shared library.
    Native,
}

/// Native library suffix for the target platform.
#[cfg(windows)]
pub const NATIVE_EXTENSION: &str = "dll";
#[cfg(target_os = "macos")]
pub const NATIVE_EXTENSION: &str = "dylib";
#[cfg(not(any(windows, target_os = "macos")))]
pub const NATIVE_EXTENSION: &str = "so";

/// Extensions tried, in order, for a name without a recognized extension.
pub const BARE_EXTENSIONS: [&str; 3] = ["rb", "mrb", NATIVE_EXTENSION];

impl Format {
    /// Select a format from an extension (without the dot).
    ///
    /// `None` means "no extension", which is treated as source.
    pub fn from_extension(ext: Option<&str>) -> Option<Format> {
        match ext {
            None | Some("rb") => Some(Format::Source),
            Some("mrb") => Some(Format::Bytecode),
            Some("so" | "dll" | "dylib") => Some(Format::Native),
            Some(_) => None,
        }
    }

    /// The format of `path`, from its last extension.
    pub fn of(path: &Path) -> Option<Format> {
        let ext = path.extension().map(|ext| ext.to_str().unwrap_or_default());
        Format::from_extension(ext)
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Source => "source",
            Format::Bytecode => "bytecode",
            Format::Native => "native",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The extensions to try when resolving `name`.
///
/// A name whose base already ends in a recognized extension is tried as
/// given (the empty suffix). Anything else gets [`BARE_EXTENSIONS`].
pub fn extension_set(name: &str) -> &'static [&'static str] {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let recognized = base
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && is_recognized(ext));
    if recognized {
        &[""]
    } else {
        &BARE_EXTENSIONS
    }
}

fn is_recognized(ext: &str) -> bool {
    matches!(ext, "rb" | "mrb" | "so" | "dll" | "dylib")
}
