//! Platform backend over `libloading`.

use std::mem::ManuallyDrop;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use crate::entry::{DataEntry, EntryFn, RawEntry, RawEntryFn};
use crate::library::{LibraryOpener, NativeLibrary, OpenError};
use crate::symbol::Symbol;

/// Opens libraries with the platform dynamic loader.
///
/// On Unix libraries are opened `RTLD_LAZY | RTLD_GLOBAL` so that one
/// extension can resolve symbols exported by another.
#[derive(Copy, Clone, Debug, Default)]
pub struct DylibOpener;

impl LibraryOpener for DylibOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn NativeLibrary>, OpenError> {
        tracing::debug!(path = %path.display(), "opening native library");
        let library = open_library(path).map_err(|e| OpenError::new(path, e.to_string()))?;
        Ok(Box::new(Dylib {
            path: path.to_path_buf(),
            library: ManuallyDrop::new(library),
        }))
    }
}

#[cfg(unix)]
fn open_library(path: &Path) -> Result<libloading::Library, libloading::Error> {
    use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_LAZY};

    // SAFETY: opening runs the library's static initializers. Loading a
    // module is an explicit request to run its code.
    unsafe { Library::open(Some(path), RTLD_LAZY | RTLD_GLOBAL) }.map(Into::into)
}

#[cfg(not(unix))]
fn open_library(path: &Path) -> Result<libloading::Library, libloading::Error> {
    // SAFETY: as above, running the library's initializers is the point.
    unsafe { libloading::Library::new(path) }
}

/// A library opened by [`DylibOpener`].
///
/// The handle is never closed: the interpreter keeps pointers into the
/// library (methods registered by the initializer, borrowed unit blobs)
/// for the rest of the process, so dropping a `Dylib` leaves it mapped.
pub struct Dylib {
    path: PathBuf,
    library: ManuallyDrop<libloading::Library>,
}

impl NativeLibrary for Dylib {
    fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, symbol: &Symbol) -> Option<RawEntry<'_>> {
        let name = symbol.name().as_bytes();
        if symbol.kind().is_function() {
            // SAFETY: the symbol naming convention fixes the entry ABI to
            // `RawEntryFn`.
            let f = unsafe { self.library.get::<RawEntryFn>(name) }.ok()?;
            // SAFETY: the library stays mapped (never closed).
            Some(RawEntry::Function(unsafe { EntryFn::from_raw(*f) }))
        } else {
            // SAFETY: reading a data symbol's address does not dereference it.
            let data = unsafe { self.library.get::<*const u8>(name) }.ok()?;
            let start = NonNull::new((*data).cast_mut())?;
            // SAFETY: blob symbols start with a unit header that declares the
            // blob's length, and the library stays mapped.
            Some(RawEntry::Data(unsafe { DataEntry::from_raw(start) }))
        }
    }
}

impl std::fmt::Debug for Dylib {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dylib").field("path", &self.path).finish()
    }
}
