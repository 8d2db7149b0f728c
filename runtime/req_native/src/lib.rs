//! Req Native - native extension libraries.
//!
//! A native extension is a platform shared library (`.so`, `.dll`, `.dylib`)
//! that plugs into the interpreter through well-known exported symbols
//! derived from its file name:
//!
//! | symbol | kind | purpose |
//! |---|---|---|
//! | `mrb_<id>_gem_init` | function | register types and methods |
//! | `gem_mrblib_irep_<id>` | data | embedded precompiled unit |
//! | `mrb_<id>_gem_final` | function | release per-module resources |
//!
//! where `<id>` is the base file name without extension, hyphens replaced
//! by underscores (see [`module_id`]).
//!
//! # Capability Interface
//!
//! The engine never touches raw handles. It sees a [`NativeLibrary`] that
//! answers [`NativeLibrary::lookup`] with a typed [`RawEntry`], and a
//! [`LibraryOpener`] that produces libraries. [`DylibOpener`] is the
//! platform implementation; embedders and tests can provide their own.
//!
//! # Safety
//!
//! This is the only crate in the workspace that contains `unsafe` code.
//! Opening a library runs its static initializers, and calling an entry
//! point runs foreign code. Both are confined to [`dylib`] and [`entry`].

mod dylib;
mod entry;
mod library;
mod symbol;

pub use dylib::{Dylib, DylibOpener};
pub use entry::{DataEntry, EntryFn, NativeContext, RawEntry, RawEntryFn};
pub use library::{LibraryOpener, NativeLibrary, OpenError};
pub use symbol::{module_id, EntryKind, Symbol, SymbolSet};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
