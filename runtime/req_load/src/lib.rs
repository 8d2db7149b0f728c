//! Req Load - module resolution and loading engine.
//!
//! Given a module name, the engine finds a file on the search path, decides
//! how it is stored, loads it through the matching loader, and remembers what
//! has been required so `require` runs each file once, even across cycles.
//!
//! # Architecture
//!
//! ```text
//! require(name) / load(name)
//!     │
//!     ▼
//! resolve() ──► ResolvedModule { canonical path, origin, format }
//!     │
//!     ▼  (require only)
//! LoadRegistry ── Pending / Complete? ──► return false
//!     │
//!     ▼
//! dispatch by Format
//!     ├── Source   ──► source::load_file   ──► Vm::eval_source
//!     ├── Bytecode ──► bytecode::load_file ──► Vm::call_unit
//!     └── Native   ──► native::load_library
//!                        ├── init entry  ──► EntryFn::call
//!                        └── unit blob   ──► bytecode::load_blob
//! ```
//!
//! The compiler and VM are collaborators behind the [`Vm`] trait. All load
//! state lives in a [`Loader`] owned by one interpreter instance; nested
//! `require` calls from running modules re-enter the same `Loader`.

mod bytecode;
pub mod config;
pub mod errors;
mod format;
pub mod kernel;
mod loader;
mod native;
mod registry;
mod resolve;
mod search_path;
mod source;
mod vm;

pub use config::LoaderConfig;
pub use errors::{LoadError, LoadErrorKind};
pub use format::{extension_set, Format, BARE_EXTENSIONS, NATIVE_EXTENSION};
pub use kernel::ScriptValue;
pub use loader::Loader;
pub use registry::{LoadRegistry, LoadState, ModuleRecord};
pub use resolve::{resolve, ResolvedModule};
pub use search_path::SearchPath;
pub use vm::{ArenaIndex, SourceText, Vm};

// Collaborator types that appear in the `Vm` and `Loader` signatures
pub use req_native::{LibraryOpener, NativeContext, NativeLibrary};
pub use req_unit::CompiledUnit;
