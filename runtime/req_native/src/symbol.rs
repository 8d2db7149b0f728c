use std::fmt;
use std::path::Path;

/// What an exported symbol is expected to be.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// `void (*)(context)` called once when the library is loaded.
    Init,
    /// Start of an embedded precompiled unit.
    Blob,
    /// `void (*)(context)` called once at interpreter shutdown.
    Final,
}

impl EntryKind {
    pub fn is_function(self) -> bool {
        matches!(self, EntryKind::Init | EntryKind::Final)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::Init => "initializer",
            EntryKind::Blob => "unit blob",
            EntryKind::Final => "finalizer",
        })
    }
}

/// An exported symbol name together with the kind of entry it must be.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
    kind: EntryKind,
}

impl Symbol {
    pub fn init(id: &str) -> Self {
        Symbol {
            name: format!("mrb_{id}_gem_init"),
            kind: EntryKind::Init,
        }
    }

    pub fn blob(id: &str) -> Self {
        Symbol {
            name: format!("gem_mrblib_irep_{id}"),
            kind: EntryKind::Blob,
        }
    }

    pub fn finalizer(id: &str) -> Self {
        Symbol {
            name: format!("mrb_{id}_gem_final"),
            kind: EntryKind::Final,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// All symbols a library at a given path is expected to export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolSet {
    pub id: String,
    pub init: Symbol,
    pub blob: Symbol,
    pub finalizer: Symbol,
}

impl SymbolSet {
    pub fn for_path(path: &Path) -> Self {
        let id = module_id(path);
        SymbolSet {
            init: Symbol::init(&id),
            blob: Symbol::blob(&id),
            finalizer: Symbol::finalizer(&id),
            id,
        }
    }
}

/// Derive the symbol identifier for a library path.
///
/// Directory components (either separator) and the last extension are
/// stripped, then every `-` becomes `_`: library file names conventionally
/// use hyphens, C identifiers cannot.
///
/// ```
/// use std::path::Path;
/// assert_eq!(req_native::module_id(Path::new("/gems/mruby-io.so")), "mruby_io");
/// ```
pub fn module_id(path: &Path) -> String {
    let path = path.to_string_lossy();
    let base = path.rsplit(['/', '\\']).next().unwrap_or(&path);
    let stem = base.rfind('.').map_or(base, |dot| &base[..dot]);
    stem.replace('-', "_")
}
