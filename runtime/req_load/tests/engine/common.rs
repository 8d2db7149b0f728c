//! Test support: a scripted VM, fake native libraries, and a temp-dir
//! fixture for laying out module trees.
//!
//! Source files and unit pools are tiny line scripts:
//!
//! ```text
//! print <text>              record an event
//! require <name>            require, record "require <name> -> <bool>"
//! load <name>               load, record "load <name> -> <bool>"
//! raise <Class> <message>   raise a script exception
//! ```

use std::cell::RefCell;
use std::ffi::c_void;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use req_load::errors;
use req_load::{
    ArenaIndex, CompiledUnit, LibraryOpener, LoadError, Loader, NativeContext, NativeLibrary,
    SearchPath, SourceText, Vm,
};
use req_native::{DataEntry, EntryFn, OpenError, RawEntry, Symbol};
use req_unit::Instr;
use rustc_hash::FxHashMap;
use tempfile::TempDir;

/// A VM that runs line scripts and records what happened.
#[derive(Default)]
pub struct ScriptedVm {
    /// Everything scripts and native entry points did, in order.
    pub events: Vec<String>,
    /// `$0` as set before each source load.
    pub script_names: Vec<PathBuf>,
    /// Diagnostic filenames handed to `eval_source`.
    pub filenames: Vec<PathBuf>,
    /// Units handed to `call_unit`, as the VM saw them.
    pub units: Vec<CompiledUnit<'static>>,
    /// Exceptions passed to `report_error`.
    pub reported: Vec<LoadError>,
    arena: Vec<usize>,
    next_arena: usize,
    /// Deepest arena nesting seen.
    pub max_arena_depth: usize,
}

impl ScriptedVm {
    pub fn new() -> Self {
        ScriptedVm::default()
    }

    /// Currently open arena scopes.
    pub fn arena_depth(&self) -> usize {
        self.arena.len()
    }

    fn run(&mut self, loader: &mut Loader, script: &[u8]) -> Result<(), LoadError> {
        let script = String::from_utf8_lossy(script).into_owned();
        for line in script.lines().map(str::trim) {
            let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
            match command {
                "" => {}
                "print" => self.events.push(rest.to_string()),
                "require" => {
                    let ran = loader.require(self, rest)?;
                    self.events.push(format!("require {rest} -> {ran}"));
                }
                "load" => {
                    let ran = loader.load(self, rest)?;
                    self.events.push(format!("load {rest} -> {ran}"));
                }
                "raise" => {
                    let (class, message) = rest.split_once(' ').unwrap_or((rest, ""));
                    return Err(errors::script(class, message));
                }
                other => return Err(errors::script("NoMethodError", format!("undefined {other}"))),
            }
        }
        Ok(())
    }
}

impl Vm for ScriptedVm {
    fn set_script_name(&mut self, path: &Path) {
        self.script_names.push(path.to_path_buf());
    }

    fn eval_source(&mut self, loader: &mut Loader, source: &SourceText<'_>) -> Result<(), LoadError> {
        self.filenames.push(source.filename.to_path_buf());
        self.run(loader, source.code)
    }

    fn call_unit(&mut self, loader: &mut Loader, unit: &CompiledUnit<'_>) -> Result<(), LoadError> {
        self.units.push(unit.clone().into_owned());
        self.run(loader, unit.pool())
    }

    fn arena_save(&mut self) -> ArenaIndex {
        self.next_arena += 1;
        self.arena.push(self.next_arena);
        self.max_arena_depth = self.max_arena_depth.max(self.arena.len());
        ArenaIndex(self.next_arena)
    }

    fn arena_restore(&mut self, index: ArenaIndex) {
        assert_eq!(self.arena.pop(), Some(index.0), "arena restored out of order");
    }

    fn native_context(&mut self) -> NativeContext {
        self.events.push(format!("native context at depth {}", self.arena.len()));
        NativeContext::null()
    }

    fn report_error(&mut self, error: &LoadError) {
        self.reported.push(error.clone());
    }
}

// Native entry points. Each logs to a per-thread list; tests run on their
// own threads.

thread_local! {
    static NATIVE_LOG: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

fn native_log(entry: &'static str) {
    NATIVE_LOG.with(|log| log.borrow_mut().push(entry));
}

/// Drain the entry points called on this thread.
pub fn take_native_log() -> Vec<&'static str> {
    NATIVE_LOG.with(|log| log.borrow_mut().drain(..).collect())
}

pub extern "C" fn init_alpha(_: *mut c_void) {
    native_log("init alpha");
}

pub extern "C" fn final_alpha(_: *mut c_void) {
    native_log("final alpha");
}

pub extern "C" fn init_beta(_: *mut c_void) {
    native_log("init beta");
}

pub extern "C" fn final_beta(_: *mut c_void) {
    native_log("final beta");
}

#[derive(Clone)]
enum FakeEntry {
    Function(extern "C" fn(*mut c_void)),
    Data(Vec<u8>),
}

/// Symbols a fake library exports.
#[derive(Clone, Default)]
pub struct FakeExports {
    symbols: Vec<(String, FakeEntry)>,
}

impl FakeExports {
    pub fn new() -> Self {
        FakeExports::default()
    }

    #[must_use]
    pub fn function(mut self, symbol: &Symbol, f: extern "C" fn(*mut c_void)) -> Self {
        self.symbols
            .push((symbol.name().to_string(), FakeEntry::Function(f)));
        self
    }

    #[must_use]
    pub fn data(mut self, symbol: &Symbol, bytes: Vec<u8>) -> Self {
        self.symbols
            .push((symbol.name().to_string(), FakeEntry::Data(bytes)));
        self
    }
}

struct FakeLibrary {
    path: PathBuf,
    exports: FakeExports,
}

impl NativeLibrary for FakeLibrary {
    fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, symbol: &Symbol) -> Option<RawEntry<'_>> {
        let (_, entry) = self
            .exports
            .symbols
            .iter()
            .find(|(name, _)| name == symbol.name())?;
        Some(match entry {
            FakeEntry::Function(f) => RawEntry::Function(EntryFn::new(*f)),
            FakeEntry::Data(bytes) => RawEntry::Data(DataEntry::from_slice(bytes)),
        })
    }
}

#[derive(Default)]
struct FakeNatives {
    libraries: RefCell<FxHashMap<PathBuf, FakeExports>>,
    opened: RefCell<Vec<PathBuf>>,
}

/// A library opener over registered fake libraries. Clones share state.
#[derive(Clone, Default)]
pub struct FakeOpener {
    natives: Rc<FakeNatives>,
}

impl FakeOpener {
    pub fn new() -> Self {
        FakeOpener::default()
    }

    pub fn register(&self, path: &Path, exports: FakeExports) {
        self.natives
            .libraries
            .borrow_mut()
            .insert(path.to_path_buf(), exports);
    }

    /// Every path opened so far, in order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.natives.opened.borrow().clone()
    }
}

impl LibraryOpener for FakeOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn NativeLibrary>, OpenError> {
        self.natives.opened.borrow_mut().push(path.to_path_buf());
        let exports = self
            .natives
            .libraries
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| OpenError::new(path, "not a fake library"))?;
        Ok(Box::new(FakeLibrary {
            path: path.to_path_buf(),
            exports,
        }))
    }
}

/// Encode a unit whose pool is `script`, ending in `STOP`.
pub fn unit_bytes(script: &str) -> Vec<u8> {
    unit_with(&[Instr::load_nil(1), Instr::stop()], script)
}

pub fn unit_with(code: &[Instr], script: &str) -> Vec<u8> {
    CompiledUnit::new(code, script.as_bytes().to_vec())
        .to_bytes()
        .unwrap()
}

/// A temp directory of modules, a fake opener, and a VM.
pub struct Fixture {
    pub dir: TempDir,
    pub opener: FakeOpener,
    pub vm: ScriptedVm,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            dir: tempfile::tempdir().unwrap(),
            opener: FakeOpener::new(),
            vm: ScriptedVm::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` under the root, creating directories.
    pub fn file(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path.canonicalize().unwrap()
    }

    /// Create a native library file under the root backed by `exports`.
    pub fn native(&self, name: &str, exports: FakeExports) -> PathBuf {
        let path = self.file(name, b"\x7fELF");
        self.opener.register(&path, exports);
        path
    }

    /// A loader searching only the fixture root.
    pub fn loader(&self) -> Loader {
        Loader::with_opener(
            SearchPath::from_dirs([self.root()]),
            Box::new(self.opener.clone()),
        )
    }
}
