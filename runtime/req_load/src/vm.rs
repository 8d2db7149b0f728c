//! The seam between the engine and the interpreter it loads code into.

use std::path::Path;

use req_native::NativeContext;
use req_unit::CompiledUnit;

use crate::errors::LoadError;
use crate::loader::Loader;

/// Opaque GC arena position returned by [`Vm::arena_save`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArenaIndex(pub usize);

/// Source text handed to the compiler.
#[derive(Copy, Clone, Debug)]
pub struct SourceText<'a> {
    pub code: &'a [u8],
    /// Filename used in diagnostics.
    pub filename: &'a Path,
}

/// The compiler/VM pair, as the engine sees it.
///
/// Code run by [`Vm::eval_source`] and [`Vm::call_unit`] may call back into
/// the engine through the `loader` it is handed (a module's top level
/// requiring another module). Exceptions raised while running, including
/// errors from such nested calls, are returned as `Err`.
pub trait Vm {
    /// Bind the current script name (`$0`).
    fn set_script_name(&mut self, path: &Path);

    /// Compile and run `source` at the top level.
    fn eval_source(&mut self, loader: &mut Loader, source: &SourceText<'_>)
        -> Result<(), LoadError>;

    /// Wrap `unit` as a zero-argument procedure bound to the top-level
    /// object and call it.
    fn call_unit(&mut self, loader: &mut Loader, unit: &CompiledUnit<'_>)
        -> Result<(), LoadError>;

    fn arena_save(&mut self) -> ArenaIndex;

    fn arena_restore(&mut self, index: ArenaIndex);

    /// Handle passed to native entry points.
    fn native_context(&mut self) -> NativeContext;

    /// Report an exception that `load` swallowed.
    fn report_error(&mut self, error: &LoadError);
}

/// Run `f` with GC temporaries scoped to it.
pub(crate) fn with_arena<T>(vm: &mut dyn Vm, f: impl FnOnce(&mut dyn Vm) -> T) -> T {
    let index = vm.arena_save();
    let result = f(vm);
    vm.arena_restore(index);
    result
}
