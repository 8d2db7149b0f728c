//! Native library loading and finalization.

use std::path::Path;

use req_native::{module_id, EntryFn, EntryKind, LibraryOpener, RawEntry, Symbol, SymbolSet};

use crate::bytecode;
use crate::errors::{self, LoadError};
use crate::loader::Loader;
use crate::resolve::ResolvedModule;
use crate::vm::{with_arena, Vm};

/// Open a library and run its initializer and embedded unit.
///
/// Symbol names derive from the path the module was found at, so a symlink
/// named after the module works even when its target is versioned.
pub(crate) fn load_library(
    loader: &mut Loader,
    vm: &mut dyn Vm,
    module: &ResolvedModule,
) -> Result<(), LoadError> {
    let path = module.path.as_path();
    let library = loader.opener().open(path).map_err(|e| {
        errors::native_open(e).with_note(format!("requested as {}", module.origin.display()))
    })?;
    let symbols = SymbolSet::for_path(&module.origin);

    let init = library.lookup(&symbols.init);
    let blob = library.lookup(&symbols.blob);
    tracing::debug!(
        path = %path.display(),
        id = %symbols.id,
        init = init.is_some(),
        blob = blob.is_some(),
        "native library opened"
    );

    if init.is_none() && blob.is_none() {
        return Err(errors::missing_entry(
            path,
            symbols.init.name(),
            symbols.blob.name(),
        ));
    }

    if let Some(entry) = init {
        let init_fn = expect_function(&entry, path, &symbols.init)?;
        with_arena(vm, |vm| init_fn.call(vm.native_context()));
    }

    if let Some(entry) = blob {
        let data = entry
            .as_data()
            .ok_or_else(|| errors::entry_kind_mismatch(path, symbols.blob.name(), EntryKind::Blob))?;
        let bytes = data
            .unit_bytes()
            .map_err(|e| errors::deserialize(format!("{} ({})", path.display(), symbols.blob), e))?;
        bytecode::load_blob(loader, vm, bytes, path)?;
    }

    Ok(())
}

/// Call a library's finalizer. A library without one is an error.
pub(crate) fn unload_library(
    opener: &dyn LibraryOpener,
    vm: &mut dyn Vm,
    path: &Path,
    origin: &Path,
) -> Result<(), LoadError> {
    let library = opener.open(path).map_err(errors::native_open)?;
    let symbol = Symbol::finalizer(&module_id(origin));
    let entry = library
        .lookup(&symbol)
        .ok_or_else(|| errors::missing_finalizer(path, symbol.name()))?;
    let final_fn = expect_function(&entry, path, &symbol)?;

    tracing::debug!(path = %path.display(), symbol = %symbol, "calling finalizer");
    final_fn.call(vm.native_context());
    Ok(())
}

fn expect_function(
    entry: &RawEntry<'_>,
    library: &Path,
    symbol: &Symbol,
) -> Result<EntryFn, LoadError> {
    entry
        .as_function()
        .ok_or_else(|| errors::entry_kind_mismatch(library, symbol.name(), symbol.kind()))
}
