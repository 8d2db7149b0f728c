//! Precompiled unit loading, from files and from library blobs.

use std::fs;
use std::path::Path;

use req_unit::CompiledUnit;

use crate::errors::{self, LoadError};
use crate::loader::Loader;
use crate::vm::{with_arena, Vm};

/// Read, decode and run a unit file. The unit owns its buffer.
pub(crate) fn load_file(loader: &mut Loader, vm: &mut dyn Vm, path: &Path) -> Result<(), LoadError> {
    let bytes = fs::read(path).map_err(|e| errors::unreadable(path, &e))?;
    let unit = CompiledUnit::decode_owned(&bytes)
        .map_err(|e| errors::deserialize(path.display(), e))?;
    tracing::debug!(path = %path.display(), instrs = unit.len(), "loading bytecode");
    run_unit(loader, vm, unit, path)
}

/// Decode and run a unit embedded in `library`, borrowing its bytes.
pub(crate) fn load_blob(
    loader: &mut Loader,
    vm: &mut dyn Vm,
    bytes: &[u8],
    library: &Path,
) -> Result<(), LoadError> {
    let unit = CompiledUnit::decode(bytes).map_err(|e| errors::deserialize(library.display(), e))?;
    tracing::debug!(library = %library.display(), instrs = unit.len(), "loading embedded unit");
    run_unit(loader, vm, unit, library)
}

fn run_unit(
    loader: &mut Loader,
    vm: &mut dyn Vm,
    mut unit: CompiledUnit<'_>,
    path: &Path,
) -> Result<(), LoadError> {
    if unit.replace_stop_with_return() {
        tracing::trace!(borrowed = unit.is_borrowed(), "patched trailing STOP");
    }
    with_arena(vm, |vm| vm.call_unit(loader, &unit)).map_err(|e| e.raised_in(path))
}
