use std::fs;
use std::path::Path;

use crate::errors::{self, LoadError};
use crate::loader::Loader;
use crate::vm::{SourceText, Vm};

/// Read textual source and run it.
pub(crate) fn load_file(loader: &mut Loader, vm: &mut dyn Vm, path: &Path) -> Result<(), LoadError> {
    let code = fs::read(path).map_err(|e| errors::unreadable(path, &e))?;
    tracing::debug!(path = %path.display(), bytes = code.len(), "loading source");

    vm.set_script_name(path);
    let source = SourceText {
        code: &code,
        filename: path,
    };
    vm.eval_source(loader, &source)
        .map_err(|e| e.raised_in(path))
}
