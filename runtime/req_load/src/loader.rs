use std::path::Path;

use req_native::{DylibOpener, LibraryOpener};

use crate::config::{LoaderConfig, EAGER_REQUIRE_VAR};
use crate::errors::LoadError;
use crate::format::Format;
use crate::registry::LoadRegistry;
use crate::resolve::{resolve, ResolvedModule};
use crate::search_path::SearchPath;
use crate::vm::Vm;
use crate::{bytecode, native, source};

/// Load state for one interpreter instance.
///
/// Owns the search path, the require registry, and the native library
/// opener. Nested `require` calls from running code re-enter the same
/// `Loader` through the reference the [`Vm`] is handed.
pub struct Loader {
    search_path: SearchPath,
    registry: LoadRegistry,
    opener: Box<dyn LibraryOpener>,
}

impl Loader {
    /// A loader that opens native libraries with the platform loader.
    pub fn new(search_path: SearchPath) -> Self {
        Self::with_opener(search_path, Box::new(DylibOpener))
    }

    pub fn with_opener(search_path: SearchPath, opener: Box<dyn LibraryOpener>) -> Self {
        Loader {
            search_path,
            registry: LoadRegistry::new(),
            opener,
        }
    }

    /// Create a loader from `config` and run its eager requires.
    ///
    /// Any failing eager require aborts startup.
    pub fn boot(config: LoaderConfig, vm: &mut dyn Vm) -> Result<Self, LoadError> {
        let mut loader = Loader::new(config.search_path);
        loader.require_all(vm, &config.eager_requires)?;
        Ok(loader)
    }

    /// Require each name in order, stopping at the first failure.
    pub fn require_all<S: AsRef<str>>(&mut self, vm: &mut dyn Vm, names: &[S]) -> Result<(), LoadError> {
        for name in names {
            self.require(vm, name.as_ref())
                .map_err(|e| e.with_note(format!("required from {EAGER_REQUIRE_VAR}")))?;
        }
        Ok(())
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn search_path_mut(&mut self) -> &mut SearchPath {
        &mut self.search_path
    }

    pub fn registry(&self) -> &LoadRegistry {
        &self.registry
    }

    /// Canonical paths of required modules, in completion order (`$"`).
    pub fn loaded_features(&self) -> impl Iterator<Item = &Path> + '_ {
        self.registry.loaded()
    }

    /// Resolve `name` against the current search path.
    pub fn resolve(&self, name: &str) -> Result<ResolvedModule, LoadError> {
        resolve(&self.search_path, name)
    }

    pub(crate) fn opener(&self) -> &dyn LibraryOpener {
        self.opener.as_ref()
    }

    /// Resolve and run `name`, whether or not it ran before.
    ///
    /// Returns `Ok(false)` when the module raised: the exception has been
    /// passed to [`Vm::report_error`]. Loader failures (not found, bad
    /// format, undecodable unit, native errors) are returned.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn load(&mut self, vm: &mut dyn Vm, name: &str) -> Result<bool, LoadError> {
        let module = self.resolve(name)?;
        match self.dispatch(vm, &module) {
            Ok(()) => Ok(true),
            Err(err) if err.raised_in_script => {
                tracing::debug!(error = %err.message, "load raised");
                vm.report_error(&err);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve and run `name` unless it is already loaded or loading.
    ///
    /// Returns whether the module ran. A failed require leaves no trace in
    /// the registry, so it can be retried.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
    pub fn require(&mut self, vm: &mut dyn Vm, name: &str) -> Result<bool, LoadError> {
        let module = self.resolve(name)?;
        if let Some(state) = self.registry.state(&module.path) {
            tracing::debug!(path = %module.path.display(), ?state, "already required");
            return Ok(false);
        }

        let format = module.format()?;
        self.registry.begin(&module.path, &module.origin, format);
        if let Err(err) = self.dispatch(vm, &module) {
            self.registry.abandon(&module.path);
            return Err(err);
        }
        self.registry.complete(&module.path);
        Ok(true)
    }

    fn dispatch(&mut self, vm: &mut dyn Vm, module: &ResolvedModule) -> Result<(), LoadError> {
        match module.format()? {
            Format::Source => source::load_file(self, vm, &module.path),
            Format::Bytecode => bytecode::load_file(self, vm, &module.path),
            Format::Native => native::load_library(self, vm, module),
        }
    }

    /// Call the finalizer of every required native library, in the order
    /// they finished loading.
    ///
    /// Stops at the first library without a finalizer.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn shutdown(self, vm: &mut dyn Vm) -> Result<(), LoadError> {
        for (path, record) in self.registry.completed() {
            if record.format == Format::Native {
                native::unload_library(self.opener(), vm, path, &record.origin)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("search_path", &self.search_path)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
