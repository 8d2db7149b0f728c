//! Command handlers for the `req` CLI.
//!
//! Each submodule renders its report as a value with a `Display` impl; the
//! `print_*`/`show_*` wrappers read the environment, print, and exit on
//! failure.

mod inspect;
mod path;
mod resolve;
mod symbols;

pub use inspect::{inspect_file, inspect_unit, UnitSummary};
pub use path::{print_search_path, render_search_path};
pub use resolve::{resolve_line, resolve_names};
pub use symbols::{show_symbols, symbol_report, Exported, SymbolReport};

use req_load::LoaderConfig;

/// Configuration the way an interpreter started in this environment sees it.
fn env_config() -> LoaderConfig {
    LoaderConfig::from_env()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
