//! The `path` command.

use std::fmt::Write;

use req_load::SearchPath;

use super::env_config;

/// Print the configured search path.
pub fn print_search_path() {
    print!("{}", render_search_path(&env_config().search_path));
}

/// One directory per line, in search order.
pub fn render_search_path(search_path: &SearchPath) -> String {
    let mut out = String::new();
    for dir in search_path.iter() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", dir.display());
    }
    out
}
