//! The `resolve` command.

use req_load::{resolve, LoadError, SearchPath};

use super::env_config;

/// Resolve each name and print where it goes.
///
/// Returns `false` if any name failed.
#[tracing::instrument(level = "debug", skip_all, fields(count = names.len()))]
pub fn resolve_names(names: &[String]) -> bool {
    let search_path = env_config().search_path;
    let mut ok = true;
    for name in names {
        match resolve_line(&search_path, name) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                eprintln!("error: {err}");
                ok = false;
            }
        }
    }
    ok
}

/// `<name> -> <path> (<format>)`.
pub fn resolve_line(search_path: &SearchPath, name: &str) -> Result<String, LoadError> {
    let module = resolve(search_path, name)?;
    let format = module.format()?;
    tracing::debug!(
        name,
        path = %module.path.display(),
        %format,
        "resolved module"
    );
    Ok(format!("{name} -> {} ({format})", module.path.display()))
}
