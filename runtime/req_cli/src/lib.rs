//! Req CLI - inspection commands over the loading engine.
//!
//! The binary lives in `main.rs`; the command logic is here so it can be
//! tested without spawning processes.

use std::sync::Once;

pub mod commands;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the log filter. Falls back to `RUST_LOG`.
pub const LOG_VAR: &str = "REQ_LOG";

/// Initialize tracing for the CLI.
///
/// Does nothing unless `REQ_LOG` or `RUST_LOG` is set, e.g.
/// `REQ_LOG=req_load=trace req resolve json`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_VAR).or_else(|_| EnvFilter::try_from_default_env());
        if let Ok(filter) = filter {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
