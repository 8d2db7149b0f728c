//! Req CLI
//!
//! Inspect how modules resolve and what units and libraries contain.

use req_cli::commands::{inspect_file, print_search_path, resolve_names, show_symbols};

fn main() {
    req_cli::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "path" => {
            print_search_path();
        }
        "resolve" => {
            if args.len() < 3 {
                eprintln!("Usage: req resolve <name>...");
                std::process::exit(1);
            }
            if !resolve_names(&args[2..]) {
                std::process::exit(1);
            }
        }
        "inspect" => {
            if args.len() < 3 {
                eprintln!("Usage: req inspect <file.mrb>");
                std::process::exit(1);
            }
            inspect_file(&args[2]);
        }
        "symbols" => {
            if args.len() < 3 {
                eprintln!("Usage: req symbols <library>");
                eprintln!("Example: req symbols /usr/lib/mruby/mruby-io.so");
                std::process::exit(1);
            }
            show_symbols(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("req {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("req - module resolution and loading");
    println!();
    println!("Usage: req <command> [args]");
    println!();
    println!("Commands:");
    println!("  path                  Print the search path, one directory per line");
    println!("  resolve <name>...     Show which file each name resolves to");
    println!("  inspect <file.mrb>    Describe a precompiled unit");
    println!("  symbols <library>     Show the entry points a native library should export");
    println!("  help                  Show this help message");
    println!("  version               Show version information");
    println!();
    println!("Environment:");
    println!("  MRBLIB          Search path list");
    println!("  MRBGEMS_ROOT    Extra search directory");
    println!("  REQ_LOG         Log filter (falls back to RUST_LOG)");
}
