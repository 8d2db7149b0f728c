//! The `inspect` command.

use std::fmt;

use req_unit::{CompiledUnit, FrameError, Header, Instr};

/// Describe a unit file.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path))]
pub fn inspect_file(path: &str) {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: cannot read '{path}': {e}");
            std::process::exit(1);
        }
    };
    match inspect_unit(&bytes) {
        Ok(summary) => print!("{summary}"),
        Err(e) => {
            eprintln!("error: {path}: {e}");
            std::process::exit(1);
        }
    }
}

/// What `inspect` reports about a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitSummary {
    pub version: String,
    pub total_len: usize,
    pub instructions: usize,
    pub pool_len: usize,
    /// Bytes after the declared end of the container.
    pub trailing: usize,
    pub ends_in_stop: bool,
}

pub fn inspect_unit(bytes: &[u8]) -> Result<UnitSummary, FrameError> {
    let total_len = Header::parse(bytes)?.total_len;
    let unit = CompiledUnit::decode(bytes)?;
    tracing::debug!(total_len, instructions = unit.len(), "decoded unit");
    Ok(UnitSummary {
        version: String::from_utf8_lossy(&unit.version()).into_owned(),
        total_len,
        instructions: unit.len(),
        pool_len: unit.pool().len(),
        trailing: bytes.len().saturating_sub(total_len),
        ends_in_stop: unit.last() == Some(Instr::stop()),
    })
}

impl fmt::Display for UnitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version:      {}", self.version)?;
        writeln!(f, "size:         {} bytes", self.total_len)?;
        writeln!(f, "instructions: {}", self.instructions)?;
        writeln!(f, "pool:         {} bytes", self.pool_len)?;
        if self.trailing > 0 {
            writeln!(f, "trailing:     {} bytes", self.trailing)?;
        }
        writeln!(
            f,
            "terminator:   {}",
            if self.ends_in_stop { "STOP" } else { "none" }
        )
    }
}
