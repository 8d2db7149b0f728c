//! Req Unit - precompiled unit container framing.
//!
//! A precompiled unit is a whole top-level program serialized by the
//! compiler. This crate owns the container framing only: the fixed header,
//! the instruction stream, and the boundary of the literal pool. The pool
//! itself is opaque here and is interpreted by the VM.
//!
//! # Layout
//!
//! ```text
//! 0      4      8            12            16
//! ┌──────┬──────┬────────────┬─────────────┬──────────────┬──────────────┐
//! │ RQBC │ 0001 │ total (BE) │ ninstr (BE) │ instr × n    │ literal pool │
//! └──────┴──────┴────────────┴─────────────┴──────────────┴──────────────┘
//! ```
//!
//! The total size lives in the header so a unit embedded in a native library
//! can be bounded from its start address alone.
//!
//! # Ownership
//!
//! [`CompiledUnit`] stores its buffers as `Cow`. Units decoded from a file
//! own their bytes; units decoded from a library blob borrow read-only
//! memory, and [`CompiledUnit::replace_stop_with_return`] copies before it
//! writes.

mod container;
mod error;
pub mod opcode;

pub use container::{CompiledUnit, Header, HEADER_LEN, INSTR_LEN, MAGIC, VERSION};
pub use error::FrameError;
pub use opcode::Instr;

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
