//! Instruction words.
//!
//! Only the handful of opcodes the loader has to recognize or emit are
//! named here; everything else is carried through as raw words.
//!
//! ```text
//!  31        23        14      7      0
//! ┌─────────┬─────────┬───────┬───────┐
//! │ A (9)   │ B (9)   │ C (7) │ op (7)│
//! └─────────┴─────────┴───────┴───────┘
//! ```

use std::fmt;

/// `R(A) := nil`
pub const LOADNIL: u8 = 0x05;
/// `return R(A)` with return kind B.
pub const RETURN: u8 = 0x29;
/// Stop the interpreter loop. Terminates whole-program units.
pub const STOP: u8 = 0x4a;

/// Normal return (as opposed to `break` or method-level returns).
pub const R_NORMAL: u16 = 0;

const OP_MASK: u32 = 0x7f;
const A_SHIFT: u32 = 23;
const B_SHIFT: u32 = 14;
const REG_MASK: u32 = 0x1ff;

/// A single 32-bit instruction word.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Instr(u32);

impl Instr {
    #[inline]
    pub const fn from_word(word: u32) -> Self {
        Instr(word)
    }

    #[inline]
    pub const fn word(self) -> u32 {
        self.0
    }

    /// Encode an instruction with a single `A` operand.
    #[inline]
    #[allow(clippy::cast_lossless, reason = "`From` is not callable in const fn")]
    pub const fn op_a(op: u8, a: u16) -> Self {
        Instr((op as u32 & OP_MASK) | ((a as u32 & REG_MASK) << A_SHIFT))
    }

    /// Encode an instruction with `A` and `B` operands.
    #[inline]
    #[allow(clippy::cast_lossless, reason = "`From` is not callable in const fn")]
    pub const fn op_ab(op: u8, a: u16, b: u16) -> Self {
        Instr(Self::op_a(op, a).0 | ((b as u32 & REG_MASK) << B_SHIFT))
    }

    pub const fn stop() -> Self {
        Self::op_a(STOP, 0)
    }

    pub const fn load_nil(reg: u16) -> Self {
        Self::op_a(LOADNIL, reg)
    }

    pub const fn ret(reg: u16, kind: u16) -> Self {
        Self::op_ab(RETURN, reg, kind)
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "masked to 7 bits before the cast"
    )]
    pub const fn opcode(self) -> u8 {
        (self.0 & OP_MASK) as u8
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "masked to 9 bits before the cast"
    )]
    pub const fn a(self) -> u16 {
        ((self.0 >> A_SHIFT) & REG_MASK) as u16
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "masked to 9 bits before the cast"
    )]
    pub const fn b(self) -> u16 {
        ((self.0 >> B_SHIFT) & REG_MASK) as u16
    }

    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Instr(u32::from_be_bytes(bytes))
    }
}

impl fmt::Debug for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode() {
            LOADNIL => write!(f, "LOADNIL r{}", self.a()),
            RETURN => write!(f, "RETURN r{} {}", self.a(), self.b()),
            STOP => write!(f, "STOP"),
            op => write!(f, "OP_{op:#04x} {:#010x}", self.0),
        }
    }
}
