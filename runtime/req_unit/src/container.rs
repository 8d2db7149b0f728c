use std::borrow::Cow;

use crate::error::FrameError;
use crate::opcode::{Instr, R_NORMAL};

pub const MAGIC: [u8; 4] = *b"RQBC";
pub const VERSION: [u8; 4] = *b"0001";
/// Fixed header: magic, version, total size, instruction count.
pub const HEADER_LEN: usize = 16;
/// Bytes per instruction word.
pub const INSTR_LEN: usize = 4;

/// The fixed-size container header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: [u8; 4],
    /// Whole container size in bytes, header included.
    pub total_len: usize,
    pub instr_count: usize,
}

impl Header {
    /// Parse and validate the header at the start of `bytes`.
    ///
    /// Only the first [`HEADER_LEN`] bytes are read, so this is safe to call
    /// on a header-sized window before the full extent of a blob is known.
    pub fn parse(bytes: &[u8]) -> Result<Header, FrameError> {
        let Some(header) = bytes.get(..HEADER_LEN) else {
            return Err(FrameError::Truncated {
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        };

        let magic = field(header, 0);
        if magic != MAGIC {
            return Err(FrameError::BadMagic { found: magic });
        }
        let version = field(header, 4);
        if version != VERSION {
            return Err(FrameError::UnsupportedVersion { found: version });
        }

        let total_len = u32::from_be_bytes(field(header, 8)) as usize;
        if total_len < HEADER_LEN {
            return Err(FrameError::Undersized {
                declared: total_len,
            });
        }
        let instr_count = u32::from_be_bytes(field(header, 12)) as usize;

        Ok(Header {
            version,
            total_len,
            instr_count,
        })
    }

    /// End offset of the instruction section, if it fits the container.
    fn code_end(&self) -> Result<usize, FrameError> {
        self.instr_count
            .checked_mul(INSTR_LEN)
            .and_then(|len| len.checked_add(HEADER_LEN))
            .filter(|&end| end <= self.total_len)
            .ok_or(FrameError::CodeOverrun {
                count: self.instr_count,
                declared: self.total_len,
            })
    }
}

/// Four header bytes starting at `at`. Callers pass a full header slice.
fn field(header: &[u8], at: usize) -> [u8; 4] {
    let mut out = [0; 4];
    out.copy_from_slice(&header[at..at + 4]);
    out
}

/// A decoded precompiled unit.
///
/// The instruction buffer is either owned (decoded from a file) or borrowed
/// from read-only memory (a blob exported by a native library).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledUnit<'a> {
    version: [u8; 4],
    code: Cow<'a, [u8]>,
    pool: Cow<'a, [u8]>,
}

impl<'a> CompiledUnit<'a> {
    /// Assemble a unit from instructions and a literal pool.
    pub fn new(code: &[Instr], pool: Vec<u8>) -> CompiledUnit<'static> {
        let code = code.iter().flat_map(|instr| instr.to_be_bytes()).collect();
        CompiledUnit {
            version: VERSION,
            code: Cow::Owned(code),
            pool: Cow::Owned(pool),
        }
    }

    /// Decode a container, borrowing from `bytes`.
    ///
    /// Trailing bytes past the declared total size are ignored, which lets a
    /// caller hand over a window that is larger than the unit.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, FrameError> {
        let header = Header::parse(bytes)?;
        if bytes.len() < header.total_len {
            return Err(FrameError::Truncated {
                needed: header.total_len,
                available: bytes.len(),
            });
        }
        let code_end = header.code_end()?;
        if header.instr_count == 0 {
            return Err(FrameError::EmptyCode);
        }

        Ok(CompiledUnit {
            version: header.version,
            code: Cow::Borrowed(&bytes[HEADER_LEN..code_end]),
            pool: Cow::Borrowed(&bytes[code_end..header.total_len]),
        })
    }

    /// Decode a container from a buffer the caller hands over.
    pub fn decode_owned(bytes: &[u8]) -> Result<CompiledUnit<'static>, FrameError> {
        CompiledUnit::decode(bytes).map(CompiledUnit::into_owned)
    }

    pub fn into_owned(self) -> CompiledUnit<'static> {
        CompiledUnit {
            version: self.version,
            code: Cow::Owned(self.code.into_owned()),
            pool: Cow::Owned(self.pool.into_owned()),
        }
    }

    /// Whether the instruction buffer still aliases memory the unit does not own.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.code, Cow::Borrowed(_))
    }

    pub fn version(&self) -> [u8; 4] {
        self.version
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len() / INSTR_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn instr(&self, index: usize) -> Option<Instr> {
        let start = index.checked_mul(INSTR_LEN)?;
        let word = self.code.get(start..start.checked_add(INSTR_LEN)?)?;
        Some(Instr::from_be_bytes(field(word, 0)))
    }

    pub fn instructions(&self) -> impl Iterator<Item = Instr> + '_ {
        self.code
            .chunks_exact(INSTR_LEN)
            .map(|word| Instr::from_be_bytes(field(word, 0)))
    }

    pub fn last(&self) -> Option<Instr> {
        self.len().checked_sub(1).and_then(|i| self.instr(i))
    }

    pub fn pool(&self) -> &[u8] {
        &self.pool
    }

    /// Turn a whole-program unit into a value-returning procedure body.
    ///
    /// A unit ending in `STOP` halts the interpreter loop; before it can be
    /// called like a procedure that trailing instruction becomes
    /// `LOADNIL r0; RETURN r0`. A borrowed buffer is copied first. Units
    /// that do not end in `STOP` are left alone.
    ///
    /// Returns whether the unit was patched.
    pub fn replace_stop_with_return(&mut self) -> bool {
        if self.last() != Some(Instr::stop()) {
            return false;
        }

        let code = self.code.to_mut();
        code.truncate(code.len() - INSTR_LEN);
        code.extend_from_slice(&Instr::load_nil(0).to_be_bytes());
        code.extend_from_slice(&Instr::ret(0, R_NORMAL).to_be_bytes());
        true
    }

    /// Serialize back into a container.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
        let total_len = HEADER_LEN + self.code.len() + self.pool.len();
        let too_large = || FrameError::TooLarge { len: total_len };
        let total = u32::try_from(total_len).map_err(|_| too_large())?;
        let count = u32::try_from(self.len()).map_err(|_| too_large())?;

        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.version);
        out.extend_from_slice(&total.to_be_bytes());
        out.extend_from_slice(&count.to_be_bytes());
        out.extend_from_slice(&self.code);
        out.extend_from_slice(&self.pool);
        Ok(out)
    }
}
