use std::fmt;

/// Malformed or unrepresentable unit container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than the fixed header (or the declared size) needs.
    Truncated { needed: usize, available: usize },
    BadMagic { found: [u8; 4] },
    UnsupportedVersion { found: [u8; 4] },
    /// Declared total size cannot even hold the header.
    Undersized { declared: usize },
    /// Instruction section runs past the declared container size.
    CodeOverrun { count: usize, declared: usize },
    /// A unit must contain at least one instruction.
    EmptyCode,
    /// Encoding a unit whose size does not fit the 32-bit size field.
    TooLarge { len: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { needed, available } => {
                write!(f, "truncated unit: need {needed} bytes, have {available}")
            }
            Self::BadMagic { found } => {
                write!(f, "bad unit magic {}", String::from_utf8_lossy(found))
            }
            Self::UnsupportedVersion { found } => {
                write!(
                    f,
                    "unsupported unit version {}",
                    String::from_utf8_lossy(found)
                )
            }
            Self::Undersized { declared } => {
                write!(f, "declared unit size {declared} is smaller than its header")
            }
            Self::CodeOverrun { count, declared } => write!(
                f,
                "{count} instructions do not fit in a unit of {declared} bytes"
            ),
            Self::EmptyCode => write!(f, "unit has no instructions"),
            Self::TooLarge { len } => write!(f, "unit of {len} bytes exceeds the size field"),
        }
    }
}

impl std::error::Error for FrameError {}
