use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::{fmt, slice};

use req_unit::{FrameError, Header, HEADER_LEN};

/// Signature shared by initializer and finalizer entry points.
pub type RawEntryFn = unsafe extern "C" fn(*mut c_void);

/// The interpreter handle passed to native entry points.
///
/// Opaque to the loader; the VM decides what it points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct NativeContext(*mut c_void);

impl NativeContext {
    pub fn new(ptr: *mut c_void) -> Self {
        NativeContext(ptr)
    }

    pub fn null() -> Self {
        NativeContext(std::ptr::null_mut())
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }
}

/// A validated initializer or finalizer entry point.
#[derive(Copy, Clone)]
pub struct EntryFn(RawEntryFn);

impl EntryFn {
    /// Wrap an entry point defined in Rust.
    pub fn new(f: extern "C" fn(*mut c_void)) -> Self {
        EntryFn(f)
    }

    /// Wrap an address resolved from a loaded library.
    ///
    /// # Safety
    ///
    /// `f` must be a function with the entry point ABI that stays mapped for
    /// as long as the returned value is used.
    pub unsafe fn from_raw(f: RawEntryFn) -> Self {
        EntryFn(f)
    }

    /// Call the entry point with the interpreter context.
    pub fn call(self, cx: NativeContext) {
        // SAFETY: construction guarantees the pointer has the entry ABI and
        // outlives this call (libraries are never closed).
        unsafe { (self.0)(cx.as_ptr()) }
    }
}

impl fmt::Debug for EntryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryFn({:p})", self.0 as *const ())
    }
}

#[derive(Copy, Clone)]
enum DataStart<'lib> {
    Slice(&'lib [u8]),
    Raw(NonNull<u8>, PhantomData<&'lib [u8]>),
}

/// The start address of an exported data symbol.
///
/// Exported data carries no length. A unit blob is bounded by the size
/// field in its own header, so [`DataEntry::unit_bytes`] reads the fixed
/// header first and only then borrows the full extent.
#[derive(Copy, Clone)]
pub struct DataEntry<'lib> {
    start: DataStart<'lib>,
}

impl<'lib> DataEntry<'lib> {
    /// Data held in memory the caller already has as a slice.
    pub fn from_slice(bytes: &'lib [u8]) -> Self {
        DataEntry {
            start: DataStart::Slice(bytes),
        }
    }

    /// Data at a raw address inside a loaded library.
    ///
    /// # Safety
    ///
    /// `ptr` must point at readable memory that stays mapped for `'lib` and
    /// that is at least as long as the unit header it starts with declares.
    pub unsafe fn from_raw(ptr: NonNull<u8>) -> Self {
        DataEntry {
            start: DataStart::Raw(ptr, PhantomData),
        }
    }

    /// Borrow the unit container that starts at this entry.
    pub fn unit_bytes(&self) -> Result<&'lib [u8], FrameError> {
        match self.start {
            DataStart::Slice(bytes) => {
                let header = Header::parse(bytes)?;
                bytes
                    .get(..header.total_len)
                    .ok_or(FrameError::Truncated {
                        needed: header.total_len,
                        available: bytes.len(),
                    })
            }
            DataStart::Raw(ptr, _) => {
                // SAFETY: `from_raw` guarantees the symbol starts with a
                // readable unit header.
                let head = unsafe { slice::from_raw_parts(ptr.as_ptr(), HEADER_LEN) };
                let header = Header::parse(head)?;
                // SAFETY: the validated header declares the extent of the
                // blob, which `from_raw` guarantees is mapped.
                Ok(unsafe { slice::from_raw_parts(ptr.as_ptr(), header.total_len) })
            }
        }
    }
}

impl fmt::Debug for DataEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            DataStart::Slice(bytes) => write!(f, "DataEntry({} bytes)", bytes.len()),
            DataStart::Raw(ptr, _) => write!(f, "DataEntry({ptr:p})"),
        }
    }
}

/// A resolved symbol, typed by what the library claims it is.
#[derive(Copy, Clone, Debug)]
pub enum RawEntry<'lib> {
    Function(EntryFn),
    Data(DataEntry<'lib>),
}

impl<'lib> RawEntry<'lib> {
    pub fn as_function(&self) -> Option<EntryFn> {
        match self {
            RawEntry::Function(f) => Some(*f),
            RawEntry::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<DataEntry<'lib>> {
        match self {
            RawEntry::Data(data) => Some(*data),
            RawEntry::Function(_) => None,
        }
    }
}
