use alloc::borrow::Cow;
use core::fmt::{Debug, Display};

/// Error types used throughout the `filemap` library.
/// Each variant corresponds to one step of mapping a file or of the helpers
/// around it, and carries the raw OS error code reported at that step
/// (`errno` on unix, `GetLastError` on windows, `0` when there is none).
#[derive(Debug)]
pub enum Error {
    /// The file could not be opened.
    ///
    /// This error typically indicates:
    /// * File not found
    /// * Permission denied
    /// * A path that cannot be passed to the OS (interior NUL)
    Open {
        /// A descriptive message about the failure.
        msg: Cow<'static, str>,
        /// The raw OS error code.
        code: i32,
    },

    /// The length of the file could not be determined.
    Size {
        /// A descriptive message about the failure.
        msg: Cow<'static, str>,
        /// The raw OS error code.
        code: i32,
    },

    /// The file-mapping object could not be created.
    ///
    /// Only produced on platforms that separate the file handle from the
    /// mapping object. An empty file ends up here on windows.
    Mapping {
        /// A descriptive message about the failure.
        msg: Cow<'static, str>,
        /// The raw OS error code.
        code: i32,
    },

    /// The view could not be mapped into the address space.
    ///
    /// This error typically indicates:
    /// * Address space exhaustion
    /// * A protection mismatch with the file's open mode
    /// * An empty file (unix)
    View {
        /// A descriptive message about the failure.
        msg: Cow<'static, str>,
        /// The raw OS error code.
        code: i32,
    },

    /// The file could not be truncated or extended.
    Resize {
        /// A descriptive message about the failure.
        msg: Cow<'static, str>,
        /// The raw OS error code.
        code: i32,
    },

    /// Dirty pages of a view could not be written back.
    Flush {
        /// A descriptive message about the failure.
        msg: Cow<'static, str>,
        /// The raw OS error code.
        code: i32,
    },

    /// An arena access fell outside of the arena.
    OutOfBounds {
        /// Start of the requested range.
        offset: u64,
        /// Length of the requested range.
        len: u64,
        /// Size of the arena.
        size: u64,
    },
}

impl Error {
    /// Returns the raw OS error code carried by this error, or `0`.
    pub fn code(&self) -> i32 {
        match self {
            Error::Open { code, .. }
            | Error::Size { code, .. }
            | Error::Mapping { code, .. }
            | Error::View { code, .. }
            | Error::Resize { code, .. }
            | Error::Flush { code, .. } => *code,
            Error::OutOfBounds { .. } => 0,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Open { msg, code } => write!(f, "Open error: {msg} (os error {code})"),
            Error::Size { msg, code } => write!(f, "File size error: {msg} (os error {code})"),
            Error::Mapping { msg, code } => {
                write!(f, "File mapping error: {msg} (os error {code})")
            }
            Error::View { msg, code } => write!(f, "Map view error: {msg} (os error {code})"),
            Error::Resize { msg, code } => write!(f, "Resize error: {msg} (os error {code})"),
            Error::Flush { msg, code } => write!(f, "Flush error: {msg} (os error {code})"),
            Error::OutOfBounds { offset, len, size } => write!(
                f,
                "Out of bounds: {len} bytes at offset {offset} exceed arena size {size}"
            ),
        }
    }
}

impl core::error::Error for Error {}

/// Creates an `Error::Open` with the specified message and OS code.
#[cold]
#[inline(never)]
pub(crate) fn open_error(msg: impl Into<Cow<'static, str>>, code: i32) -> Error {
    Error::Open {
        msg: msg.into(),
        code,
    }
}

/// Creates an `Error::Size` with the specified message and OS code.
#[cold]
#[inline(never)]
pub(crate) fn size_error(msg: impl Into<Cow<'static, str>>, code: i32) -> Error {
    Error::Size {
        msg: msg.into(),
        code,
    }
}

/// Creates an `Error::Mapping` with the specified message and OS code.
#[cold]
#[inline(never)]
#[allow(unused)]
pub(crate) fn mapping_error(msg: impl Into<Cow<'static, str>>, code: i32) -> Error {
    Error::Mapping {
        msg: msg.into(),
        code,
    }
}

/// Creates an `Error::View` with the specified message and OS code.
#[cold]
#[inline(never)]
pub(crate) fn view_error(msg: impl Into<Cow<'static, str>>, code: i32) -> Error {
    Error::View {
        msg: msg.into(),
        code,
    }
}

/// Creates an `Error::Resize` with the specified message and OS code.
#[cold]
#[inline(never)]
pub(crate) fn resize_error(msg: impl Into<Cow<'static, str>>, code: i32) -> Error {
    Error::Resize {
        msg: msg.into(),
        code,
    }
}

/// Creates an `Error::Flush` with the specified message and OS code.
#[cold]
#[inline(never)]
pub(crate) fn flush_error(msg: impl Into<Cow<'static, str>>, code: i32) -> Error {
    Error::Flush {
        msg: msg.into(),
        code,
    }
}

#[cold]
#[inline(never)]
pub(crate) fn out_of_bounds(offset: u64, len: u64, size: u64) -> Error {
    Error::OutOfBounds { offset, len, size }
}
