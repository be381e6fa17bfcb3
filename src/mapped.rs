//! A whole file mapped read/write into memory.
//!
//! [`MappedFile`] owns the OS resource chain behind one mapping. On unix that
//! is a file descriptor and the view mapped from it; on windows it is a file
//! handle, a file-mapping object created from it, and the view mapped from
//! the mapping object. Resources are acquired in that order and released in
//! the reverse order.
//!
//! # Partial opens
//! A failed [`MappedFile::open`] does not roll back what it already acquired.
//! The instance stays "partially open" so the failure can be inspected, and
//! the remaining resources are released by [`MappedFile::close`] or when the
//! instance is dropped. Always close (or drop) after an open attempt,
//! whatever its outcome.
use crate::{Result, os::RawMap};
use core::{fmt::Debug, slice};

/// A file mapped into the address space with shared read/write access.
///
/// Writes through the mapping reach the underlying file at a time chosen by
/// the OS, or synchronously after [`MappedFile::flush`]. Other mappings of
/// the same file, in this process or another, observe them as well. The
/// mapping has the length the file had when it was opened and never grows.
///
/// # Examples
/// ```no_run
/// use filemap::MappedFile;
///
/// let mut file = MappedFile::new();
/// if file.open("target/data.bin") {
///     file.as_mut_slice()[0] = 0xff;
/// }
/// file.close();
/// ```
pub struct MappedFile {
    raw: RawMap,
}

// The view is exclusively owned by this instance.
unsafe impl Send for MappedFile {}

impl MappedFile {
    /// Creates a closed instance. No OS resource is acquired.
    #[inline]
    pub const fn new() -> Self {
        Self { raw: RawMap::new() }
    }

    /// Opens and maps `path`, returning the instance only if every step
    /// succeeded. Resources of a failed attempt are released before the
    /// error is returned.
    pub fn from_path(path: &str) -> Result<Self> {
        let mut file = Self::new();
        file.try_open(path)?;
        Ok(file)
    }

    /// Maps the whole file at `path` read/write.
    ///
    /// Returns `false` if the file cannot be opened, its size cannot be
    /// determined, or it cannot be mapped (an empty file cannot be mapped
    /// on any platform; pre-size it with [`crate::truncate`]). The file is
    /// never created. See the module documentation for the state the
    /// instance is left in after a failure.
    pub fn open(&mut self, path: &str) -> bool {
        self.try_open(path).is_ok()
    }

    /// Same as [`MappedFile::open`], reporting which step failed.
    ///
    /// An instance that is still open, or partially open, is closed first.
    pub fn try_open(&mut self, path: &str) -> Result<()> {
        self.close();
        match self.raw.open(path) {
            Ok(()) => {
                #[cfg(feature = "log")]
                log::debug!("[{}] mapped {} bytes", path, self.raw.size());
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "log")]
                log::error!("[{}] {}", path, err);
                Err(err)
            }
        }
    }

    /// Unmaps the view and releases every OS resource held by the instance.
    ///
    /// Safe to call on a closed or partially open instance, and any number
    /// of times. Errors reported by the OS while releasing are ignored.
    pub fn close(&mut self) {
        self.raw.close();
    }

    /// Writes modified pages of the view back to the file and waits for the
    /// write to complete. A no-op on a closed instance.
    pub fn flush(&self) -> Result<()> {
        self.raw.flush()
    }

    /// Whether the view is mapped.
    #[inline]
    pub fn is_open(&self) -> bool {
        !self.raw.data().is_null()
    }

    /// Returns a pointer to the first mapped byte, or null when closed.
    ///
    /// Dereferencing the pointer after [`MappedFile::close`] is undefined
    /// behaviour.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.raw.data()
    }

    /// Returns the length of the mapping in bytes.
    ///
    /// `0` when closed. After a failed open it holds whatever size was
    /// determined before the failing step.
    #[inline]
    pub fn size(&self) -> usize {
        self.raw.size()
    }

    /// The mapped bytes; empty when closed.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        if self.is_open() {
            unsafe { slice::from_raw_parts(self.raw.data(), self.raw.size()) }
        } else {
            &[]
        }
    }

    /// The mapped bytes, writable; empty when closed.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.is_open() {
            unsafe { slice::from_raw_parts_mut(self.raw.data(), self.raw.size()) }
        } else {
            &mut []
        }
    }
}

impl Default for MappedFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        self.close();
    }
}

impl Debug for MappedFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MappedFile")
            .field("data", &self.raw.data())
            .field("size", &self.raw.size())
            .finish()
    }
}
