//! Flat byte arenas.
use crate::{MappedFile, Result, error::out_of_bounds};
use core::ops::Range;

/// A fixed-size, bounds-checked run of bytes addressed by offset.
///
/// Code that patches files in place is written against this trait so the
/// same routine works on a [`MappedFile`] and on an in-memory [`Buffer`].
///
/// [`MappedFile`] has an inherent `size()` returning `usize`, which shadows
/// [`Arena::size`] in method-call syntax. Call the trait method explicitly
/// on a mapped file, or go through a generic bound.
///
/// ```no_run
/// use filemap::{Arena, MappedFile};
///
/// let file = MappedFile::from_path("target/data.bin").unwrap();
/// let mapped: usize = file.size();
/// let arena: u64 = Arena::size(&file);
/// assert_eq!(mapped as u64, arena);
/// ```
pub trait Arena {
    /// Returns the whole arena
    fn bytes(&self) -> &[u8];
    /// Returns the whole arena, writable
    fn bytes_mut(&mut self) -> &mut [u8];

    /// Whether the arena can be accessed.
    fn is_valid(&self) -> bool {
        true
    }

    /// Size of the arena in bytes.
    fn size(&self) -> u64 {
        self.bytes().len() as u64
    }

    /// Returns `len` bytes starting at `offset`.
    fn read(&self, offset: u64, len: u64) -> Result<&[u8]> {
        let range = checked_range(offset, len, self.size())?;
        Ok(&self.bytes()[range])
    }

    /// Copies `data` into the arena starting at `offset`.
    fn write(&mut self, data: &[u8], offset: u64) -> Result<()> {
        let range = checked_range(offset, data.len() as u64, self.size())?;
        self.bytes_mut()[range].copy_from_slice(data);
        Ok(())
    }

    /// Moves `len` bytes from `src` to `dst` inside the arena. The ranges
    /// may overlap.
    fn copy_within(&mut self, src: u64, dst: u64, len: u64) -> Result<()> {
        let size = self.size();
        let src = checked_range(src, len, size)?;
        let dst = checked_range(dst, len, size)?;
        self.bytes_mut().copy_within(src, dst.start);
        Ok(())
    }
}

#[inline]
fn checked_range(offset: u64, len: u64, size: u64) -> Result<Range<usize>> {
    match offset.checked_add(len) {
        // size always fits in usize, so both ends do too
        Some(end) if end <= size => Ok(offset as usize..end as usize),
        _ => Err(out_of_bounds(offset, len, size)),
    }
}

/// An arena over borrowed memory.
pub struct Buffer<'a> {
    data: &'a mut [u8],
}

impl<'a> Buffer<'a> {
    /// Wraps `data`. An empty slice gives an arena that reports itself
    /// invalid.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }
}

impl Arena for Buffer<'_> {
    #[inline]
    fn bytes(&self) -> &[u8] {
        self.data
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.data
    }

    fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }
}

impl Arena for MappedFile {
    #[inline]
    fn bytes(&self) -> &[u8] {
        self.as_slice()
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }

    fn is_valid(&self) -> bool {
        self.is_open()
    }
}
