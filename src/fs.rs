//! Path-level helpers used around a mapping: size queries, pre-sizing and
//! alignment arithmetic.
use crate::{Result, os};

/// Returns the length in bytes of the file at `path`, or `-1` if the path
/// does not exist or cannot be queried.
///
/// No mapping is created and no handle outlives the call.
pub fn get_file_size(path: &str) -> i64 {
    match file_size(path) {
        Ok(size) => i64::try_from(size).unwrap_or(-1),
        Err(_) => -1,
    }
}

/// Returns the length in bytes of the file at `path`.
pub fn file_size(path: &str) -> Result<u64> {
    os::file_size(path)
}

/// Sets the length of the file at `path` to exactly `new_size` bytes.
///
/// Growing the file appends zero bytes; shrinking it discards the tail. The
/// file must already exist (see [`touch`]). Returns `0` on success, otherwise
/// the OS error code (`errno` on unix, `GetLastError` on windows).
///
/// This is how a file is pre-sized before it is mapped, since a mapping can
/// neither be created over an empty file nor extend the file it maps.
pub fn truncate(path: &str, new_size: u64) -> i32 {
    match set_len(path, new_size) {
        Ok(()) => 0,
        Err(err) => err.code(),
    }
}

/// Sets the length of the file at `path` to exactly `new_size` bytes.
pub fn set_len(path: &str, new_size: u64) -> Result<()> {
    os::set_len(path, new_size).inspect(|_| {
        #[cfg(feature = "log")]
        log::debug!("[{}] resized to {} bytes", path, new_size);
    })
}

/// Creates an empty file at `path` if nothing exists there. An existing file
/// is left as it is.
pub fn touch(path: &str) -> Result<()> {
    os::touch(path)
}

/// The granularity the OS maps files with: the page size on unix, the
/// allocation granularity on windows.
pub fn page_size() -> usize {
    os::page_size()
}

/// Rounds `value` up to the nearest multiple of `multiple_of`.
///
/// Zero and exact multiples are returned unchanged. Negative values round
/// towards positive infinity, so `round_up_to_multiple(-1, 4096)` is `0`.
///
/// # Panics
/// Panics if `multiple_of` is not positive, or if the rounded value does not
/// fit in an `i64` (`value` above `i64::MAX - multiple_of + 1` that is not
/// already a multiple). The overflow check holds in release builds as well.
///
/// # Examples
/// ```
/// use filemap::round_up_to_multiple;
///
/// assert_eq!(round_up_to_multiple(1, 4096), 4096);
/// assert_eq!(round_up_to_multiple(4097, 4096), 8192);
/// ```
#[inline]
pub const fn round_up_to_multiple(value: i64, multiple_of: i64) -> i64 {
    assert!(multiple_of > 0, "multiple_of must be positive");
    let remainder = value.rem_euclid(multiple_of);
    if remainder == 0 {
        return value;
    }
    match value.checked_add(multiple_of - remainder) {
        Some(rounded) => rounded,
        None => panic!("rounded value overflows i64"),
    }
}
