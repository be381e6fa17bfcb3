//! # filemap
//! Map whole files into memory for read/write access, with the same behaviour on unix and
//! windows.
//! ## Usage
//! [`MappedFile`] owns one mapping and the OS resources behind it. The free functions
//! [`get_file_size`], [`truncate`] and [`round_up_to_multiple`] cover what callers need
//! before mapping a file, typically growing it to the size a patch will produce.
//! ## Example
//! ```no_run
//! use filemap::{MappedFile, get_file_size, round_up_to_multiple, truncate};
//!
//! let path = "target/output.bin";
//! let wanted = round_up_to_multiple(get_file_size(path).max(1), 4096);
//! assert_eq!(truncate(path, wanted as u64), 0);
//!
//! let mut file = MappedFile::new();
//! if file.open(path) {
//!     file.as_mut_slice().fill(0);
//! }
//! file.close();
//! ```
//! ## Features
//! * `log`: log mapping, resizing and failures through the `log` facade.
//! * `use-syscall`: on linux, issue raw syscalls instead of going through libc.
#![no_std]
extern crate alloc;

mod arena;
mod error;
mod fs;
mod mapped;
mod os;

pub use arena::{Arena, Buffer};
pub use error::Error;
pub use fs::{file_size, get_file_size, page_size, round_up_to_multiple, set_len, touch, truncate};
pub use mapped::MappedFile;

/// A type alias for `Result`s returned by `filemap` functions.
pub type Result<T> = core::result::Result<T, Error>;
