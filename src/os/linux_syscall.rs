use crate::{
    Result,
    error::{flush_error, open_error, resize_error, size_error, view_error},
};
use alloc::{ffi::CString, format};
use core::{ffi::c_int, ptr::null_mut};
use syscalls::Sysno;

const AT_FDCWD: c_int = -100;
const O_WRONLY: usize = 0o1;
const O_RDWR: usize = 0o2;
const O_CREAT: usize = 0o100;
const O_CLOEXEC: usize = 0o2000000;
const SEEK_END: usize = 2;
const PROT_READ_WRITE: usize = 0b11;
const MAP_SHARED: usize = 1;
const MS_SYNC: usize = 4;
const STATX_SIZE: usize = 0x200;
const EINVAL: i32 = 22;
const EOVERFLOW: i32 = 75;
const PAGE_SIZE: usize = 4096;
const INVALID_FD: isize = -1;

/// The resource chain of one mapped file: descriptor, then view.
pub(crate) struct RawMap {
    fd: isize,
    data: *mut u8,
    size: usize,
}

impl RawMap {
    pub(crate) const fn new() -> Self {
        Self {
            fd: INVALID_FD,
            data: null_mut(),
            size: 0,
        }
    }

    pub(crate) fn open(&mut self, path: &str) -> Result<()> {
        let name = c_path(path)?;
        let fd = unsafe {
            from_ret(syscalls::raw_syscall!(
                Sysno::openat,
                AT_FDCWD,
                name.as_ptr(),
                O_RDWR | O_CLOEXEC,
                0
            ))
        }
        .map_err(|code| open_error(format!("openat {path} failed"), code))?;
        self.fd = fd as isize;

        // lseek reports the length without the arch-specific stat layout
        self.size =
            unsafe { from_ret(syscalls::raw_syscall!(Sysno::lseek, self.fd, 0, SEEK_END)) }
                .map_err(|code| size_error(format!("lseek on {path} failed"), code))?;

        let ptr = unsafe {
            #[cfg(target_pointer_width = "32")]
            let syscall = Sysno::mmap2;
            #[cfg(not(target_pointer_width = "32"))]
            let syscall = Sysno::mmap;
            from_ret(syscalls::raw_syscall!(
                syscall,
                null_mut::<u8>(),
                self.size,
                PROT_READ_WRITE,
                MAP_SHARED,
                self.fd,
                0
            ))
        }
        .map_err(|code| view_error(format!("mmap of {path} failed"), code))?;
        self.data = ptr as *mut u8;

        #[cfg(feature = "log")]
        log::debug!(
            "Mapped file at address: {:p}, length: {}, fd: {}",
            self.data,
            self.size,
            self.fd
        );
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        if !self.data.is_null() {
            if let Err(_code) =
                unsafe { from_ret(syscalls::raw_syscall!(Sysno::munmap, self.data, self.size)) }
            {
                #[cfg(feature = "log")]
                log::warn!("munmap failed with error: {}", _code);
            }
            self.data = null_mut();
        }
        if self.fd != INVALID_FD {
            if let Err(_code) = unsafe { from_ret(syscalls::raw_syscall!(Sysno::close, self.fd)) }
            {
                #[cfg(feature = "log")]
                log::warn!("close failed with error: {}", _code);
            }
            self.fd = INVALID_FD;
        }
        self.size = 0;
    }

    pub(crate) fn flush(&self) -> Result<()> {
        if self.data.is_null() {
            return Ok(());
        }
        unsafe {
            from_ret(syscalls::raw_syscall!(
                Sysno::msync,
                self.data,
                self.size,
                MS_SYNC
            ))
        }
        .map_err(|code| flush_error("msync failed", code))?;
        Ok(())
    }

    #[inline]
    pub(crate) fn data(&self) -> *mut u8 {
        self.data
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }
}

pub(crate) fn file_size(path: &str) -> Result<u64> {
    let name = c_path(path)?;
    // struct statx is 256 bytes on every arch, stx_size sits at byte 40
    let mut statx = [0u64; 32];
    unsafe {
        from_ret(syscalls::raw_syscall!(
            Sysno::statx,
            AT_FDCWD,
            name.as_ptr(),
            0,
            STATX_SIZE,
            statx.as_mut_ptr()
        ))
    }
    .map_err(|code| size_error(format!("statx on {path} failed"), code))?;
    Ok(statx[5])
}

pub(crate) fn set_len(path: &str, len: u64) -> Result<()> {
    let name = c_path(path)?;
    let len = usize::try_from(len)
        .map_err(|_| resize_error("length does not fit in a register", EOVERFLOW))?;
    unsafe { from_ret(syscalls::raw_syscall!(Sysno::truncate, name.as_ptr(), len)) }
        .map_err(|code| resize_error(format!("truncate of {path} failed"), code))?;
    Ok(())
}

pub(crate) fn touch(path: &str) -> Result<()> {
    let name = c_path(path)?;
    let fd = unsafe {
        from_ret(syscalls::raw_syscall!(
            Sysno::openat,
            AT_FDCWD,
            name.as_ptr(),
            O_WRONLY | O_CREAT | O_CLOEXEC,
            0o666
        ))
    }
    .map_err(|code| open_error(format!("could not create {path}"), code))?;
    let _ = unsafe { from_ret(syscalls::raw_syscall!(Sysno::close, fd)) };
    Ok(())
}

pub(crate) fn page_size() -> usize {
    PAGE_SIZE
}

fn c_path(path: &str) -> Result<CString> {
    CString::new(path).map_err(|_| open_error("path contains a NUL byte", EINVAL))
}

/// Converts a raw syscall return value to a result carrying the errno.
#[inline(always)]
fn from_ret(value: usize) -> core::result::Result<usize, i32> {
    if value > -4096isize as usize {
        // Truncation of the error value is guaranteed to never occur due to
        // the above check. This is the same check that musl uses:
        // https://git.musl-libc.org/cgit/musl/tree/src/internal/syscall_ret.c?h=v1.1.15
        return Err(-(value as isize) as i32);
    }
    Ok(value)
}
