use crate::{
    Result,
    error::{flush_error, open_error, resize_error, size_error, view_error},
};
use alloc::{ffi::CString, format};
use core::ptr::null_mut;
use libc::{
    MAP_FAILED, MAP_SHARED, MS_SYNC, O_CLOEXEC, O_CREAT, O_RDWR, O_WRONLY, PROT_READ, PROT_WRITE,
};

// 32-bit glibc only handles files over 2 GiB through the *64 entry points
cfg_if::cfg_if! {
    if #[cfg(all(target_os = "linux", target_env = "gnu"))] {
        use libc::{
            fstat64 as fstat, off64_t as off_t, open64 as open, stat64 as stat,
            truncate64 as truncate,
        };
    } else {
        use libc::{fstat, off_t, open, stat, truncate};
    }
}

const INVALID_FD: libc::c_int = -1;

/// The resource chain of one mapped file: descriptor, then view.
pub(crate) struct RawMap {
    fd: libc::c_int,
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
        let fd = unsafe { open(name.as_ptr(), O_RDWR | O_CLOEXEC) };
        if fd == INVALID_FD {
            return Err(open_error(format!("could not open {path}"), errno()));
        }
        self.fd = fd;

        let mut st: stat = unsafe { core::mem::zeroed() };
        if unsafe { fstat(fd, &mut st) } == -1 {
            return Err(size_error(format!("fstat on {path} failed"), errno()));
        }
        self.size = usize::try_from(st.st_size)
            .map_err(|_| size_error("file does not fit in the address space", libc::EOVERFLOW))?;

        let ptr = unsafe {
            libc::mmap(
                null_mut(),
                self.size,
                PROT_READ | PROT_WRITE,
                MAP_SHARED,
                fd,
                0,
            )
        };
        if core::ptr::eq(ptr, MAP_FAILED) {
            return Err(view_error(format!("mmap of {path} failed"), errno()));
        }
        self.data = ptr.cast();

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
            if unsafe { libc::munmap(self.data.cast(), self.size) } != 0 {
                #[cfg(feature = "log")]
                log::warn!("munmap failed with error: {}", errno());
            }
            self.data = null_mut();
        }
        if self.fd != INVALID_FD {
            if unsafe { libc::close(self.fd) } != 0 {
                #[cfg(feature = "log")]
                log::warn!("close failed with error: {}", errno());
            }
            self.fd = INVALID_FD;
        }
        self.size = 0;
    }

    pub(crate) fn flush(&self) -> Result<()> {
        if self.data.is_null() {
            return Ok(());
        }
        if unsafe { libc::msync(self.data.cast(), self.size, MS_SYNC) } != 0 {
            return Err(flush_error("msync failed", errno()));
        }
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
    let mut st: stat = unsafe { core::mem::zeroed() };
    if unsafe { stat(name.as_ptr(), &mut st) } == -1 {
        return Err(size_error(format!("stat on {path} failed"), errno()));
    }
    Ok(st.st_size as u64)
}

pub(crate) fn set_len(path: &str, len: u64) -> Result<()> {
    let name = c_path(path)?;
    let len = off_t::try_from(len)
        .map_err(|_| resize_error("length does not fit in off_t", libc::EFBIG))?;
    if unsafe { truncate(name.as_ptr(), len) } == -1 {
        return Err(resize_error(format!("truncate of {path} failed"), errno()));
    }
    Ok(())
}

pub(crate) fn touch(path: &str) -> Result<()> {
    let name = c_path(path)?;
    let fd = unsafe {
        open(
            name.as_ptr(),
            O_WRONLY | O_CREAT | O_CLOEXEC,
            0o666 as libc::c_uint,
        )
    };
    if fd == INVALID_FD {
        return Err(open_error(format!("could not create {path}"), errno()));
    }
    unsafe { libc::close(fd) };
    Ok(())
}

pub(crate) fn page_size() -> usize {
    match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        size if size > 0 => size as usize,
        _ => 4096,
    }
}

fn c_path(path: &str) -> Result<CString> {
    CString::new(path).map_err(|_| open_error("path contains a NUL byte", libc::EINVAL))
}

fn errno() -> i32 {
    cfg_if::cfg_if! {
        if #[cfg(any(target_os = "linux", target_os = "emscripten", target_os = "fuchsia"))] {
            unsafe { *libc::__errno_location() }
        } else if #[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))] {
            unsafe { *libc::__errno() }
        } else if #[cfg(any(target_vendor = "apple", target_os = "freebsd"))] {
            unsafe { *libc::__error() }
        } else if #[cfg(any(target_os = "solaris", target_os = "illumos"))] {
            unsafe { *libc::___errno() }
        } else {
            0
        }
    }
}
