use crate::{
    Result,
    error::{flush_error, mapping_error, open_error, resize_error, size_error, view_error},
};
use alloc::{format, vec::Vec};
use core::{
    ffi::c_void,
    mem::MaybeUninit,
    ptr::{null, null_mut},
};
use windows_sys::Win32::{
    Foundation::{
        CloseHandle, ERROR_ARITHMETIC_OVERFLOW, ERROR_INVALID_NAME, GENERIC_READ, GENERIC_WRITE,
        GetLastError, HANDLE, INVALID_HANDLE_VALUE,
    },
    Storage::FileSystem::{
        CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_BEGIN, FILE_CREATION_DISPOSITION,
        FILE_SHARE_READ, FILE_SHARE_WRITE, FlushFileBuffers, GetFileAttributesExW,
        GetFileExInfoStandard, GetFileSizeEx, OPEN_ALWAYS, OPEN_EXISTING, SetEndOfFile,
        SetFilePointerEx, WIN32_FILE_ATTRIBUTE_DATA,
    },
    System::{
        Memory::{
            CreateFileMappingW, FILE_MAP_WRITE, FlushViewOfFile, MEMORY_MAPPED_VIEW_ADDRESS,
            MapViewOfFile, PAGE_READWRITE, UnmapViewOfFile,
        },
        SystemInformation::GetSystemInfo,
    },
};

/// The resource chain of one mapped file: file handle, then mapping
/// object, then view.
pub(crate) struct RawMap {
    file: HANDLE,
    mapping: HANDLE,
    data: *mut u8,
    size: usize,
}

impl RawMap {
    pub(crate) const fn new() -> Self {
        Self {
            file: INVALID_HANDLE_VALUE,
            mapping: null_mut(),
            data: null_mut(),
            size: 0,
        }
    }

    pub(crate) fn open(&mut self, path: &str) -> Result<()> {
        let wide_path = wide_path(path)?;
        let handle = create_file(&wide_path, GENERIC_READ | GENERIC_WRITE, OPEN_EXISTING);
        if handle == INVALID_HANDLE_VALUE {
            return Err(open_error(
                format!("CreateFileW on {path} failed"),
                last_error(),
            ));
        }
        self.file = handle;

        let mut file_size = 0i64;
        if unsafe { GetFileSizeEx(self.file, &mut file_size) } == 0 {
            return Err(size_error(
                format!("GetFileSizeEx on {path} failed"),
                last_error(),
            ));
        }
        self.size = usize::try_from(file_size).map_err(|_| {
            size_error(
                "file does not fit in the address space",
                ERROR_ARITHMETIC_OVERFLOW as i32,
            )
        })?;

        let mapping = unsafe {
            CreateFileMappingW(
                self.file,
                null(),
                PAGE_READWRITE,
                (file_size as u64 >> 32) as u32,
                file_size as u32,
                null(),
            )
        };
        if mapping.is_null() {
            return Err(mapping_error(
                format!("CreateFileMappingW on {path} failed"),
                last_error(),
            ));
        }
        self.mapping = mapping;

        let view = unsafe { MapViewOfFile(self.mapping, FILE_MAP_WRITE, 0, 0, self.size) };
        if view.Value.is_null() {
            return Err(view_error(
                format!("MapViewOfFile on {path} failed"),
                last_error(),
            ));
        }
        self.data = view.Value.cast();

        #[cfg(feature = "log")]
        log::debug!(
            "Mapped file at address: {:p}, length: {}, mapping: {:p}",
            self.data,
            self.size,
            self.mapping
        );
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        if !self.data.is_null() {
            let view = MEMORY_MAPPED_VIEW_ADDRESS {
                Value: self.data.cast(),
            };
            if unsafe { UnmapViewOfFile(view) } == 0 {
                #[cfg(feature = "log")]
                log::warn!("UnmapViewOfFile failed with error: {}", last_error());
            }
            self.data = null_mut();
        }
        if !self.mapping.is_null() {
            if unsafe { CloseHandle(self.mapping) } == 0 {
                #[cfg(feature = "log")]
                log::warn!("CloseHandle on mapping failed with error: {}", last_error());
            }
            self.mapping = null_mut();
        }
        if self.file != INVALID_HANDLE_VALUE {
            if unsafe { CloseHandle(self.file) } == 0 {
                #[cfg(feature = "log")]
                log::warn!("CloseHandle on file failed with error: {}", last_error());
            }
            self.file = INVALID_HANDLE_VALUE;
        }
        self.size = 0;
    }

    pub(crate) fn flush(&self) -> Result<()> {
        if self.data.is_null() {
            return Ok(());
        }
        if unsafe { FlushViewOfFile(self.data as *const c_void, self.size) } == 0 {
            return Err(flush_error("FlushViewOfFile failed", last_error()));
        }
        if unsafe { FlushFileBuffers(self.file) } == 0 {
            return Err(flush_error("FlushFileBuffers failed", last_error()));
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
    let wide_path = wide_path(path)?;
    let mut data = MaybeUninit::<WIN32_FILE_ATTRIBUTE_DATA>::uninit();
    if unsafe {
        GetFileAttributesExW(
            wide_path.as_ptr(),
            GetFileExInfoStandard,
            data.as_mut_ptr().cast(),
        )
    } == 0
    {
        return Err(size_error(
            format!("GetFileAttributesExW on {path} failed"),
            last_error(),
        ));
    }
    let data = unsafe { data.assume_init() };
    Ok(((data.nFileSizeHigh as u64) << 32) | data.nFileSizeLow as u64)
}

pub(crate) fn set_len(path: &str, len: u64) -> Result<()> {
    let wide_path = wide_path(path)?;
    let distance = i64::try_from(len).map_err(|_| {
        resize_error(
            "length does not fit in a file offset",
            ERROR_ARITHMETIC_OVERFLOW as i32,
        )
    })?;
    let handle = create_file(&wide_path, GENERIC_WRITE, OPEN_EXISTING);
    if handle == INVALID_HANDLE_VALUE {
        return Err(resize_error(
            format!("CreateFileW on {path} failed"),
            last_error(),
        ));
    }

    let res = if unsafe { SetFilePointerEx(handle, distance, null_mut(), FILE_BEGIN) } == 0 {
        Err(resize_error("SetFilePointerEx failed", last_error()))
    } else if unsafe { SetEndOfFile(handle) } == 0 {
        Err(resize_error("SetEndOfFile failed", last_error()))
    } else {
        Ok(())
    };
    unsafe { CloseHandle(handle) };
    res
}

pub(crate) fn touch(path: &str) -> Result<()> {
    let wide_path = wide_path(path)?;
    let handle = create_file(&wide_path, GENERIC_WRITE, OPEN_ALWAYS);
    if handle == INVALID_HANDLE_VALUE {
        return Err(open_error(
            format!("could not create {path}"),
            last_error(),
        ));
    }
    unsafe { CloseHandle(handle) };
    Ok(())
}

pub(crate) fn page_size() -> usize {
    let mut info = MaybeUninit::uninit();
    let info = unsafe {
        GetSystemInfo(info.as_mut_ptr());
        info.assume_init()
    };
    info.dwAllocationGranularity as usize
}

fn create_file(wide_path: &[u16], access: u32, disposition: FILE_CREATION_DISPOSITION) -> HANDLE {
    unsafe {
        CreateFileW(
            wide_path.as_ptr(),
            access,
            FILE_SHARE_READ | FILE_SHARE_WRITE,
            null(),
            disposition,
            FILE_ATTRIBUTE_NORMAL,
            null_mut(),
        )
    }
}

fn wide_path(path: &str) -> Result<Vec<u16>> {
    if path.contains('\0') {
        return Err(open_error(
            "path contains a NUL byte",
            ERROR_INVALID_NAME as i32,
        ));
    }
    let mut wide_path = Vec::<u16>::with_capacity(path.len() + 1);
    for c in path.encode_utf16() {
        wide_path.push(c);
    }
    wide_path.push(0);
    Ok(wide_path)
}

#[inline]
fn last_error() -> i32 {
    unsafe { GetLastError() as i32 }
}
